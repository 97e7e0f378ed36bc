//! # Product Model
//!
//! Raw product submissions as they arrive over the wire, and the validated
//! `Product` the label engine works on. See [`crate::validation`] for the
//! conversion between the two.

use serde::{Deserialize, Serialize};

/// A weight as submitted: a JSON number or a numeric string such as `"100"` or `"100g"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for WeightInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightInput::Number(value) => write!(f, "{}", value),
            WeightInput::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for WeightInput {
    fn from(value: f64) -> Self {
        WeightInput::Number(value)
    }
}

impl From<&str> for WeightInput {
    fn from(value: &str) -> Self {
        WeightInput::Text(value.to_string())
    }
}

/// One ingredient line of a product submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weight: Option<WeightInput>,
    #[serde(default, alias = "originCountry")]
    pub origin: Option<String>,
    #[serde(default, alias = "compositionDetail")]
    pub detail_ingredients: Option<String>,
}

/// A product submission before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub net_weight: Option<WeightInput>,
    #[serde(default)]
    pub storage_method: Option<String>,
    #[serde(default)]
    pub best_before: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientRequest>,
}

/// A validated ingredient; weight in grams
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub weight: f64,
    /// Only shown when this is the heaviest ingredient of its product
    pub origin_country: Option<String>,
    /// Raw `sub-ingredients／additives` text of a compound ingredient
    pub composition_detail: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            origin_country: None,
            composition_detail: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin_country = Some(origin.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.composition_detail = Some(detail.into());
        self
    }
}

/// A validated product; net weight in grams
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_name: String,
    pub manufacturer: String,
    pub net_weight: f64,
    pub storage_method: Option<String>,
    pub best_before: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

impl Product {
    /// Sum of all ingredient weights
    pub fn total_weight(&self) -> f64 {
        self.ingredients.iter().map(|i| i.weight).sum()
    }

    /// Ingredients heaviest first; equal weights keep their submission order
    pub fn ingredients_by_weight(&self) -> Vec<&Ingredient> {
        let mut sorted: Vec<&Ingredient> = self.ingredients.iter().collect();
        sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        sorted
    }
}
