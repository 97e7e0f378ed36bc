//! Validation module for product submissions
//!
//! This module turns a raw [`ProductRequest`] into a [`Product`]:
//!
//! - Required fields (product name, manufacturer, net weight, ingredient names)
//! - Weight parsing with a leading-number rule (`"100g"` reads as 100)
//! - Defensive normalization of unusable weights to zero

use crate::errors::{error_logging, LabelError, LabelResult};
use crate::product::{Ingredient, IngredientRequest, Product, ProductRequest, WeightInput};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("Invalid leading number regex pattern");
}

/// Validates a required text field
///
/// # Returns
/// * `Ok(String)` - The trimmed value
/// * `Err(LabelError::MissingField)` - The value is absent or blank
///
/// # Examples
/// ```
/// use food_labeler::validation::require_text;
///
/// assert_eq!(require_text(Some(" 煮物 "), "productName").unwrap(), "煮物");
/// assert!(require_text(Some("   "), "productName").is_err());
/// assert!(require_text(None, "manufacturer").is_err());
/// ```
pub fn require_text(value: Option<&str>, field: &str) -> LabelResult<String> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(LabelError::MissingField(field.to_string())),
    }
}

/// Parse a weight in grams
///
/// Text is read like `parseFloat`: the longest leading number wins and trailing
/// text such as a unit is ignored.
///
/// # Examples
/// ```
/// use food_labeler::product::WeightInput;
/// use food_labeler::validation::parse_weight;
///
/// assert_eq!(parse_weight(&WeightInput::Number(50.0), "weight").unwrap(), 50.0);
/// assert_eq!(parse_weight(&WeightInput::Text("100g".to_string()), "weight").unwrap(), 100.0);
/// assert!(parse_weight(&WeightInput::Text("abc".to_string()), "weight").is_err());
/// assert!(parse_weight(&WeightInput::Number(-5.0), "weight").is_err());
/// ```
pub fn parse_weight(input: &WeightInput, field: &str) -> LabelResult<f64> {
    let malformed = || LabelError::MalformedWeight {
        field: field.to_string(),
        value: input.to_string(),
    };

    let value = match input {
        WeightInput::Number(value) => *value,
        WeightInput::Text(text) => LEADING_NUMBER
            .find(text.trim())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(malformed)?,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(malformed());
    }

    // Normalizes -0.0 as well
    if value == 0.0 {
        return Ok(0.0);
    }
    Ok(value)
}

/// Weight of `input`, with anything unusable read as zero
///
/// Malformed weights are logged rather than rejected so that existing callers
/// keep receiving a label.
pub fn weight_or_zero(input: Option<&WeightInput>, field: &str) -> f64 {
    let Some(input) = input else {
        let err = LabelError::MalformedWeight {
            field: field.to_string(),
            value: String::new(),
        };
        error_logging::log_validation_error(&err, "parse_weight", field, None);
        return 0.0;
    };

    parse_weight(input, field).unwrap_or_else(|err| {
        let raw = input.to_string();
        error_logging::log_validation_error(&err, "parse_weight", field, Some(raw.as_str()));
        0.0
    })
}

fn validate_ingredient(index: usize, request: &IngredientRequest) -> LabelResult<Ingredient> {
    let name = require_text(
        request.name.as_deref(),
        &format!("ingredients[{}].name", index),
    )?;
    let weight = weight_or_zero(
        request.weight.as_ref(),
        &format!("ingredients[{}].weight", index),
    );

    Ok(Ingredient {
        name,
        weight,
        origin_country: non_blank(request.origin.as_deref()),
        composition_detail: non_blank(request.detail_ingredients.as_deref()),
    })
}

/// Validate a product submission
///
/// Missing required fields are reported before any label processing happens.
/// Blank optional fields are treated as absent.
pub fn validate_product(request: &ProductRequest) -> LabelResult<Product> {
    let product_name = require_text(request.product_name.as_deref(), "productName")?;
    let manufacturer = require_text(request.manufacturer.as_deref(), "manufacturer")?;
    let net_weight_input = request
        .net_weight
        .as_ref()
        .ok_or_else(|| LabelError::MissingField("netWeight".to_string()))?;
    let net_weight = weight_or_zero(Some(net_weight_input), "netWeight");

    let ingredients = request
        .ingredients
        .iter()
        .enumerate()
        .map(|(i, ingredient)| validate_ingredient(i, ingredient))
        .collect::<LabelResult<Vec<_>>>()?;

    Ok(Product {
        product_name,
        manufacturer,
        net_weight,
        storage_method: non_blank(request.storage_method.as_deref()),
        best_before: non_blank(request.best_before.as_deref()),
        ingredients,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
