//! # Label Assembly
//!
//! Builds the label for a whole product:
//!
//! 1. Ingredients are ordered heaviest first (stable for equal weights)
//! 2. Each one is resolved by [`CompoundResolver`]; allergens and additives are
//!    accumulated at product level
//! 3. Only the heaviest ingredient may carry an origin annotation
//! 4. The ingredient list is `ingredients／additives（一部に…を含む）`
//!
//! The remaining fields are copied or formatted from the product.

use crate::allergens::{AllergenMatcher, DeclaredAllergens};
use crate::compound::CompoundResolver;
use crate::errors::LabelResult;
use crate::localization::LabelVocabulary;
use crate::product::Product;
use crate::reference_data::ReferenceData;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Separator between ingredients and between additives
pub const LIST_SEPARATOR: &str = "、";
/// Separator between the ingredient section and the additive section
pub const ADDITIVE_SECTION_SEPARATOR: &str = "／";
/// Separator between allergen names in the disclosure
pub const ALLERGEN_SEPARATOR: &str = "・";

/// A generated food label; serialized with the fixed Japanese field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "名称")]
    pub name: String,
    #[serde(rename = "原材料名")]
    pub ingredient_list: String,
    #[serde(rename = "内容量")]
    pub net_content: String,
    #[serde(rename = "賞味期限", default, skip_serializing_if = "Option::is_none")]
    pub best_before: Option<String>,
    #[serde(rename = "保存方法", default, skip_serializing_if = "Option::is_none")]
    pub storage_method: Option<String>,
    #[serde(rename = "製造者")]
    pub manufacturer: String,
}

/// Assembles labels from validated products
#[derive(Debug, Clone, Copy)]
pub struct LabelAssembler<'a> {
    data: &'a ReferenceData,
    vocabulary: &'a LabelVocabulary,
}

impl<'a> LabelAssembler<'a> {
    pub fn new(data: &'a ReferenceData, vocabulary: &'a LabelVocabulary) -> Self {
        Self { data, vocabulary }
    }

    pub fn assemble(&self, product: &Product) -> LabelResult<Label> {
        let resolver = CompoundResolver::new(self.data);
        let matcher = AllergenMatcher::new(&self.data.allergens);

        let total_weight = product.total_weight();
        let sorted = product.ingredients_by_weight();

        let mut allergens = DeclaredAllergens::new();
        let mut additives: Vec<String> = Vec::new();
        let mut fragments: Vec<String> = Vec::with_capacity(sorted.len());

        for (index, ingredient) in sorted.iter().enumerate() {
            let resolution = resolver.resolve(ingredient, total_weight);
            allergens.extend_classified(&matcher, &resolution.allergens);
            for additive in resolution.additives {
                if !additives.contains(&additive) {
                    additives.push(additive);
                }
            }

            let origin = ingredient
                .origin_country
                .as_deref()
                .map(str::trim)
                .filter(|origin| !origin.is_empty());
            let fragment = match origin {
                Some(origin) if index == 0 => self
                    .vocabulary
                    .origin_annotation(&resolution.display_name, origin)?,
                _ => resolution.display_name,
            };
            fragments.push(fragment);
        }

        let ingredient_list = self.ingredient_list(&fragments, &additives, &allergens)?;

        debug!(
            product = %product.product_name,
            ingredients = fragments.len(),
            additives = additives.len(),
            allergens = allergens.len(),
            "Label assembled"
        );

        Ok(Label {
            name: product.product_name.clone(),
            ingredient_list,
            net_content: self.vocabulary.net_content(product.net_weight)?,
            best_before: product.best_before.clone(),
            storage_method: product.storage_method.clone(),
            manufacturer: product.manufacturer.clone(),
        })
    }

    fn ingredient_list(
        &self,
        fragments: &[String],
        additives: &[String],
        allergens: &DeclaredAllergens,
    ) -> LabelResult<String> {
        let mut list = fragments.join(LIST_SEPARATOR);

        if !additives.is_empty() {
            list.push_str(ADDITIVE_SECTION_SEPARATOR);
            list.push_str(&additives.join(LIST_SEPARATOR));
        }

        if !allergens.is_empty() {
            let names = allergens.disclosure_order().join(ALLERGEN_SEPARATOR);
            list.push_str(&self.vocabulary.allergen_disclosure(&names)?);
        }

        Ok(list)
    }
}
