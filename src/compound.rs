//! # Compound Ingredient Resolution
//!
//! Decides how each ingredient appears on the label and what it contributes to
//! the product's allergen and additive declarations.
//!
//! A standard compound ingredient (醤油, マヨネーズ, ...) whose share of the total
//! weight is below the omission threshold may drop its sub-ingredient breakdown.
//! Its inherent allergens are declared either way.

use crate::additives::AdditiveClassifier;
use crate::allergens::AllergenMatcher;
use crate::product::Ingredient;
use crate::reference_data::{ReferenceData, StandardCompoundIngredient};
use crate::text_processing::split_composition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Allergens and additives found in a standalone composition text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundAnalysis {
    pub allergens: Vec<String>,
    pub additives: Vec<String>,
}

/// How one ingredient is printed and what it declares
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundResolution {
    /// Name as printed, before any origin annotation
    pub display_name: String,
    /// Canonical allergen names, sorted and deduplicated
    pub allergens: Vec<String>,
    /// Additive declarations in display order
    pub additives: Vec<String>,
    pub is_standard: bool,
    /// Composition detail was present but left off the label
    pub detail_omitted: bool,
}

/// Resolves ingredients against the reference tables
#[derive(Debug, Clone, Copy)]
pub struct CompoundResolver<'a> {
    data: &'a ReferenceData,
}

impl<'a> CompoundResolver<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self { data }
    }

    fn allergen_matcher(&self) -> AllergenMatcher<'a> {
        AllergenMatcher::new(&self.data.allergens)
    }

    fn additive_classifier(&self) -> AdditiveClassifier<'a> {
        AdditiveClassifier::new(&self.data.additives)
    }

    /// Whether `name` refers to a known compound ingredient
    pub fn is_compound(&self, name: &str) -> bool {
        self.data.standard_ingredients.find(name).is_some()
    }

    /// Analyze `sub-ingredients／additives` text on its own
    pub fn analyze(&self, details: &str) -> CompoundAnalysis {
        let sections = split_composition(details);
        CompoundAnalysis {
            allergens: sections
                .main
                .map(|main| self.allergen_matcher().find_allergens(main))
                .unwrap_or_default(),
            additives: sections
                .additives
                .map(|additives| self.additive_classifier().classify(additives))
                .unwrap_or_default(),
        }
    }

    /// Whether a standard ingredient's breakdown may be left off the label
    pub fn is_omission_eligible(
        &self,
        standard: Option<&StandardCompoundIngredient>,
        weight: f64,
        total_weight: f64,
    ) -> bool {
        if standard.is_none() || total_weight <= 0.0 {
            return false;
        }
        let share_percent = weight / total_weight * 100.0;
        share_percent < self.data.standard_ingredients.omission_threshold_percent()
    }

    /// Resolve one ingredient of a product weighing `total_weight` grams in total
    pub fn resolve(&self, ingredient: &Ingredient, total_weight: f64) -> CompoundResolution {
        let standard = self.data.standard_ingredients.find(&ingredient.name);
        let omission_eligible =
            self.is_omission_eligible(standard, ingredient.weight, total_weight);

        let mut allergens: BTreeSet<String> = self
            .allergen_matcher()
            .find_allergens(&ingredient.name)
            .into_iter()
            .collect();
        if let Some(standard) = standard {
            allergens.extend(standard.inherent_allergens.iter().cloned());
        }

        let mut display_name = ingredient.name.clone();
        let mut additives = Vec::new();
        let detail = ingredient.composition_detail.as_deref();

        if let Some(detail) = detail.filter(|_| !omission_eligible) {
            let sections = split_composition(detail);
            if let Some(main) = sections.main {
                allergens.extend(self.allergen_matcher().find_allergens(main));
                if standard.is_none() {
                    display_name = format!("{}（{}）", ingredient.name, main);
                }
            }
            if let Some(additive_text) = sections.additives {
                additives = self.additive_classifier().classify(additive_text);
            }
        }

        let detail_omitted = detail.is_some() && omission_eligible;
        if detail_omitted {
            debug!(
                ingredient = %ingredient.name,
                weight = ingredient.weight,
                total_weight,
                "Omitting composition detail of standard compound ingredient"
            );
        }

        CompoundResolution {
            display_name,
            allergens: allergens.into_iter().collect(),
            additives,
            is_standard: standard.is_some(),
            detail_omitted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOY_SAUCE_DETAIL: &str = "アミノ酸液、脱脂加工大豆、小麦、食塩／カラメル色素、調味料(アミノ酸等)";

    #[test]
    fn test_standard_ingredient_below_threshold_is_abbreviated() {
        let data = ReferenceData::bundled().unwrap();
        let resolver = CompoundResolver::new(&data);
        let soy_sauce = Ingredient::new("醤油", 4.0).with_detail(SOY_SAUCE_DETAIL);

        let resolution = resolver.resolve(&soy_sauce, 100.0);
        assert_eq!(resolution.display_name, "醤油");
        assert!(resolution.detail_omitted);
        assert!(resolution.additives.is_empty());
        // inherent allergens still declared
        assert_eq!(resolution.allergens, vec!["大豆", "小麦"]);
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let data = ReferenceData::bundled().unwrap();
        let resolver = CompoundResolver::new(&data);
        let standard = data.standard_ingredients.find("醤油");

        assert!(resolver.is_omission_eligible(standard, 4.9, 100.0));
        assert!(!resolver.is_omission_eligible(standard, 5.0, 100.0));
        assert!(!resolver.is_omission_eligible(None, 1.0, 100.0));
        assert!(!resolver.is_omission_eligible(standard, 1.0, 0.0));
    }

    #[test]
    fn test_standard_ingredient_above_threshold_is_expanded() {
        let data = ReferenceData::bundled().unwrap();
        let resolver = CompoundResolver::new(&data);
        let soy_sauce = Ingredient::new("醤油", 20.0).with_detail(SOY_SAUCE_DETAIL);

        let resolution = resolver.resolve(&soy_sauce, 85.0);
        assert_eq!(resolution.display_name, "醤油");
        assert!(!resolution.detail_omitted);
        assert_eq!(resolution.additives, vec!["カラメル色素", "調味料(アミノ酸等)"]);
    }

    #[test]
    fn test_non_standard_compound_shows_main_section() {
        let data = ReferenceData::bundled().unwrap();
        let resolver = CompoundResolver::new(&data);
        let sauce = Ingredient::new("特製たれ", 10.0).with_detail("砂糖、ごま、食塩／増粘剤(キサンタン)");

        let resolution = resolver.resolve(&sauce, 100.0);
        assert!(!resolution.is_standard);
        assert_eq!(resolution.display_name, "特製たれ（砂糖、ごま、食塩）");
        assert_eq!(resolution.allergens, vec!["ごま"]);
        assert_eq!(resolution.additives, vec!["増粘剤(キサンタン)"]);
    }

    #[test]
    fn test_ingredient_name_itself_declares_allergens() {
        let data = ReferenceData::bundled().unwrap();
        let resolver = CompoundResolver::new(&data);

        let resolution = resolver.resolve(&Ingredient::new("小麦粉", 50.0), 100.0);
        assert_eq!(resolution.display_name, "小麦粉");
        assert_eq!(resolution.allergens, vec!["小麦"]);
    }
}
