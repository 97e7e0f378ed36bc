//! # Test Helper Library
//!
//! Common setup shared by the integration tests: a service over the bundled
//! reference data and a few sample product submissions.

#![allow(dead_code)]

use food_labeler::product::{IngredientRequest, ProductRequest, WeightInput};
use food_labeler::service::LabelService;

pub const SOY_SAUCE_DETAIL: &str =
    "アミノ酸液、脱脂加工大豆、小麦、食塩／カラメル色素、調味料(アミノ酸等)";

/// Service over the bundled tables
pub fn service() -> LabelService {
    LabelService::with_bundled_data().expect("bundled reference data must load")
}

/// Ingredient submission with a numeric weight
pub fn ingredient(name: &str, weight: f64) -> IngredientRequest {
    IngredientRequest {
        name: Some(name.to_string()),
        weight: Some(WeightInput::Number(weight)),
        origin: None,
        detail_ingredients: None,
    }
}

/// Ingredient submission with an origin country
pub fn ingredient_from(name: &str, weight: f64, origin: &str) -> IngredientRequest {
    IngredientRequest {
        origin: Some(origin.to_string()),
        ..ingredient(name, weight)
    }
}

/// Ingredient submission with composition detail
pub fn compound_ingredient(name: &str, weight: f64, detail: &str) -> IngredientRequest {
    IngredientRequest {
        detail_ingredients: Some(detail.to_string()),
        ..ingredient(name, weight)
    }
}

/// Product submission with the given ingredients
pub fn product(net_weight: f64, ingredients: Vec<IngredientRequest>) -> ProductRequest {
    ProductRequest {
        product_name: Some("テスト惣菜".to_string()),
        manufacturer: Some("テスト食品株式会社".to_string()),
        net_weight: Some(WeightInput::Number(net_weight)),
        storage_method: Some("要冷蔵（10℃以下）".to_string()),
        best_before: Some("2026.11.01".to_string()),
        ingredients,
    }
}

/// The simmered radish product used across scenarios
pub fn simmered_radish() -> ProductRequest {
    product(
        100.0,
        vec![
            ingredient_from("大根", 50.0, "国内"),
            compound_ingredient("醤油", 20.0, SOY_SAUCE_DETAIL),
            ingredient("砂糖", 15.0),
        ],
    )
}
