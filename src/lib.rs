//! # Food Labeler
//!
//! Generates Japanese food-label ingredient statements from a product's
//! ingredient list: weight ordering, compound-ingredient breakdowns, additive
//! grouping and allergen disclosure. Served over a small JSON HTTP API.

pub mod additives;
pub mod allergens;
pub mod compound;
pub mod config;
pub mod errors;
pub mod label;
pub mod localization;
pub mod observability;
pub mod observability_config;
pub mod product;
pub mod reference_data;
pub mod server;
pub mod service;
pub mod text_processing;
pub mod validation;

// Re-export types for easier access
pub use errors::{AppError, AppResult, LabelError, LabelResult};
pub use label::{Label, LabelAssembler};
pub use product::{Ingredient, Product, ProductRequest};
pub use reference_data::ReferenceData;
pub use service::LabelService;
