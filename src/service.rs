//! # Label Service
//!
//! Request/response facade over the label engine. One `LabelService` is built
//! at startup and shared by all concurrent requests; every call works on its
//! own inputs and the immutable reference tables, so no locking is involved.

use crate::compound::{CompoundAnalysis, CompoundResolver};
use crate::errors::{error_logging, AppResult, LabelError, LabelResult};
use crate::label::{Label, LabelAssembler};
use crate::localization::LabelVocabulary;
use crate::observability;
use crate::product::ProductRequest;
use crate::reference_data::ReferenceData;
use crate::validation::validate_product;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Body of a compound-ingredient check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckIngredientRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Result of a compound-ingredient check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIngredientResponse {
    pub is_compound: bool,
}

/// Body of a standalone composition analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeCompoundRequest {
    #[serde(default)]
    pub details: Option<String>,
}

/// Entry point for the three label operations
#[derive(Debug, Clone)]
pub struct LabelService {
    reference: Arc<ReferenceData>,
    vocabulary: Arc<LabelVocabulary>,
}

impl LabelService {
    pub fn new(reference: Arc<ReferenceData>, vocabulary: Arc<LabelVocabulary>) -> Self {
        Self {
            reference,
            vocabulary,
        }
    }

    /// Service over the bundled reference tables and vocabulary
    pub fn with_bundled_data() -> AppResult<Self> {
        Ok(Self::new(
            Arc::new(ReferenceData::bundled()?),
            Arc::new(LabelVocabulary::new()?),
        ))
    }

    pub fn reference_data(&self) -> &ReferenceData {
        &self.reference
    }

    /// Report whether `name` is a known compound ingredient
    pub fn check_ingredient(&self, name: &str) -> LabelResult<CheckIngredientResponse> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LabelError::MissingField("name".to_string()));
        }

        let is_compound = CompoundResolver::new(&self.reference).is_compound(name);
        tracing::debug!(name = %name, is_compound, "Checked ingredient");
        Ok(CheckIngredientResponse { is_compound })
    }

    /// Detect allergens and additives in a standalone composition text
    pub fn analyze_compound(&self, details: &str) -> LabelResult<CompoundAnalysis> {
        if details.trim().is_empty() {
            return Err(LabelError::MissingField("details".to_string()));
        }

        let analysis = CompoundResolver::new(&self.reference).analyze(details);
        tracing::debug!(
            allergens = ?analysis.allergens,
            additives = ?analysis.additives,
            "Analyzed compound ingredient"
        );
        Ok(analysis)
    }

    /// Validate a product submission and generate its label
    pub fn generate_label(&self, request: &ProductRequest) -> LabelResult<Label> {
        let span = observability::label_span("generate_label");
        let start = Instant::now();

        let result = span.in_scope(|| {
            let product = validate_product(request)?;
            LabelAssembler::new(&self.reference, &self.vocabulary).assemble(&product)
        });

        let duration = start.elapsed();
        observability::record_label_metrics(result.is_ok(), duration, request.ingredients.len());

        match &result {
            Ok(label) => info!(
                product = %label.name,
                ingredient_count = request.ingredients.len(),
                duration_ms = duration.as_millis() as u64,
                "Label generated"
            ),
            Err(err) if err.is_client_error() => error_logging::log_validation_error(
                err,
                "generate_label",
                "product",
                request.product_name.as_deref(),
            ),
            Err(err) => error_logging::log_generation_error(
                err,
                "generate_label",
                request.product_name.as_deref(),
                Some(request.ingredients.len()),
            ),
        }

        result
    }
}
