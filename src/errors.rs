//! # Application Error Types
//!
//! This module defines the error types used throughout the food labeler.
//! `AppError` covers process-level failures (configuration, reference data,
//! transport), `LabelError` covers the label-generation core.

use thiserror::Error;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// Configuration validation errors
    #[error("[CONFIG] {0}")]
    Config(String),
    /// Reference table loading or validation errors
    #[error("[REFERENCE_DATA] {0}")]
    ReferenceData(String),
    /// Validation errors (request payloads, inputs, etc.)
    #[error("[VALIDATION] {0}")]
    Validation(String),
    /// File system errors
    #[error("[FILESYSTEM] {0}")]
    FileSystem(String),
    /// Network/communication errors
    #[error("[NETWORK] {0}")]
    Network(String),
    /// Internal application errors
    #[error("[INTERNAL] {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

impl From<LabelError> for AppError {
    fn from(err: LabelError) -> Self {
        match err {
            LabelError::GenerationFailure(msg) => AppError::Internal(msg),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by the label-generation core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    /// A required product field is absent or blank
    #[error("[MISSING_FIELD] Required field '{0}' is missing")]
    MissingField(String),
    /// A weight value could not be read as a usable number
    #[error("[MALFORMED_WEIGHT] Field '{field}' has unusable weight value '{value}'")]
    MalformedWeight { field: String, value: String },
    /// Unexpected failure while assembling the label
    #[error("[GENERATION] Label generation failed: {0}")]
    GenerationFailure(String),
}

impl LabelError {
    /// Whether the error was caused by the caller's input rather than by the engine
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LabelError::GenerationFailure(_))
    }
}

pub type LabelResult<T> = Result<T, LabelError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::{error, warn};

    /// Log input validation problems with the offending field
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        field: &str,
        input_value: Option<&str>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            field = %field,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 { format!("{}...", v.chars().take(100).collect::<String>()) } else { v.to_string() }),
            "Validation failed"
        );
    }

    /// Log label generation failures with product context
    pub fn log_generation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        product_name: Option<&str>,
        ingredient_count: Option<usize>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            product_name = ?product_name,
            ingredient_count = ?ingredient_count,
            "Label generation failed"
        );
    }

    /// Log reference data problems with the table that caused them
    pub fn log_reference_data_error(
        error: &impl std::fmt::Display,
        table: &str,
        path: Option<&str>,
    ) {
        error!(
            error = %error,
            table = %table,
            path = ?path,
            "Reference data error"
        );
    }

    /// Log network/communication errors with connection context
    pub fn log_network_error(
        error: &impl std::fmt::Display,
        operation: &str,
        endpoint: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            endpoint = ?endpoint,
            "Network operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(
        error: &impl std::fmt::Display,
        config_key: &str,
        operation: &str,
    ) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display_carries_category() {
        let err = AppError::Config("SERVER_PORT must be a valid port number".to_string());
        assert_eq!(err.to_string(), "[CONFIG] SERVER_PORT must be a valid port number");

        let err = AppError::ReferenceData("empty allergen name".to_string());
        assert!(err.to_string().starts_with("[REFERENCE_DATA]"));
    }

    #[test]
    fn test_label_error_classification() {
        assert!(LabelError::MissingField("productName".to_string()).is_client_error());
        assert!(LabelError::MalformedWeight {
            field: "netWeight".to_string(),
            value: "abc".to_string()
        }
        .is_client_error());
        assert!(!LabelError::GenerationFailure("boom".to_string()).is_client_error());
    }

    #[test]
    fn test_label_error_into_app_error() {
        let app: AppError = LabelError::MissingField("manufacturer".to_string()).into();
        assert!(matches!(app, AppError::Validation(_)));

        let app: AppError = LabelError::GenerationFailure("template".to_string()).into();
        assert_eq!(app, AppError::Internal("template".to_string()));
    }
}
