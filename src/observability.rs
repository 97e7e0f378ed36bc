//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection with a Prometheus recorder
//! - Span and metric helpers used by the label service and HTTP server

use std::time::Duration;

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::observability_config::{LogFormat, ObservabilityConfig};

/// Initialize logging and metrics
///
/// Returns the Prometheus handle when metrics export is enabled.
pub fn init_observability_with_config(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;
    let metrics_handle = init_metrics_with_config(config)?;

    tracing::info!(
        environment = %config.environment,
        metrics_enabled = %metrics_handle.is_some(),
        "Observability stack initialized successfully"
    );
    Ok(metrics_handle)
}

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("food_labeler={}", config.log_level.to_lowercase()).parse()?)
        .add_directive("hyper=warn".parse()?);

    let log_format = config.effective_log_format();
    let init_result = match log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init(),
    };
    init_result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        log_format = ?log_format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Initialize metrics collection with Prometheus exporter and configuration
pub fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enable_metrics_export {
        tracing::info!("Metrics export disabled");
        return Ok(None);
    }

    let handle = PrometheusBuilder::new().install_recorder()?;

    tracing::info!("Metrics collection initialized");
    Ok(Some(handle))
}

/// Create a span for label operations
pub fn label_span(operation: &str) -> tracing::Span {
    tracing::info_span!("label_operation", operation = operation, component = "label")
}

/// Create a span for one HTTP request
pub fn request_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = method,
        path = path,
        component = "server"
    )
}

/// Record label generation metrics
pub fn record_label_metrics(success: bool, duration: Duration, ingredient_count: usize) {
    metrics::counter!("label_generations_total", "result" => if success { "success" } else { "failure" }).increment(1);
    metrics::histogram!("label_generation_duration_seconds").record(duration.as_secs_f64());
    metrics::histogram!("label_ingredient_count").record(ingredient_count as f64);
}

/// Record request metrics
pub fn record_request_metrics(method: &str, status: u16, duration: Duration) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("requests_total", "method" => method, "status" => status).increment(1);
    metrics::histogram!("request_duration_seconds").record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability_config::presets;

    #[test]
    fn test_metrics_disabled_returns_no_handle() {
        let handle = init_metrics_with_config(&presets::minimal()).unwrap();
        assert!(handle.is_none());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_label_metrics(true, Duration::from_millis(3), 4);
        record_request_metrics("POST", 200, Duration::from_millis(5));
    }

    #[test]
    fn test_spans_carry_operation() {
        let span = label_span("generate_label");
        // Disabled when no subscriber is installed; creation must still succeed
        let _guard = span.enter();
        let _request = request_span("GET", "/health/live");
    }
}
