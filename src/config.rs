//! # Unified Application Configuration
//!
//! This module consolidates all settings of the label service into a single,
//! structured configuration object. It supports loading from environment
//! variables, validation, and a redacted summary for startup logs.

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Listening port
    pub port: u16,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> AppResult<()> {
        self.host.parse::<IpAddr>().map_err(|_| {
            AppError::Config(format!("Server host '{}' is not a valid IP address", self.host))
        })?;

        if self.port == 0 {
            return Err(AppError::Config("Server port cannot be 0".to_string()));
        }

        if self.max_body_bytes == 0 {
            return Err(AppError::Config("Max request body size cannot be 0".to_string()));
        }

        if self.max_body_bytes > 16 * 1024 * 1024 {
            return Err(AppError::Config(
                "Max request body size cannot be greater than 16 MiB".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            AppError::Config(format!("Server host '{}' is not a valid IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Location of reference table overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceDataConfig {
    /// Directory holding `allergens.json`, `additives.json` and
    /// `standard_ingredients.json`; bundled tables are used when unset
    pub data_dir: Option<PathBuf>,
}

impl ReferenceDataConfig {
    /// Validate reference data configuration
    pub fn validate(&self) -> AppResult<()> {
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(AppError::Config(
                    "REFERENCE_DATA_DIR cannot be empty when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Reference data configuration
    pub reference_data: ReferenceDataConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        // Server
        config.server.host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        config.server.port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Config("SERVER_PORT must be a valid port number".to_string()))?;
        config.server.max_body_bytes = env::var("MAX_REQUEST_BODY_BYTES")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("MAX_REQUEST_BODY_BYTES must be a valid number".to_string())
            })?;

        // Reference data
        config.reference_data.data_dir = env::var("REFERENCE_DATA_DIR").ok().map(PathBuf::from);

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.server.validate()?;
        self.reference_data.validate()?;
        self.observability.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: listen={}:{}, max_body_bytes={}, reference_data={}, environment={}, metrics_enabled={}",
            self.server.host,
            self.server.port,
            self.server.max_body_bytes,
            self.reference_data
                .data_dir
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "bundled".to_string()),
            self.observability.environment,
            self.observability.enable_metrics_export
        )
    }
}
