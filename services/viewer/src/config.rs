//! Application Configuration Module
//!
//! Centralizes the configuration for the viewer. Settings load from
//! environment variables into a single struct passed through the
//! application.

use std::env;
use tracing::Level;

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the companion backend.
    pub backend_base_url: String,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid log level provided for RUST_LOG: {0}")]
    InvalidLogLevel(String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    // *   `COMPANION_BACKEND_URL`: (Optional) Base URL of the backend. Defaults to "http://localhost:8000".
    // *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. Useful for local development, ignored if not present.
        dotenvy::dotenv().ok();

        let backend_base_url = env::var("COMPANION_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let log_level_str = env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(log_level_str))?;

        Ok(Self {
            backend_base_url,
            log_level,
        })
    }

    pub fn feedback_endpoint(&self) -> String {
        format!("{}/api/feedback", self.backend_base_url)
    }

    pub fn slide_change_endpoint(&self) -> String {
        format!("{}/api/slide-change", self.backend_base_url)
    }

    pub fn settings_endpoint(&self) -> String {
        format!("{}/api/settings", self.backend_base_url)
    }

    pub fn upload_endpoint(&self) -> String {
        format!("{}/api/upload", self.backend_base_url)
    }
}
