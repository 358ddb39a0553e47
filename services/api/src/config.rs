//! Configuration for the companion API service, loaded from environment
//! variables with sensible defaults for local development.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Where the student profile settings are persisted.
    pub settings_file: PathBuf,
}

impl Config {
    // *   `COMPANION_API_ADDR`: (Optional) Bind address. Defaults to "0.0.0.0:8000".
    // *   `COMPANION_SETTINGS_FILE`: (Optional) Settings file path. Defaults to "data/settings.json".
    pub fn from_env() -> Self {
        // Load .env file. Useful for local development, ignored if not present.
        dotenvy::dotenv().ok();

        let bind_addr =
            env::var("COMPANION_API_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let settings_file = env::var("COMPANION_SETTINGS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/settings.json"));

        Self {
            bind_addr,
            settings_file,
        }
    }
}
