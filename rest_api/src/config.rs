// rest_api/src/config.rs

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use security::DEFAULT_TOKEN_TTL_HOURS;

/// Server configuration. Loaded from a YAML file when one is present,
/// with environment variables taking precedence; the JWT secret and the
/// store path are injected from here at startup rather than read as
/// ambient globals.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub data_directory: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8082,
            data_directory: "clinic_data".to_string(),
            jwt_secret: "change-me-this-secret-should-be-at-least-32-bytes".to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

/// Reads `clinic_config.yaml` (or the file named by `CLINIC_CONFIG`) if
/// it exists, then applies environment overrides.
pub fn load_config() -> Result<ApiConfig> {
    let path = std::env::var("CLINIC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("clinic_config.yaml"));

    let mut config = if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml2::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {}", path.display(), e))?
    } else {
        ApiConfig::default()
    };

    if let Ok(host) = std::env::var("CLINIC_HOST") {
        config.host = host;
    }
    if let Ok(port) = std::env::var("CLINIC_PORT") {
        config.port = port
            .parse()
            .with_context(|| format!("invalid CLINIC_PORT: {}", port))?;
    }
    if let Ok(dir) = std::env::var("CLINIC_DATA_DIR") {
        config.data_directory = dir;
    }
    if let Ok(secret) = std::env::var("CLINIC_JWT_SECRET") {
        config.jwt_secret = secret;
    }
    if let Ok(ttl) = std::env::var("CLINIC_TOKEN_TTL_HOURS") {
        config.token_ttl_hours = ttl
            .parse()
            .with_context(|| format!("invalid CLINIC_TOKEN_TTL_HOURS: {}", ttl))?;
    }

    Ok(config)
}
