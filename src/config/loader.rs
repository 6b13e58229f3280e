//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides,
/// then validation.
///
/// The deployment-supplied values (API key, API version, allowed origins,
/// inbound bearer token) come from the environment and take precedence
/// over anything in the file.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment-supplied values onto the configuration.
fn apply_env_overrides(config: &mut ProxyConfig) {
    if let Ok(key) = std::env::var("PINECONE_API_KEY") {
        config.upstream.api_key = key;
    }
    if let Ok(version) = std::env::var("PINECONE_API_VERSION") {
        config.upstream.api_version = version;
    }
    if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
        let parsed: Vec<String> = origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if !parsed.is_empty() {
            config.cors.allowed_origins = parsed;
        }
    }
    if let Ok(token) = std::env::var("PROXY_BEARER_TOKEN") {
        config.auth.bearer_token = token;
    }
}
