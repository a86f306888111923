//! Application configuration: defaults, config file, CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::util::paths::{config_path, default_identity_path};

pub const DEFAULT_API_URL: &str = "https://api.kiosk-shop.dev";
pub const DEFAULT_TOKENIZER_URL: &str = "https://pay.kiosk-shop.dev/tokens";

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Commerce API base URL
    pub api_url: String,
    /// Payment tokenizer endpoint
    pub tokenizer_url: String,
    /// Identity file hashed into the device fingerprint
    pub identity_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            tokenizer_url: DEFAULT_TOKENIZER_URL.to_string(),
            identity_path: default_identity_path(),
        }
    }
}

/// Partial config as parsed from the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
struct TomlConfig {
    api_url: Option<String>,
    tokenizer_url: Option<String>,
    identity: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path` (or the default location), falling
    /// back to defaults for anything missing or unparsable.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        let parsed = match fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str::<TomlConfig>(&raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config file");
                    TomlConfig::default()
                }
            },
            Err(_) => TomlConfig::default(),
        };

        let mut config = Config::default();
        if let Some(api_url) = parsed.api_url {
            config.api_url = api_url;
        }
        if let Some(tokenizer_url) = parsed.tokenizer_url {
            config.tokenizer_url = tokenizer_url;
        }
        if let Some(identity) = parsed.identity {
            config.identity_path = identity;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: TomlConfig = toml::from_str("api_url = \"http://localhost:9999\"").unwrap();
        assert_eq!(parsed.api_url.as_deref(), Some("http://localhost:9999"));
        assert!(parsed.tokenizer_url.is_none());
        assert!(parsed.identity.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/kiosk.toml")));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.tokenizer_url, DEFAULT_TOKENIZER_URL);
    }
}
