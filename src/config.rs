/// Runtime configuration
///
/// The API credential comes from the environment (`GEMINI_API_KEY`, or
/// `API_KEY` as a fallback). Everything else has a default and can be
/// overridden from an optional JSON file in the user's config directory:
/// - Linux: ~/.config/mockup-studio/config.json
/// - macOS: ~/Library/Application Support/mockup-studio/config.json
/// - Windows: %APPDATA%\mockup-studio\config.json

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_COMPOSITE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API key set. Export GEMINI_API_KEY (or API_KEY) and restart.")]
    MissingApiKey,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Resolved configuration for the remote image service
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub generation_model: String,
    pub composite_model: String,
    pub request_timeout: Duration,
}

/// Optional overrides read from config.json
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileOverrides {
    base_url: Option<String>,
    generation_model: Option<String>,
    composite_model: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Config {
    /// Defaults for everything but the credential
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            composite_model: DEFAULT_COMPOSITE_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from the process environment and the default config file
    pub fn load() -> Result<Self, ConfigError> {
        let api_key = api_key_from(|name| std::env::var(name).ok())?;
        let mut config = Self::with_api_key(api_key);

        if let Some(path) = Self::config_file_path() {
            config.apply_file(&path)?;
        }

        Ok(config)
    }

    /// Where the optional overrides file lives
    pub fn config_file_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("mockup-studio");
        path.push("config.json");
        Some(path)
    }

    /// Merge overrides from a JSON file. A missing file is not an error.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let overrides: FileOverrides =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("Loaded config overrides from {}", path.display());

        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = overrides.generation_model {
            self.generation_model = model;
        }
        if let Some(model) = overrides.composite_model {
            self.composite_model = model;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }

        Ok(())
    }
}

/// First non-blank credential among the known variables
fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}
