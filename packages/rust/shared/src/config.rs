//! Application configuration for chaptervec.
//!
//! User config lives at `~/.chaptervec/chaptervec.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ChapterVecError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "chaptervec.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".chaptervec";

// ---------------------------------------------------------------------------
// Config structs (matching chaptervec.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// OpenAI embedding settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory holding chapter text files.
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: String,

    /// Path to the vector store database file.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            db_path: default_db_path(),
        }
    }
}

fn default_corpus_dir() -> String {
    "data".into()
}
fn default_db_path() -> String {
    "vectorstore.db".into()
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Embedding model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Embeddings endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_model() -> String {
    "text-embedding-ada-002".into()
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1/embeddings".into()
}
fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Embedder config (runtime, merged from config + resolved credential)
// ---------------------------------------------------------------------------

/// Runtime embedder configuration — config file values plus the resolved
/// API key. Built once at startup after pre-flight validation.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// The resolved API key.
    pub api_key: String,
    /// Embedding model identifier.
    pub model: String,
    /// Embeddings endpoint URL.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl EmbedderConfig {
    /// Build a runtime embedder config from the app config, resolving the
    /// API key from the configured environment variable. Fails fast with a
    /// config error if the key is absent — before any file is touched.
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let api_key = resolve_api_key(config)?;
        Ok(Self {
            api_key,
            model: config.openai.model.clone(),
            endpoint: config.openai.endpoint.clone(),
            timeout: Duration::from_secs(config.openai.timeout_secs),
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.chaptervec/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ChapterVecError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.chaptervec/chaptervec.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ChapterVecError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ChapterVecError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ChapterVecError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ChapterVecError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ChapterVecError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Resolve the OpenAI API key from the configured env var.
/// An unset or empty variable is a fatal configuration error.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.openai.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(ChapterVecError::config(format!(
            "OpenAI API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("corpus_dir"));
        assert!(toml_str.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.db_path, "vectorstore.db");
        assert_eq!(parsed.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(parsed.openai.model, "text-embedding-ada-002");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
corpus_dir = "/srv/chapters"

[openai]
model = "text-embedding-3-small"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.corpus_dir, "/srv/chapters");
        assert_eq!(config.defaults.db_path, "vectorstore.db");
        assert_eq!(config.openai.model, "text-embedding-3-small");
        assert_eq!(config.openai.timeout_secs, 30);
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.openai.api_key_env = "CV_TEST_NONEXISTENT_KEY_12345".into();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }

    #[test]
    fn embedder_config_fails_without_key() {
        let mut config = AppConfig::default();
        config.openai.api_key_env = "CV_TEST_NONEXISTENT_KEY_67890".into();
        assert!(EmbedderConfig::from_app_config(&config).is_err());
    }
}
