//! Application configuration for Webstash.
//!
//! User config lives at `~/.webstash/webstash.toml`.
//! A missing config file is not an error: every field has a default, so the
//! host comes up with the stock ChromaDB sink on `localhost:8000`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WebstashError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "webstash.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".webstash";

// ---------------------------------------------------------------------------
// Config structs (matching webstash.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persistence sink selection.
    #[serde(default)]
    pub sink: SinkConfig,

    /// Document-store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Filesystem-sink settings.
    #[serde(default)]
    pub filesystem: FilesystemConfig,
}

/// Which persistence sink captured content goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    /// ChromaDB-compatible document store over HTTP.
    Chroma,
    /// Plain files under a sandbox directory.
    Filesystem,
}

/// `[sink]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink backend: `chroma` (default) or `filesystem`.
    #[serde(default = "default_backend")]
    pub backend: SinkBackend,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_backend() -> SinkBackend {
    SinkBackend::Chroma
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the document store's HTTP API.
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Timeout in seconds for each store call, so a stalled store degrades
    /// to a reported error instead of hanging the request loop.
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            timeout_secs: default_store_timeout(),
        }
    }
}

fn default_store_url() -> String {
    "http://localhost:8000".into()
}
fn default_store_timeout() -> u64 {
    10
}

/// `[filesystem]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesystemConfig {
    /// Sandbox root that all derived page paths are joined under.
    /// Defaults to `~/webstash-pages`.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl FilesystemConfig {
    /// Resolve the sandbox root, falling back to `~/webstash-pages`.
    pub fn resolved_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(p) => Ok(p.clone()),
            None => dirs::home_dir()
                .map(|home| home.join("webstash-pages"))
                .ok_or_else(|| WebstashError::config("could not determine home directory")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.webstash/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WebstashError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.webstash/webstash.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| WebstashError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| WebstashError::config(format!("failed to parse {}: {e}", path.display())))?;

    if config.store.url.is_empty() {
        return Err(WebstashError::config("store.url must not be empty"));
    }
    if config.store.timeout_secs == 0 {
        return Err(WebstashError::config("store.timeout_secs must be > 0"));
    }

    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| WebstashError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WebstashError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WebstashError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
