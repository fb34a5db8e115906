//! Application configuration for contribsync.
//!
//! User config lives at `~/.contribsync/contribsync.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ContribSyncError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "contribsync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".contribsync";

// ---------------------------------------------------------------------------
// Config structs (matching contribsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Snapshot storage settings.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Repository slug (`owner/name`) whose contributors are aggregated.
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Base URL of the API host.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Page size for the contributors listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            api_base: default_api_base(),
            page_size: default_page_size(),
        }
    }
}

fn default_repo() -> String {
    "forge-ui/forge-ui".into()
}
fn default_api_base() -> String {
    "https://api.github.com".into()
}
fn default_page_size() -> u32 {
    100
}

/// `[snapshot]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Path of the JSON snapshot consumed by the docs site.
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/contributors.json".into()
}

// ---------------------------------------------------------------------------
// Sync config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime aggregation configuration — merged from config file + CLI flags.
///
/// The `build` flag is supplied explicitly by the caller rather than read
/// from ambient process state, so the orchestrator's behavior is fully
/// determined by this struct.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Repository slug (`owner/name`).
    pub repo: String,
    /// Base URL of the API host.
    pub api_base: String,
    /// Page size for the contributors listing.
    pub page_size: u32,
    /// Snapshot file location.
    pub snapshot_path: PathBuf,
    /// Whether this invocation runs in a build context (forces a refresh).
    pub build: bool,
}

impl SyncConfig {
    /// Merge an [`AppConfig`] with the caller-supplied build flag.
    pub fn from_config(config: &AppConfig, build: bool) -> Self {
        Self {
            repo: config.github.repo.clone(),
            api_base: config.github.api_base.clone(),
            page_size: config.github.page_size,
            snapshot_path: PathBuf::from(&config.snapshot.path),
            build,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.contribsync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ContribSyncError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.contribsync/contribsync.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| ContribSyncError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ContribSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ContribSyncError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ContribSyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ContribSyncError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
