//! Configuration for the `todoterm` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/todoterm/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use todoterm_proto::UserId;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    ui: UiFileConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    user_id: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    error_timeout_ms: Option<u64>,
    offline_latency_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the todo service; `/todos` is appended.
    pub base_url: String,
    /// Owner of the list.
    pub user_id: UserId,
    /// Use the in-memory demo backend instead of the service.
    pub offline: bool,
    /// Simulated latency of the demo backend.
    pub offline_latency: Duration,
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// How long an error stays in the banner.
    pub error_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            user_id: UserId::new(2392),
            offline: false,
            offline_latency: Duration::from_millis(300),
            poll_timeout: Duration::from_millis(50),
            error_timeout: Duration::from_secs(3),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit config file cannot be read, or
    /// if any config file that exists cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| file.api.base_url.clone())
                .unwrap_or(defaults.base_url),
            user_id: cli
                .user_id
                .or(file.api.user_id)
                .map_or(defaults.user_id, UserId::new),
            offline: cli.offline,
            offline_latency: file
                .ui
                .offline_latency_ms
                .map_or(defaults.offline_latency, Duration::from_millis),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            error_timeout: file
                .ui
                .error_timeout_ms
                .map_or(defaults.error_timeout, Duration::from_millis),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal task list backed by a REST todo service")]
pub struct CliArgs {
    /// Base URL of the todo service.
    #[arg(long, env = "TODOTERM_BASE_URL")]
    pub base_url: Option<String>,

    /// User whose list is shown.
    #[arg(long, env = "TODOTERM_USER_ID")]
    pub user_id: Option<u64>,

    /// Path to config file (default: `~/.config/todoterm/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run against an in-memory demo list instead of the service.
    #[arg(long)]
    pub offline: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TODOTERM_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/todoterm.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Load and parse a TOML config file.
///
/// An explicit path must exist. The default path is optional.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("todoterm").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
