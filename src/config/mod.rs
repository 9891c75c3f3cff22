//! TOML configuration loading.
//!
//! All fields are optional; a missing file is not an error and yields
//! defaults. Precedence: explicit path, then the `HISTVIEW_CONFIG`
//! environment variable, then `<config_dir>/histview/config.toml`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read an existing config file.
    #[error("failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML.
    #[error("invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// Corresponds to `~/.config/histview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Children shown per group before a load-more sentinel.
    #[serde(default)]
    pub initial_visible_events: Option<usize>,

    /// Children revealed by each load-more.
    #[serde(default)]
    pub visible_events_step: Option<usize>,

    /// Debounce window between a filter change and its fetch, in
    /// milliseconds.
    #[serde(default)]
    pub fetch_debounce_ms: Option<u64>,

    /// Default page size.
    #[serde(default)]
    pub page_limit: Option<usize>,

    /// Directory persisted filter snapshots are written under.
    #[serde(default)]
    pub filter_dir: Option<PathBuf>,

    /// Path of the tracing log file.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration: defaults overlaid with whatever the file set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Children shown per group before a load-more sentinel.
    pub initial_visible_events: usize,
    /// Children revealed by each load-more.
    pub visible_events_step: usize,
    /// Debounce window between a filter change and its fetch.
    pub fetch_debounce: Duration,
    /// Default page size.
    pub page_limit: usize,
    /// Directory persisted filter snapshots are written under, if any
    /// platform data directory exists.
    pub filter_dir: Option<PathBuf>,
    /// Path of the tracing log file.
    pub log_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_visible_events: crate::rows::INITIAL_VISIBLE_EVENTS,
            visible_events_step: crate::rows::VISIBLE_EVENTS_STEP,
            fetch_debounce: Duration::from_millis(200),
            page_limit: 10,
            filter_dir: default_filter_dir(),
            log_file_path: default_log_path(),
        }
    }
}

impl Config {
    /// Row planner configured with this config's limits.
    pub fn planner(&self) -> crate::rows::RowPlanner {
        crate::rows::RowPlanner::with_limits(self.initial_visible_events, self.visible_events_step)
    }

    /// File-backed snapshot store under the configured directory, or `None`
    /// when no directory could be resolved.
    pub fn filter_store(&self) -> Option<crate::persistence::JsonFileStore> {
        self.filter_dir
            .as_ref()
            .map(crate::persistence::JsonFileStore::new)
    }
}

/// Default snapshot directory: `<data_dir>/histview/filters`.
pub fn default_filter_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("histview").join("filters"))
}

/// Default log file path: `<state_dir>/histview/histview.log`, falling back
/// to the current directory when no state directory exists.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("histview").join("histview.log"),
        None => PathBuf::from("histview.log"),
    }
}

/// Default config file path, or `None` when the platform reports no config
/// directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("histview").join("config.toml"))
}

/// Load a config file from `path`.
///
/// Returns `Ok(None)` if the file does not exist; errors only when an
/// existing file cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence, highest first: explicit `config_path`, the
/// `HISTVIEW_CONFIG` environment variable, then the default path. A missing
/// file at any of these is not an error.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("HISTVIEW_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Overlay a loaded config file onto the defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> Config {
    let defaults = Config::default();

    let Some(config) = config_file else {
        return defaults;
    };

    Config {
        initial_visible_events: config
            .initial_visible_events
            .unwrap_or(defaults.initial_visible_events),
        visible_events_step: config
            .visible_events_step
            .unwrap_or(defaults.visible_events_step),
        fetch_debounce: config
            .fetch_debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_debounce),
        page_limit: config.page_limit.unwrap_or(defaults.page_limit),
        filter_dir: config.filter_dir.or(defaults.filter_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}
