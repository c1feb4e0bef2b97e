//! TOML Configuration File Support
//!
//! Configuration lives at `~/.config/ticklist/config.toml`. Every key is
//! optional; a missing file means "all defaults".
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables (`TICKLIST_DATA_FILE`, `TICKLIST_FPS`, `TICKLIST_NOTIFY`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [storage]
//! data_file = "/home/me/notes/todos.json"
//!
//! [animation]
//! fps = 60
//! check_ms = 290
//! delete_ms = 200
//!
//! [notify]
//! enabled = true
//! command = ["notify-send", "--urgency=critical", "--", "{title}", "{body}"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{AnimationTimings, CHECK_ANIMATION, DEFAULT_FPS, DELETE_ANIMATION};

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "ticklist";

/// Environment variable overriding the task file location
pub const ENV_DATA_FILE: &str = "TICKLIST_DATA_FILE";

/// Environment variable overriding the tick rate
pub const ENV_FPS: &str = "TICKLIST_FPS";

/// Environment variable enabling or disabling desktop notifications
pub const ENV_NOTIFY: &str = "TICKLIST_NOTIFY";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Storage section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageToml {
    /// Task file location
    pub data_file: Option<PathBuf>,
}

/// Animation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationToml {
    /// Ticks per second while animating
    pub fps: Option<u32>,

    /// Check-off animation length in milliseconds
    pub check_ms: Option<u64>,

    /// Delete animation length in milliseconds
    pub delete_ms: Option<u64>,
}

/// Notification section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyToml {
    /// Whether deadline notifications reach the desktop
    pub enabled: Option<bool>,

    /// Notification command line; `{title}` and `{body}` are substituted
    pub command: Option<Vec<String>>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TicklistToml {
    /// Storage configuration section
    pub storage: StorageToml,

    /// Animation configuration section
    pub animation: AnimationToml,

    /// Notification configuration section
    pub notify: NotifyToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration
#[derive(Clone, Debug)]
pub struct TicklistConfig {
    /// Task file location
    pub data_file: PathBuf,

    /// Ticks per second while animating
    pub fps: u32,

    /// Check-off animation length
    pub check_animation: Duration,

    /// Delete animation length
    pub delete_animation: Duration,

    /// Whether deadline notifications reach the desktop
    pub notify_enabled: bool,

    /// Custom notification command line
    pub notify_command: Option<Vec<String>>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for TicklistConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            fps: DEFAULT_FPS,
            check_animation: CHECK_ANIMATION,
            delete_animation: DELETE_ANIMATION,
            notify_enabled: true,
            notify_command: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl TicklistConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Animation timings derived from this configuration
    #[must_use]
    pub fn timings(&self) -> AnimationTimings {
        AnimationTimings {
            check: self.check_animation,
            delete: self.delete_animation,
            frame_interval: AnimationTimings::interval_for_fps(self.fps),
        }
    }

    /// Log file next to the task file
    #[must_use]
    pub fn default_log_file(&self) -> PathBuf {
        self.data_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("ticklist.log")
    }

    /// Check that values are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero frame rate, a zero
    /// animation length, or an empty notification command.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ValidationError("fps must be at least 1".into()));
        }
        if self.check_animation.is_zero() {
            return Err(ConfigError::ValidationError("check_ms must be positive".into()));
        }
        if self.delete_animation.is_zero() {
            return Err(ConfigError::ValidationError("delete_ms must be positive".into()));
        }
        if self.notify_command.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::ValidationError("notify command is empty".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/ticklist/config.toml` or
/// `~/.config/ticklist/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
}

/// Default task file: `$XDG_DATA_HOME/ticklist/todos.json`, or `./todos.json`
#[must_use]
pub fn default_data_file() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("todos.json"),
        |p| p.join(APP_DIR).join("todos.json"),
    )
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the result fails validation. A missing config file is not an error.
pub fn load_config() -> Result<TicklistConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the result fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<TicklistConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// See [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<TicklistConfig, ConfigError> {
    let mut config = TicklistConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: TicklistToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut TicklistConfig, toml: &TicklistToml) {
    if let Some(ref path) = toml.storage.data_file {
        config.data_file = path.clone();
    }

    if let Some(fps) = toml.animation.fps {
        config.fps = fps;
    }
    if let Some(ms) = toml.animation.check_ms {
        config.check_animation = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.animation.delete_ms {
        config.delete_animation = Duration::from_millis(ms);
    }

    if let Some(enabled) = toml.notify.enabled {
        config.notify_enabled = enabled;
    }
    if toml.notify.command.is_some() {
        config.notify_command = toml.notify.command.clone();
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut TicklistConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(path) = env(ENV_DATA_FILE).filter(|p| !p.is_empty()) {
        config.data_file = PathBuf::from(path);
        config.source = ConfigSource::Env;
    }
    if let Some(fps) = env(ENV_FPS) {
        match fps.parse::<u32>() {
            Ok(fps) => {
                config.fps = fps;
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %fps, "Ignoring unparseable TICKLIST_FPS"),
        }
    }
    if let Some(enabled) = env(ENV_NOTIFY) {
        config.notify_enabled = enabled != "0" && enabled.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Task file override
    pub data_file: Option<PathBuf>,

    /// Frame rate override
    pub fps: Option<u32>,

    /// Notifications enabled override
    pub notify_enabled: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set task file override
    #[must_use]
    pub fn with_data_file(mut self, path: PathBuf) -> Self {
        self.data_file = Some(path);
        self
    }

    /// Set frame rate override
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set notifications enabled override
    #[must_use]
    pub fn with_notify_enabled(mut self, enabled: bool) -> Self {
        self.notify_enabled = Some(enabled);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden configuration fails validation.
    pub fn apply(&self, config: &mut TicklistConfig) -> Result<(), ConfigError> {
        if self.data_file.is_some() || self.fps.is_some() || self.notify_enabled.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref path) = self.data_file {
            config.data_file = path.clone();
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(enabled) = self.notify_enabled {
            config.notify_enabled = enabled;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = TicklistConfig::default();

        assert_eq!(config.fps, 60);
        assert_eq!(config.check_animation, Duration::from_millis(290));
        assert_eq!(config.delete_animation, Duration::from_millis(200));
        assert!(config.notify_enabled);
        assert_eq!(config.notify_command, None);
        assert!(config.data_file.ends_with("todos.json"));
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("ticklist"));
            assert!(p.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = write_config(
            r#"
[storage]
data_file = "/tmp/elsewhere/tasks.json"

[animation]
fps = 30
check_ms = 500
delete_ms = 100

[notify]
enabled = false
command = ["my-notify", "{title}: {body}"]
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/elsewhere/tasks.json"));
        assert_eq!(config.fps, 30);
        assert_eq!(config.check_animation, Duration::from_millis(500));
        assert_eq!(config.delete_animation, Duration::from_millis(100));
        assert!(!config.notify_enabled);
        assert_eq!(
            config.notify_command,
            Some(vec!["my-notify".to_string(), "{title}: {body}".to_string()])
        );
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_config("[animation]\nfps = 24\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.fps, 24);
        assert_eq!(config.check_animation, CHECK_ANIMATION);
        assert!(config.notify_enabled);
    }

    #[test]
    fn test_missing_file_graceful() {
        let config = load_config_with_env(
            Some(PathBuf::from("/nonexistent/ticklist/config.toml")),
            no_env,
        )
        .unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert_eq!(config.config_file_path, None);
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_config("[animation\nfps = \"fast\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_zero_values_rejected() {
        let file = write_config("[animation]\nfps = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));

        let file = write_config("[animation]\ncheck_ms = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[storage]\ndata_file = \"/from/file.json\"\n[animation]\nfps = 30\n");
        let env: HashMap<&str, &str> = [
            (ENV_DATA_FILE, "/from/env.json"),
            (ENV_FPS, "120"),
            (ENV_NOTIFY, "false"),
        ]
        .into_iter()
        .collect();

        let config = load_config_with_env(Some(file.path().to_path_buf()), |key| {
            env.get(key).map(ToString::to_string)
        })
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/from/env.json"));
        assert_eq!(config.fps, 120);
        assert!(!config.notify_enabled);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_unparseable_env_fps_is_ignored() {
        let config = load_config_with_env(None, |key| {
            (key == ENV_FPS).then(|| "sixty".to_string())
        })
        .unwrap();
        assert_eq!(config.fps, DEFAULT_FPS);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = TicklistConfig::default();
        config.fps = 120;
        config.set_source(ConfigSource::Env);

        ConfigOverrides::new()
            .with_fps(30)
            .with_notify_enabled(false)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.fps, 30);
        assert!(!config.notify_enabled);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = TicklistConfig::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_zero_fps_rejected() {
        let mut config = TicklistConfig::default();
        let result = ConfigOverrides::new().with_fps(0).apply(&mut config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_timings_and_log_file() {
        let mut config = TicklistConfig::default();
        config.fps = 50;
        config.data_file = PathBuf::from("/var/lib/ticklist/todos.json");

        let timings = config.timings();
        assert_eq!(timings.frame_interval, Duration::from_millis(20));
        assert_eq!(timings.check, CHECK_ANIMATION);
        assert_eq!(
            config.default_log_file(),
            PathBuf::from("/var/lib/ticklist/ticklist.log")
        );
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}
