//! Runtime settings — TOML file with environment variable overrides.
//!
//! Looks for `roomcast.toml` in the working directory unless `--settings`
//! points elsewhere. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.
//!
//! These settings only describe *how* roomcast runs. Defaults, aliases and
//! shortcut mappings live in the configuration document, see
//! [`Settings::document_path`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use roomcast_adapter_osascript::OsascriptConfig;
use serde::Deserialize;

/// Top-level settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Configuration document location.
    pub document: DocumentSettings,
    /// Playback backend settings.
    pub backend: BackendSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// JSON file holding the configuration document. Defaults to
    /// `<config dir>/roomcast/config.json`.
    pub path: Option<PathBuf>,
}

/// Which player implementation drives the steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Music.app through `osascript` and the `shortcuts` CLI.
    Osascript,
    /// In-memory simulated player.
    Virtual,
}

impl Default for Driver {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Osascript
        } else {
            Self::Virtual
        }
    }
}

impl std::str::FromStr for Driver {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "osascript" => Ok(Self::Osascript),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!("unknown driver: {other}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub driver: Driver,
    /// How often `wait` steps poll the player, in milliseconds.
    pub poll_interval_ms: u64,
    /// Programs used by the `osascript` driver.
    pub osascript: OsascriptConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Settings {
    /// Load settings from `path` (if present), apply environment-variable
    /// overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting settings are invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = Self::from_file(path)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("ROOMCAST_CONFIG") {
            self.document.path = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("ROOMCAST_DRIVER") {
            self.backend.driver = val.parse()?;
        }
        if let Some(val) = lookup("ROOMCAST_POLL_MS") {
            self.backend.poll_interval_ms = val.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("ROOMCAST_POLL_MS is not a number: {val}"))
            })?;
        }
        if let Some(val) = lookup("ROOMCAST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Location of the configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when no path is configured and the
    /// platform has no configuration directory.
    pub fn document_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.document.path {
            return Ok(path.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("roomcast").join("config.json"))
            .ok_or_else(|| {
                ConfigError::Validation(
                    "no configuration directory, set ROOMCAST_CONFIG".to_string(),
                )
            })
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.backend.poll_interval_ms)
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            poll_interval_ms: 1_000,
            osascript: OsascriptConfig::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "roomcast=info,roomcast_app=info,roomcast_adapter_osascript=warn".to_string(),
        }
    }
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse settings file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read settings file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid settings: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.backend.poll_interval_ms, 1_000);
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
        assert!(settings.document.path.is_none());
        assert_eq!(settings.backend.osascript.application, "Music");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.backend.poll_interval_ms, 1_000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [document]
            path = '/tmp/roomcast.json'

            [backend]
            driver = 'virtual'
            poll_interval_ms = 250

            [backend.osascript]
            application = 'iTunes'

            [logging]
            filter = 'debug'
        ";
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(
            settings.document.path.as_deref(),
            Some(Path::new("/tmp/roomcast.json"))
        );
        assert_eq!(settings.backend.driver, Driver::Virtual);
        assert_eq!(settings.backend.poll_interval_ms, 250);
        assert_eq!(settings.backend.osascript.application, "iTunes");
        assert_eq!(settings.backend.osascript.osascript, "osascript");
        assert_eq!(settings.logging.filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let settings = Settings::from_file(Path::new("nonexistent-roomcast.toml")).unwrap();
        assert_eq!(settings.backend.poll_interval_ms, 1_000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomcast.toml");
        std::fs::write(&path, "invalid {{{").unwrap();
        assert!(matches!(
            Settings::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(env(&[
                ("ROOMCAST_CONFIG", "/etc/roomcast.json"),
                ("ROOMCAST_DRIVER", "Virtual"),
                ("ROOMCAST_POLL_MS", "50"),
                ("ROOMCAST_LOG", "warn"),
            ]))
            .unwrap();
        assert_eq!(
            settings.document_path().unwrap(),
            PathBuf::from("/etc/roomcast.json")
        );
        assert_eq!(settings.backend.driver, Driver::Virtual);
        assert_eq!(settings.poll_interval(), Duration::from_millis(50));
        assert_eq!(settings.logging.filter, "warn");
    }

    #[test]
    fn should_prefer_rust_log_over_roomcast_log() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(env(&[("ROOMCAST_LOG", "warn"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(settings.logging.filter, "trace");
    }

    #[test]
    fn should_reject_unknown_driver_override() {
        let mut settings = Settings::default();
        let err = settings
            .apply_overrides(env(&[("ROOMCAST_DRIVER", "bluetooth")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid settings: unknown driver: bluetooth");
    }

    #[test]
    fn should_reject_zero_poll_interval() {
        let mut settings = Settings::default();
        settings.backend.poll_interval_ms = 0;
        assert!(settings.validate().is_err());
    }
}
