//! osascript adapter configuration.

use serde::Deserialize;

/// Programs and target application used by the osascript adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsascriptConfig {
    /// Path or name of the AppleScript runner.
    pub osascript: String,
    /// Path or name of the Shortcuts command line tool.
    pub shortcuts: String,
    /// Scriptable music application.
    pub application: String,
}

impl Default for OsascriptConfig {
    fn default() -> Self {
        Self {
            osascript: "osascript".to_string(),
            shortcuts: "shortcuts".to_string(),
            application: "Music".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = OsascriptConfig::default();
        assert_eq!(config.osascript, "osascript");
        assert_eq!(config.shortcuts, "shortcuts");
        assert_eq!(config.application, "Music");
    }

    #[test]
    fn should_fill_missing_fields_with_defaults() {
        let config: OsascriptConfig =
            serde_json::from_value(serde_json::json!({"application": "iTunes"})).unwrap();
        assert_eq!(config.application, "iTunes");
        assert_eq!(config.osascript, "osascript");
    }
}
