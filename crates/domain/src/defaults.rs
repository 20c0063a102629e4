//! Defaults — the backend/rooms/volume/shuffle record steps inherit from.
//!
//! An automation document may carry its own [`Defaults`]; the configuration
//! document carries [`ConfigDefaults`]. [`resolve`] merges the two into the
//! effective defaults threaded through a run.

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::config::ConfigDefaults;
use crate::error::ConfigStateError;

/// Document-level (and effective) defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
    /// `""`, `"continuous"` or `"discrete"`. Checked when a step runs.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backend: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rooms: Vec<String>,
    /// Range-checked when a step uses it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
}

impl Defaults {
    /// Backend steps run on; blank means continuous.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStateError::UnknownBackend`] for unrecognised tokens.
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigStateError> {
        BackendKind::effective(&self.backend)
    }
}

/// Merge configuration defaults with document defaults.
///
/// Document values win field by field: a non-blank `backend`, non-empty
/// `rooms`, and any present `volume` or `shuffle`. Everything else is copied
/// from the configuration. Neither input is touched and the returned `rooms`
/// never shares storage with either of them.
///
/// The configuration's `shuffle` is a plain boolean, so once a configuration
/// is present the resolved `shuffle` is always `Some`.
#[must_use]
pub fn resolve(config: Option<&ConfigDefaults>, document: Option<&Defaults>) -> Defaults {
    let mut resolved = document.cloned().unwrap_or_default();
    let Some(config) = config else {
        return resolved;
    };

    if resolved.backend.trim().is_empty() {
        resolved.backend.clone_from(&config.backend);
    }
    if resolved.rooms.is_empty() {
        resolved.rooms.clone_from(&config.rooms);
    }
    if resolved.volume.is_none() {
        resolved.volume = config.volume.map(i64::from);
    }
    if resolved.shuffle.is_none() {
        resolved.shuffle = Some(config.shuffle);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Volume;

    fn config_defaults() -> ConfigDefaults {
        ConfigDefaults {
            backend: "discrete".to_string(),
            rooms: vec!["Kitchen".to_string(), "Bedroom".to_string()],
            volume: Volume::new(25),
            shuffle: true,
        }
    }

    #[test]
    fn should_fill_every_field_from_config_when_document_is_absent() {
        let resolved = resolve(Some(&config_defaults()), None);
        assert_eq!(resolved.backend, "discrete");
        assert_eq!(resolved.rooms, vec!["Kitchen", "Bedroom"]);
        assert_eq!(resolved.volume, Some(25));
        assert_eq!(resolved.shuffle, Some(true));
    }

    #[test]
    fn should_prefer_document_values() {
        let document = Defaults {
            backend: "continuous".to_string(),
            rooms: vec!["Office".to_string()],
            volume: Some(60),
            shuffle: Some(false),
        };
        let resolved = resolve(Some(&config_defaults()), Some(&document));
        assert_eq!(resolved, document);
    }

    #[test]
    fn should_treat_blank_document_backend_as_absent() {
        let document = Defaults {
            backend: "   ".to_string(),
            ..Defaults::default()
        };
        let resolved = resolve(Some(&config_defaults()), Some(&document));
        assert_eq!(resolved.backend, "discrete");
    }

    #[test]
    fn should_return_document_unchanged_without_config() {
        let document = Defaults {
            backend: String::new(),
            rooms: vec!["Office".to_string()],
            volume: None,
            shuffle: None,
        };
        assert_eq!(resolve(None, Some(&document)), document);
        assert_eq!(resolve(None, None), Defaults::default());
    }

    #[test]
    fn should_not_share_rooms_with_inputs() {
        let config = config_defaults();
        let before = config.clone();
        let mut resolved = resolve(Some(&config), None);
        resolved.rooms.push("Garage".to_string());
        assert_eq!(config, before);
        assert_ne!(resolved.rooms.as_ptr(), config.rooms.as_ptr());

        let document = Defaults {
            rooms: vec!["Office".to_string()],
            ..Defaults::default()
        };
        let resolved = resolve(Some(&config), Some(&document));
        assert_ne!(resolved.rooms.as_ptr(), document.rooms.as_ptr());
        assert_eq!(document.rooms, vec!["Office"]);
    }

    #[test]
    fn should_not_distinguish_unset_shuffle_from_config_false() {
        let config = ConfigDefaults {
            shuffle: false,
            ..config_defaults()
        };
        let unset = resolve(Some(&config), Some(&Defaults::default()));
        let explicit = resolve(
            Some(&config),
            Some(&Defaults {
                shuffle: Some(false),
                ..Defaults::default()
            }),
        );
        assert_eq!(unset.shuffle, explicit.shuffle);
    }

    #[test]
    fn should_default_backend_kind_to_continuous() {
        assert_eq!(
            Defaults::default().backend_kind().unwrap(),
            BackendKind::Continuous
        );
    }
}
