//! Configuration document — defaults, aliases and discrete shortcut maps.
//!
//! The document is the only durable state roomcast owns. It is edited
//! through dotted paths (see [`ConfigPath`]) and read during runs for
//! defaults and for the discrete backend's shortcut mappings.

mod path;
mod value;

pub use path::{AliasField, ConfigPath};
pub use value::{ConfigValue, parse_bool};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::defaults::Defaults;
use crate::error::{RoomcastError, ValidationError};
use crate::volume::Volume;

/// Nested configuration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigDocument {
    pub defaults: ConfigDefaults,
    pub aliases: BTreeMap<String, AliasConfig>,
    pub native: NativeConfig,
}

/// Configuration-level defaults. `shuffle` is a plain boolean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigDefaults {
    pub backend: String,
    pub rooms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,
    pub shuffle: bool,
}

/// A named shortcut for a play request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AliasConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backend: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rooms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub playlist: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub playlist_id: String,
    /// A shortcut run as-is, bypassing playback resolution.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub shortcut: String,
}

impl AliasConfig {
    /// The alias expressed as document-level defaults.
    #[must_use]
    pub fn to_defaults(&self) -> Defaults {
        Defaults {
            backend: self.backend.clone(),
            rooms: self.rooms.clone(),
            volume: self.volume.map(i64::from),
            shuffle: self.shuffle,
        }
    }
}

/// Shortcut maps for the discrete backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeConfig {
    /// room → playlist name → shortcut name.
    pub playlists: BTreeMap<String, BTreeMap<String, String>>,
    /// room → volume level (decimal string) → shortcut name.
    pub volume_shortcuts: BTreeMap<String, BTreeMap<String, String>>,
}

impl NativeConfig {
    /// Shortcut that starts `playlist` in `room`.
    ///
    /// Keys are matched exactly first, then case-insensitively.
    #[must_use]
    pub fn playlist_shortcut(&self, room: &str, playlist: &str) -> Option<&str> {
        lookup(&self.playlists, room)
            .and_then(|by_name| lookup(by_name, playlist))
            .map(String::as_str)
    }

    /// Shortcut that sets `room` to `volume`.
    #[must_use]
    pub fn volume_shortcut(&self, room: &str, volume: Volume) -> Option<&str> {
        lookup(&self.volume_shortcuts, room)
            .and_then(|by_level| by_level.get(&volume.to_string()))
            .map(String::as_str)
    }
}

fn lookup<'a, V>(map: &'a BTreeMap<String, V>, key: &str) -> Option<&'a V> {
    let key = key.trim();
    map.get(key).or_else(|| {
        map.iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

impl ConfigDocument {
    /// Check the invariants a document loaded from disk must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invariant`] naming the first offending path:
    /// an unknown backend token, a blank room, a blank or untrimmed map key,
    /// an alias name containing `.`, a blank shortcut name, or a
    /// volume-shortcut key that is not a canonical level in `0..=100`.
    /// Keys that fail these checks could never be reached by a lookup.
    pub fn validate(&self) -> Result<(), RoomcastError> {
        check_backend("defaults.backend", &self.defaults.backend)?;
        check_rooms("defaults.rooms", &self.defaults.rooms)?;

        for (name, alias) in &self.aliases {
            let path = format!("aliases.{name}");
            check_key(&path, name)?;
            if name.contains('.') {
                return Err(invariant(&path, "alias names must not contain '.'"));
            }
            check_backend(&format!("aliases.{name}.backend"), &alias.backend)?;
            check_rooms(&format!("aliases.{name}.rooms"), &alias.rooms)?;
        }

        for (room, by_name) in &self.native.playlists {
            let prefix = format!("native.playlists.{room}");
            check_key(&prefix, room)?;
            for (playlist, shortcut) in by_name {
                let path = format!("{prefix}.{playlist}");
                check_key(&path, playlist)?;
                check_shortcut(&path, shortcut)?;
            }
        }

        for (room, by_level) in &self.native.volume_shortcuts {
            let prefix = format!("native.volumeShortcuts.{room}");
            check_key(&prefix, room)?;
            for (level, shortcut) in by_level {
                let path = format!("{prefix}.{level}");
                let canonical = level.parse::<Volume>().ok().map(|volume| volume.to_string());
                if canonical.as_deref() != Some(level.as_str()) {
                    return Err(invariant(
                        &path,
                        "volume key must be an integer 0..100 without padding",
                    ));
                }
                check_shortcut(&path, shortcut)?;
            }
        }
        Ok(())
    }
}

fn invariant(path: &str, reason: &'static str) -> RoomcastError {
    ValidationError::Invariant {
        path: path.to_string(),
        reason,
    }
    .into()
}

fn check_backend(path: &str, token: &str) -> Result<(), RoomcastError> {
    BackendKind::parse_token(token)
        .map(|_| ())
        .map_err(|_| invariant(path, "backend must be continuous or discrete"))
}

fn check_rooms(path: &str, rooms: &[String]) -> Result<(), RoomcastError> {
    if rooms.iter().any(|room| room.trim().is_empty()) {
        return Err(invariant(path, "room names must not be empty"));
    }
    Ok(())
}

fn check_key(path: &str, key: &str) -> Result<(), RoomcastError> {
    check_shortcut(path, key)?;
    if key != key.trim() {
        return Err(invariant(path, "names must not have surrounding whitespace"));
    }
    Ok(())
}

fn check_shortcut(path: &str, name: &str) -> Result<(), RoomcastError> {
    if name.trim().is_empty() {
        return Err(invariant(path, "names must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigDocument {
        serde_json::from_value(serde_json::json!({
            "defaults": {"backend": "discrete", "rooms": ["Bedroom"], "volume": 20, "shuffle": true},
            "aliases": {
                "morning": {"rooms": ["Kitchen"], "playlist": "Morning Jazz", "volume": 30}
            },
            "native": {
                "playlists": {"Bedroom": {"Sleep": "BR Sleep"}},
                "volumeShortcuts": {"Bedroom": {"30": "BR Vol 30"}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn should_parse_camel_case_document() {
        let doc = sample();
        assert_eq!(doc.defaults.volume, Volume::new(20));
        assert!(doc.defaults.shuffle);
        assert_eq!(doc.aliases["morning"].playlist, "Morning Jazz");
        assert_eq!(
            doc.native.volume_shortcut("Bedroom", Volume::new(30).unwrap()),
            Some("BR Vol 30")
        );
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn should_parse_empty_document_with_defaults() {
        let doc: ConfigDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, ConfigDocument::default());
    }

    #[test]
    fn should_match_native_rooms_case_insensitively() {
        let doc = sample();
        assert_eq!(doc.native.playlist_shortcut("bedroom", "sleep"), Some("BR Sleep"));
        assert_eq!(doc.native.playlist_shortcut("Kitchen", "Sleep"), None);
    }

    #[test]
    fn should_reject_unknown_backend_on_validate() {
        let mut doc = sample();
        doc.aliases.get_mut("morning").unwrap().backend = "bluetooth".to_string();
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("aliases.morning.backend"));
    }

    #[test]
    fn should_reject_non_numeric_volume_key_on_validate() {
        let mut doc = sample();
        doc.native
            .volume_shortcuts
            .get_mut("Bedroom")
            .unwrap()
            .insert("loud".to_string(), "BR Loud".to_string());
        assert!(doc.validate().is_err());
    }

    #[test]
    fn should_reject_padded_volume_key_on_validate() {
        let doc: ConfigDocument = serde_json::from_value(serde_json::json!({
            "native": {"volumeShortcuts": {"Bedroom": {"030": "BR Vol 30"}}}
        }))
        .unwrap();
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("native.volumeShortcuts.Bedroom.030"));

        for key in [" 30", "+30"] {
            let mut doc = sample();
            doc.native
                .volume_shortcuts
                .get_mut("Bedroom")
                .unwrap()
                .insert(key.to_string(), "BR Vol 30".to_string());
            assert!(doc.validate().is_err(), "key {key:?}");
        }
    }

    #[test]
    fn should_reject_alias_names_lookups_cannot_reach() {
        for name in [" morning ", "kid.room"] {
            let mut doc = sample();
            let alias = doc.aliases["morning"].clone();
            doc.aliases.insert(name.to_string(), alias);
            let err = doc.validate().unwrap_err();
            assert!(
                matches!(err, RoomcastError::Validation(ValidationError::Invariant { .. })),
                "name {name:?}: {err}"
            );
        }
    }

    #[test]
    fn should_reject_untrimmed_room_keys_on_validate() {
        let mut doc = sample();
        let rooms = doc.native.playlists.remove("Bedroom").unwrap();
        doc.native.playlists.insert("Bedroom ".to_string(), rooms);
        assert!(doc.validate().is_err());
    }

    #[test]
    fn should_reject_out_of_range_volume_when_parsing() {
        let parsed: Result<ConfigDocument, _> =
            serde_json::from_value(serde_json::json!({"defaults": {"volume": 140}}));
        assert!(parsed.is_err());
    }

    #[test]
    fn should_convert_alias_to_defaults() {
        let defaults = sample().aliases["morning"].to_defaults();
        assert_eq!(defaults.rooms, vec!["Kitchen"]);
        assert_eq!(defaults.volume, Some(30));
        assert_eq!(defaults.shuffle, None);
        assert!(defaults.backend.is_empty());
    }
}
