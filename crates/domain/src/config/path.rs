//! Dotted-path access to a [`ConfigDocument`].
//!
//! | Path | Values | Coercion |
//! |------|--------|----------|
//! | `defaults.backend` | 1 | backend token, stored canonical |
//! | `defaults.shuffle` | 1 | boolean token |
//! | `defaults.volume` | 1 | `0..=100` or `null` |
//! | `defaults.rooms` | any | trimmed, non-empty |
//! | `aliases.<name>.backend` | 1 | backend token |
//! | `aliases.<name>.rooms` | any | trimmed, non-empty |
//! | `aliases.<name>.playlist` / `playlistId` / `shortcut` | 1 | trimmed text |
//! | `aliases.<name>.shuffle` | 1 | boolean token or `null` |
//! | `aliases.<name>.volume` | 1 | `0..=100` or `null` |
//! | `native.playlists.<room>.<playlist>` | 1 | non-empty shortcut name |
//! | `native.volumeShortcuts.<room>.<level>` | 1 | non-empty shortcut name |
//!
//! Every `set` validates all of its input before touching the document.

use std::collections::BTreeMap;
use std::fmt;

use crate::backend::BackendKind;
use crate::config::value::{ConfigValue, is_null, parse_bool};
use crate::config::{AliasConfig, ConfigDocument};
use crate::error::{NotFoundError, RoomcastError, UsageError};
use crate::volume::Volume;

/// A parsed configuration path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPath {
    DefaultsBackend,
    DefaultsShuffle,
    DefaultsVolume,
    DefaultsRooms,
    /// `aliases.<name>`, only meaningful for `unset`.
    AliasEntry { name: String },
    Alias { name: String, field: AliasField },
    NativePlaylist { room: String, playlist: String },
    NativeVolumeShortcut { room: String, volume: Volume },
}

/// Settable fields of an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasField {
    Backend,
    Rooms,
    Playlist,
    PlaylistId,
    Shortcut,
    Shuffle,
    Volume,
}

impl AliasField {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "backend" => Some(Self::Backend),
            "rooms" => Some(Self::Rooms),
            "playlist" => Some(Self::Playlist),
            "playlistId" => Some(Self::PlaylistId),
            "shortcut" => Some(Self::Shortcut),
            "shuffle" => Some(Self::Shuffle),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Rooms => "rooms",
            Self::Playlist => "playlist",
            Self::PlaylistId => "playlistId",
            Self::Shortcut => "shortcut",
            Self::Shuffle => "shuffle",
            Self::Volume => "volume",
        }
    }

    fn read(self, alias: &AliasConfig) -> Option<ConfigValue> {
        match self {
            Self::Backend => Some(ConfigValue::Text(alias.backend.clone())),
            Self::Rooms => Some(ConfigValue::List(alias.rooms.clone())),
            Self::Playlist => Some(ConfigValue::Text(alias.playlist.clone())),
            Self::PlaylistId => Some(ConfigValue::Text(alias.playlist_id.clone())),
            Self::Shortcut => Some(ConfigValue::Text(alias.shortcut.clone())),
            Self::Shuffle => alias.shuffle.map(ConfigValue::Bool),
            Self::Volume => alias.volume.map(ConfigValue::Volume),
        }
    }

    fn coerce(self, path: &str, values: &[&str]) -> Result<AliasUpdate, UsageError> {
        Ok(match self {
            Self::Rooms => AliasUpdate::Rooms(rooms(path, values)?),
            Self::Backend => AliasUpdate::Backend(backend(path, single(path, values)?)?),
            Self::Playlist => AliasUpdate::Playlist(single(path, values)?.trim().to_string()),
            Self::PlaylistId => AliasUpdate::PlaylistId(single(path, values)?.trim().to_string()),
            Self::Shortcut => AliasUpdate::Shortcut(single(path, values)?.trim().to_string()),
            Self::Shuffle => AliasUpdate::Shuffle(optional_bool(path, single(path, values)?)?),
            Self::Volume => AliasUpdate::Volume(optional_volume(path, single(path, values)?)?),
        })
    }
}

/// A validated alias change, applied only once coercion succeeded.
enum AliasUpdate {
    Backend(String),
    Rooms(Vec<String>),
    Playlist(String),
    PlaylistId(String),
    Shortcut(String),
    Shuffle(Option<bool>),
    Volume(Option<Volume>),
}

impl AliasUpdate {
    fn apply(self, alias: &mut AliasConfig) {
        match self {
            Self::Backend(value) => alias.backend = value,
            Self::Rooms(value) => alias.rooms = value,
            Self::Playlist(value) => alias.playlist = value,
            Self::PlaylistId(value) => alias.playlist_id = value,
            Self::Shortcut(value) => alias.shortcut = value,
            Self::Shuffle(value) => alias.shuffle = value,
            Self::Volume(value) => alias.volume = value,
        }
    }
}

impl ConfigPath {
    /// Parse a dotted path.
    ///
    /// Alias names may not contain dots, so `aliases.<name>` and
    /// `aliases.<name>.<field>` never overlap. Room names in
    /// `native.playlists` may not either; playlist names may.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::UnknownPath`] for shapes outside the schema,
    /// [`UsageError::EmptyComponent`] for blank names,
    /// [`UsageError::DottedAliasName`] for alias names containing `.`, and
    /// [`UsageError::InvalidVolume`] for a volume-shortcut key outside
    /// `0..=100`.
    pub fn parse(path: &str) -> Result<Self, UsageError> {
        let unknown = || UsageError::UnknownPath {
            path: path.to_string(),
        };
        let (head, rest) = path.split_once('.').ok_or_else(unknown)?;

        match head {
            "defaults" => match rest {
                "backend" => Ok(Self::DefaultsBackend),
                "shuffle" => Ok(Self::DefaultsShuffle),
                "volume" => Ok(Self::DefaultsVolume),
                "rooms" => Ok(Self::DefaultsRooms),
                _ => Err(unknown()),
            },
            "aliases" => match rest.rsplit_once('.') {
                Some((name, key)) => {
                    let field = AliasField::from_key(key).ok_or_else(unknown)?;
                    let name = non_empty(path, name, "alias name")?;
                    if name.contains('.') {
                        return Err(UsageError::DottedAliasName {
                            path: path.to_string(),
                            name,
                        });
                    }
                    Ok(Self::Alias { name, field })
                }
                None => Ok(Self::AliasEntry {
                    name: non_empty(path, rest, "alias name")?,
                }),
            },
            "native" => {
                let (map, rest) = rest.split_once('.').ok_or_else(unknown)?;
                match map {
                    "playlists" => {
                        let (room, playlist) = rest.split_once('.').ok_or_else(unknown)?;
                        Ok(Self::NativePlaylist {
                            room: non_empty(path, room, "room")?,
                            playlist: non_empty(path, playlist, "playlist")?,
                        })
                    }
                    "volumeShortcuts" => {
                        let (room, key) = rest.rsplit_once('.').ok_or_else(unknown)?;
                        let room = non_empty(path, room, "room")?;
                        let volume = key.parse().map_err(|_| UsageError::InvalidVolume {
                            path: path.to_string(),
                            value: key.to_string(),
                        })?;
                        Ok(Self::NativeVolumeShortcut { room, volume })
                    }
                    _ => Err(unknown()),
                }
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultsBackend => f.write_str("defaults.backend"),
            Self::DefaultsShuffle => f.write_str("defaults.shuffle"),
            Self::DefaultsVolume => f.write_str("defaults.volume"),
            Self::DefaultsRooms => f.write_str("defaults.rooms"),
            Self::AliasEntry { name } => write!(f, "aliases.{name}"),
            Self::Alias { name, field } => write!(f, "aliases.{name}.{}", field.key()),
            Self::NativePlaylist { room, playlist } => {
                write!(f, "native.playlists.{room}.{playlist}")
            }
            Self::NativeVolumeShortcut { room, volume } => {
                write!(f, "native.volumeShortcuts.{room}.{volume}")
            }
        }
    }
}

impl ConfigDocument {
    /// Read the value at `path`.
    ///
    /// Returns `Ok(None)` for unset optional leaves (`defaults.volume`,
    /// `aliases.<name>.shuffle`, `aliases.<name>.volume`). Lists come back
    /// as independent copies.
    ///
    /// # Errors
    ///
    /// Returns [`RoomcastError::Usage`] for malformed paths and
    /// [`RoomcastError::NotFound`] for an unknown alias or native mapping.
    pub fn get(&self, path: &str) -> Result<Option<ConfigValue>, RoomcastError> {
        let value = match ConfigPath::parse(path)? {
            ConfigPath::DefaultsBackend => Some(ConfigValue::Text(self.defaults.backend.clone())),
            ConfigPath::DefaultsShuffle => Some(ConfigValue::Bool(self.defaults.shuffle)),
            ConfigPath::DefaultsVolume => self.defaults.volume.map(ConfigValue::Volume),
            ConfigPath::DefaultsRooms => Some(ConfigValue::List(self.defaults.rooms.clone())),
            ConfigPath::AliasEntry { .. } => {
                return Err(UsageError::UnknownPath {
                    path: path.to_string(),
                }
                .into());
            }
            ConfigPath::Alias { name, field } => field.read(self.alias(&name)?),
            ConfigPath::NativePlaylist { room, playlist } => {
                let shortcut = entry(&self.native.playlists, &room, &playlist)
                    .ok_or_else(|| native_not_found("playlist shortcut", &room, &playlist))?;
                Some(ConfigValue::Text(shortcut.clone()))
            }
            ConfigPath::NativeVolumeShortcut { room, volume } => {
                let key = volume.to_string();
                let shortcut = entry(&self.native.volume_shortcuts, &room, &key)
                    .ok_or_else(|| native_not_found("volume shortcut", &room, &key))?;
                Some(ConfigValue::Text(shortcut.clone()))
            }
        };
        Ok(value)
    }

    /// Coerce `values` for `path` and store the result.
    ///
    /// Setting a field of an unknown alias creates the alias.
    ///
    /// # Errors
    ///
    /// Returns [`RoomcastError::Usage`] for malformed paths, wrong arity,
    /// failed coercion or blank required values. The document is unchanged
    /// on error.
    pub fn set<S: AsRef<str>>(&mut self, path: &str, values: &[S]) -> Result<(), RoomcastError> {
        let parsed = ConfigPath::parse(path)?;
        let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();

        match parsed {
            ConfigPath::DefaultsBackend => {
                self.defaults.backend = backend(path, single(path, &values)?)?;
            }
            ConfigPath::DefaultsShuffle => {
                let token = single(path, &values)?;
                self.defaults.shuffle = parse_bool(token).ok_or_else(|| invalid_bool(path, token))?;
            }
            ConfigPath::DefaultsVolume => {
                self.defaults.volume = optional_volume(path, single(path, &values)?)?;
            }
            ConfigPath::DefaultsRooms => self.defaults.rooms = rooms(path, &values)?,
            ConfigPath::AliasEntry { .. } => {
                return Err(UsageError::UnknownPath {
                    path: path.to_string(),
                }
                .into());
            }
            ConfigPath::Alias { name, field } => {
                let update = field.coerce(path, &values)?;
                update.apply(self.aliases.entry(name).or_default());
            }
            ConfigPath::NativePlaylist { room, playlist } => {
                let shortcut = non_empty(path, single(path, &values)?, "shortcut")?;
                self.native
                    .playlists
                    .entry(room)
                    .or_default()
                    .insert(playlist, shortcut);
            }
            ConfigPath::NativeVolumeShortcut { room, volume } => {
                let shortcut = non_empty(path, single(path, &values)?, "shortcut")?;
                self.native
                    .volume_shortcuts
                    .entry(room)
                    .or_default()
                    .insert(volume.to_string(), shortcut);
            }
        }
        Ok(())
    }

    /// Remove the value at `path`.
    ///
    /// Optional leaves are cleared; `aliases.<name>` removes the alias;
    /// native mapping entries are removed (and their room, once empty).
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::NotUnsettable`] for required fields and
    /// [`RoomcastError::NotFound`] when the alias or mapping does not exist.
    pub fn unset(&mut self, path: &str) -> Result<(), RoomcastError> {
        match ConfigPath::parse(path)? {
            ConfigPath::DefaultsVolume => self.defaults.volume = None,
            ConfigPath::AliasEntry { name } => {
                if self.aliases.remove(&name).is_none() {
                    return Err(alias_not_found(&name));
                }
            }
            ConfigPath::Alias {
                name,
                field: AliasField::Volume,
            } => self.alias_mut(&name)?.volume = None,
            ConfigPath::Alias {
                name,
                field: AliasField::Shuffle,
            } => self.alias_mut(&name)?.shuffle = None,
            ConfigPath::NativePlaylist { room, playlist } => {
                remove_entry(&mut self.native.playlists, &room, &playlist)
                    .ok_or_else(|| native_not_found("playlist shortcut", &room, &playlist))?;
            }
            ConfigPath::NativeVolumeShortcut { room, volume } => {
                let key = volume.to_string();
                remove_entry(&mut self.native.volume_shortcuts, &room, &key)
                    .ok_or_else(|| native_not_found("volume shortcut", &room, &key))?;
            }
            _ => {
                return Err(UsageError::NotUnsettable {
                    path: path.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Look up an alias by (trimmed) name.
    ///
    /// # Errors
    ///
    /// Returns [`RoomcastError::NotFound`] for unknown aliases.
    pub fn alias(&self, name: &str) -> Result<&AliasConfig, RoomcastError> {
        self.aliases
            .get(name.trim())
            .ok_or_else(|| alias_not_found(name))
    }

    fn alias_mut(&mut self, name: &str) -> Result<&mut AliasConfig, RoomcastError> {
        self.aliases
            .get_mut(name.trim())
            .ok_or_else(|| alias_not_found(name))
    }
}

fn single<'a>(path: &str, values: &[&'a str]) -> Result<&'a str, UsageError> {
    match values {
        [value] => Ok(*value),
        _ => Err(UsageError::Arity {
            path: path.to_string(),
            expected: 1,
            got: values.len(),
        }),
    }
}

fn non_empty(path: &str, token: &str, component: &'static str) -> Result<String, UsageError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(UsageError::EmptyComponent {
            path: path.to_string(),
            component,
        });
    }
    Ok(token.to_string())
}

fn rooms(path: &str, values: &[&str]) -> Result<Vec<String>, UsageError> {
    values
        .iter()
        .map(|room| non_empty(path, room, "room"))
        .collect()
}

fn backend(path: &str, token: &str) -> Result<String, UsageError> {
    BackendKind::parse_token(token)
        .map(|kind| kind.map(BackendKind::as_str).unwrap_or_default().to_string())
        .map_err(|_| UsageError::InvalidBackend {
            path: path.to_string(),
            value: token.to_string(),
        })
}

fn invalid_bool(path: &str, token: &str) -> UsageError {
    UsageError::InvalidBool {
        path: path.to_string(),
        value: token.to_string(),
    }
}

fn optional_bool(path: &str, token: &str) -> Result<Option<bool>, UsageError> {
    if is_null(token) {
        return Ok(None);
    }
    parse_bool(token)
        .map(Some)
        .ok_or_else(|| invalid_bool(path, token))
}

fn optional_volume(path: &str, token: &str) -> Result<Option<Volume>, UsageError> {
    if is_null(token) {
        return Ok(None);
    }
    token
        .parse()
        .map(Some)
        .map_err(|_| UsageError::InvalidVolume {
            path: path.to_string(),
            value: token.to_string(),
        })
}

fn entry<'a>(
    map: &'a BTreeMap<String, BTreeMap<String, String>>,
    room: &str,
    key: &str,
) -> Option<&'a String> {
    map.get(room).and_then(|inner| inner.get(key))
}

fn remove_entry(
    map: &mut BTreeMap<String, BTreeMap<String, String>>,
    room: &str,
    key: &str,
) -> Option<String> {
    let inner = map.get_mut(room)?;
    let removed = inner.remove(key)?;
    if inner.is_empty() {
        map.remove(room);
    }
    Some(removed)
}

fn alias_not_found(name: &str) -> RoomcastError {
    NotFoundError {
        entity: "alias",
        id: name.trim().to_string(),
    }
    .into()
}

fn native_not_found(entity: &'static str, room: &str, key: &str) -> RoomcastError {
    NotFoundError {
        entity,
        id: format!("{room}/{key}"),
    }
    .into()
}
