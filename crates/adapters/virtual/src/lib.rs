//! # roomcast-adapter-virtual
//!
//! Virtual/demo player that simulates a multi-room speaker setup for testing
//! and demonstration purposes.
//!
//! ## Default setup
//!
//! | Rooms | Playlists |
//! |-------|-----------|
//! | `Kitchen`, `Living Room`, `Bedroom`, `Office` | `Evening Jazz`, `Jazz Classics`, `Morning Coffee`, `Sleep` |
//!
//! Every room starts at volume 50, the player starts `stopped` with no
//! outputs selected. Shortcuts are accepted by name and only recorded.
//!
//! ## Dependency rule
//!
//! Depends on `roomcast-app` (port traits) and `roomcast-domain` only.

mod error;

pub use error::VirtualError;

use std::collections::BTreeMap;

use roomcast_app::ports::PlaybackBackend;
use roomcast_domain::error::RoomcastError;
use roomcast_domain::playlist::Playlist;
use roomcast_domain::volume::Volume;
use tokio::sync::Mutex;

const DEFAULT_ROOMS: [&str; 4] = ["Kitchen", "Living Room", "Bedroom", "Office"];
const DEFAULT_PLAYLISTS: [(&str, &str); 4] = [
    ("4F1A2B3C4D5E6F70", "Evening Jazz"),
    ("4F1A2B3C4D5E6F71", "Jazz Classics"),
    ("4F1A2B3C4D5E6F72", "Morning Coffee"),
    ("4F1A2B3C4D5E6F73", "Sleep"),
];
const DEFAULT_VOLUME: u8 = 50;

/// Observable state of the simulated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualState {
    /// Room name → volume.
    pub volumes: BTreeMap<String, Volume>,
    pub outputs: Vec<String>,
    pub shuffle: bool,
    pub player_state: String,
    pub current_playlist: Option<Playlist>,
    /// Every shortcut run, in order.
    pub shortcuts: Vec<String>,
}

/// Simulated player implementing [`PlaybackBackend`].
pub struct VirtualBackend {
    playlists: Vec<Playlist>,
    state: Mutex<VirtualState>,
}

impl Default for VirtualBackend {
    fn default() -> Self {
        let playlists = DEFAULT_PLAYLISTS
            .iter()
            .map(|(id, name)| Playlist::new(*id, *name))
            .collect();
        Self::new(&DEFAULT_ROOMS, playlists)
    }
}

impl VirtualBackend {
    /// Create a player with the given rooms and playlist library.
    #[must_use]
    pub fn new(rooms: &[&str], playlists: Vec<Playlist>) -> Self {
        let volume = Volume::new(DEFAULT_VOLUME).unwrap_or_default();
        let volumes = rooms
            .iter()
            .map(|room| ((*room).to_string(), volume))
            .collect();
        Self {
            playlists,
            state: Mutex::new(VirtualState {
                volumes,
                outputs: Vec::new(),
                shuffle: false,
                player_state: "stopped".to_string(),
                current_playlist: None,
                shortcuts: Vec::new(),
            }),
        }
    }

    /// Copy of the current player state.
    pub async fn snapshot(&self) -> VirtualState {
        self.state.lock().await.clone()
    }

    /// Canonical room name, matched case-insensitively.
    fn room(state: &VirtualState, name: &str) -> Result<String, VirtualError> {
        state
            .volumes
            .keys()
            .find(|room| room.eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| VirtualError::UnknownRoom(name.to_string()))
    }

    fn rooms(state: &VirtualState, names: &[String]) -> Result<Vec<String>, VirtualError> {
        names.iter().map(|name| Self::room(state, name)).collect()
    }

    fn playlist(&self, id: &str) -> Result<&Playlist, VirtualError> {
        self.playlists
            .iter()
            .find(|playlist| playlist.id == id)
            .ok_or_else(|| VirtualError::UnknownPlaylist(id.to_string()))
    }
}

impl PlaybackBackend for VirtualBackend {
    async fn select_outputs(&self, rooms: &[String]) -> Result<(), RoomcastError> {
        let mut state = self.state.lock().await;
        state.outputs = Self::rooms(&state, rooms)?;
        tracing::debug!(outputs = ?state.outputs, "virtual outputs selected");
        Ok(())
    }

    async fn set_volume(&self, rooms: &[String], volume: Volume) -> Result<(), RoomcastError> {
        let mut state = self.state.lock().await;
        for room in Self::rooms(&state, rooms)? {
            state.volumes.insert(room, volume);
        }
        Ok(())
    }

    async fn set_shuffle(&self, enabled: bool) -> Result<(), RoomcastError> {
        self.state.lock().await.shuffle = enabled;
        Ok(())
    }

    async fn search_playlists(&self, query: &str) -> Result<Vec<Playlist>, RoomcastError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .playlists
            .iter()
            .filter(|playlist| playlist.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn play_by_id(&self, id: &str) -> Result<(), RoomcastError> {
        let playlist = self.playlist(id)?.clone();
        let mut state = self.state.lock().await;
        tracing::debug!(playlist = %playlist.name, "virtual playback started");
        state.current_playlist = Some(playlist);
        state.player_state = "playing".to_string();
        Ok(())
    }

    async fn find_playlist_name_by_id(&self, id: &str) -> Result<String, RoomcastError> {
        Ok(self.playlist(id)?.name.clone())
    }

    async fn infer_current_outputs(&self) -> Vec<String> {
        self.state.lock().await.outputs.clone()
    }

    async fn now_playing_state(&self) -> Result<String, RoomcastError> {
        Ok(self.state.lock().await.player_state.clone())
    }

    async fn stop_playback(&self) -> Result<(), RoomcastError> {
        let mut state = self.state.lock().await;
        state.player_state = "stopped".to_string();
        state.current_playlist = None;
        Ok(())
    }

    async fn run_shortcut(&self, name: &str) -> Result<(), RoomcastError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VirtualError::EmptyShortcut.into());
        }
        self.state.lock().await.shortcuts.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rooms(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn should_start_stopped_without_outputs() {
        let backend = VirtualBackend::default();
        let state = backend.snapshot().await;
        assert_eq!(state.player_state, "stopped");
        assert!(state.outputs.is_empty());
        assert_eq!(state.volumes.len(), 4);
        assert!(backend.infer_current_outputs().await.is_empty());
    }

    #[tokio::test]
    async fn should_select_outputs_with_canonical_names() {
        let backend = VirtualBackend::default();
        backend
            .select_outputs(&rooms(&["kitchen", "LIVING ROOM"]))
            .await
            .unwrap();
        assert_eq!(
            backend.infer_current_outputs().await,
            vec!["Kitchen", "Living Room"]
        );
    }

    #[tokio::test]
    async fn should_reject_unknown_room_without_changes() {
        let backend = VirtualBackend::default();
        let err = backend
            .set_volume(&rooms(&["Kitchen", "Garage"]), Volume::new(10).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown room: Garage");
        assert_eq!(
            backend.snapshot().await.volumes["Kitchen"],
            Volume::new(DEFAULT_VOLUME).unwrap()
        );
    }

    #[tokio::test]
    async fn should_search_and_play_playlist() {
        let backend = VirtualBackend::default();
        let found = backend.search_playlists("jazz").await.unwrap();
        assert_eq!(found.len(), 2);

        let best = backend.pick_best_match("jazz", &found).unwrap();
        assert_eq!(best.name, "Jazz Classics");

        backend.play_by_id(&best.id).await.unwrap();
        assert_eq!(backend.now_playing_state().await.unwrap(), "playing");

        backend.stop_playback().await.unwrap();
        assert_eq!(backend.now_playing_state().await.unwrap(), "stopped");
    }

    #[tokio::test]
    async fn should_resolve_playlist_name_by_id() {
        let backend = VirtualBackend::default();
        assert_eq!(
            backend
                .find_playlist_name_by_id("4F1A2B3C4D5E6F73")
                .await
                .unwrap(),
            "Sleep"
        );
        assert!(backend.find_playlist_name_by_id("nope").await.is_err());
    }

    #[tokio::test]
    async fn should_record_shortcuts() {
        let backend = VirtualBackend::default();
        backend.run_shortcut("BR Sleep").await.unwrap();
        assert!(backend.run_shortcut("  ").await.is_err());
        assert_eq!(backend.snapshot().await.shortcuts, vec!["BR Sleep"]);
    }
}
