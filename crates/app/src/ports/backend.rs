//! Playback backend port — the music player and its speaker outputs.

use std::future::Future;

use roomcast_domain::error::RoomcastError;
use roomcast_domain::playlist::{self, Playlist};
use roomcast_domain::volume::Volume;

/// Operations the step executor needs from a music player.
///
/// Continuous-backend steps drive the player directly. Discrete-backend
/// steps only go through [`PlaybackBackend::run_shortcut`].
pub trait PlaybackBackend: Send + Sync {
    /// Route playback to exactly `rooms`.
    fn select_outputs(
        &self,
        rooms: &[String],
    ) -> impl Future<Output = Result<(), RoomcastError>> + Send;

    /// Set the output volume of each of `rooms`.
    fn set_volume(
        &self,
        rooms: &[String],
        volume: Volume,
    ) -> impl Future<Output = Result<(), RoomcastError>> + Send;

    fn set_shuffle(&self, enabled: bool) -> impl Future<Output = Result<(), RoomcastError>> + Send;

    /// Playlists whose name relates to `query`, in player order.
    fn search_playlists(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Playlist>, RoomcastError>> + Send;

    /// Rank `candidates` against `query` and return the winner.
    fn pick_best_match(&self, query: &str, candidates: &[Playlist]) -> Option<Playlist> {
        playlist::best_match(query, candidates).cloned()
    }

    fn play_by_id(&self, id: &str) -> impl Future<Output = Result<(), RoomcastError>> + Send;

    /// Name of the playlist with persistent identifier `id`.
    fn find_playlist_name_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<String, RoomcastError>> + Send;

    /// Rooms currently selected as outputs. Best effort: an unreachable
    /// player yields an empty list.
    fn infer_current_outputs(&self) -> impl Future<Output = Vec<String>> + Send;

    /// Raw player state, e.g. `playing`, `paused` or `stopped`.
    fn now_playing_state(&self) -> impl Future<Output = Result<String, RoomcastError>> + Send;

    fn stop_playback(&self) -> impl Future<Output = Result<(), RoomcastError>> + Send;

    /// Run a named OS shortcut.
    fn run_shortcut(&self, name: &str) -> impl Future<Output = Result<(), RoomcastError>> + Send;
}

impl<T: PlaybackBackend> PlaybackBackend for std::sync::Arc<T> {
    fn select_outputs(
        &self,
        rooms: &[String],
    ) -> impl Future<Output = Result<(), RoomcastError>> + Send {
        (**self).select_outputs(rooms)
    }

    fn set_volume(
        &self,
        rooms: &[String],
        volume: Volume,
    ) -> impl Future<Output = Result<(), RoomcastError>> + Send {
        (**self).set_volume(rooms, volume)
    }

    fn set_shuffle(&self, enabled: bool) -> impl Future<Output = Result<(), RoomcastError>> + Send {
        (**self).set_shuffle(enabled)
    }

    fn search_playlists(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Playlist>, RoomcastError>> + Send {
        (**self).search_playlists(query)
    }

    fn pick_best_match(&self, query: &str, candidates: &[Playlist]) -> Option<Playlist> {
        (**self).pick_best_match(query, candidates)
    }

    fn play_by_id(&self, id: &str) -> impl Future<Output = Result<(), RoomcastError>> + Send {
        (**self).play_by_id(id)
    }

    fn find_playlist_name_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<String, RoomcastError>> + Send {
        (**self).find_playlist_name_by_id(id)
    }

    fn infer_current_outputs(&self) -> impl Future<Output = Vec<String>> + Send {
        (**self).infer_current_outputs()
    }

    fn now_playing_state(&self) -> impl Future<Output = Result<String, RoomcastError>> + Send {
        (**self).now_playing_state()
    }

    fn stop_playback(&self) -> impl Future<Output = Result<(), RoomcastError>> + Send {
        (**self).stop_playback()
    }

    fn run_shortcut(&self, name: &str) -> impl Future<Output = Result<(), RoomcastError>> + Send {
        (**self).run_shortcut(name)
    }
}
