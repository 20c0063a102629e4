//! In-memory spy backend shared by the app tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use roomcast_domain::error::RoomcastError;
use roomcast_domain::playlist::Playlist;
use roomcast_domain::volume::Volume;

use crate::ports::PlaybackBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SelectOutputs(Vec<String>),
    SetVolume(Vec<String>, u8),
    SetShuffle(bool),
    Search(String),
    Play(String),
    FindName(String),
    Stop,
    Shortcut(String),
}

#[derive(Default)]
struct SpyState {
    calls: Vec<Call>,
    playlists: Vec<Playlist>,
    outputs: Vec<String>,
    states: VecDeque<String>,
    failing: Option<&'static str>,
}

#[derive(Default)]
pub struct SpyBackend {
    state: Mutex<SpyState>,
}

impl SpyBackend {
    pub fn with_playlists(self, playlists: Vec<Playlist>) -> Self {
        self.state.lock().unwrap().playlists = playlists;
        self
    }

    pub fn with_outputs(self, outputs: &[&str]) -> Self {
        self.state.lock().unwrap().outputs = outputs.iter().map(ToString::to_string).collect();
        self
    }

    /// Successive answers of `now_playing_state`; the last one repeats.
    pub fn with_states(self, states: &[&str]) -> Self {
        self.state.lock().unwrap().states = states.iter().map(ToString::to_string).collect();
        self
    }

    /// Make the named operation fail.
    pub fn failing(self, operation: &'static str) -> Self {
        self.state.lock().unwrap().failing = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn shortcuts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Shortcut(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), RoomcastError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing == Some(operation) {
            return Err(RoomcastError::backend(format!("{operation} failed")));
        }
        Ok(())
    }
}

impl PlaybackBackend for SpyBackend {
    async fn select_outputs(&self, rooms: &[String]) -> Result<(), RoomcastError> {
        self.record("select_outputs", Call::SelectOutputs(rooms.to_vec()))
    }

    async fn set_volume(&self, rooms: &[String], volume: Volume) -> Result<(), RoomcastError> {
        self.record("set_volume", Call::SetVolume(rooms.to_vec(), volume.get()))
    }

    async fn set_shuffle(&self, enabled: bool) -> Result<(), RoomcastError> {
        self.record("set_shuffle", Call::SetShuffle(enabled))
    }

    async fn search_playlists(&self, query: &str) -> Result<Vec<Playlist>, RoomcastError> {
        self.record("search_playlists", Call::Search(query.to_string()))?;
        let needle = query.to_lowercase();
        Ok(self
            .state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .filter(|playlist| playlist.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn play_by_id(&self, id: &str) -> Result<(), RoomcastError> {
        self.record("play_by_id", Call::Play(id.to_string()))
    }

    async fn find_playlist_name_by_id(&self, id: &str) -> Result<String, RoomcastError> {
        self.record("find_playlist_name_by_id", Call::FindName(id.to_string()))?;
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|playlist| playlist.id == id)
            .map(|playlist| playlist.name.clone())
            .ok_or_else(|| RoomcastError::backend(format!("no playlist with id {id}")))
    }

    async fn infer_current_outputs(&self) -> Vec<String> {
        self.state.lock().unwrap().outputs.clone()
    }

    async fn now_playing_state(&self) -> Result<String, RoomcastError> {
        let mut state = self.state.lock().unwrap();
        let current = if state.states.len() > 1 {
            state.states.pop_front()
        } else {
            state.states.front().cloned()
        };
        Ok(current.unwrap_or_else(|| "stopped".to_string()))
    }

    async fn stop_playback(&self) -> Result<(), RoomcastError> {
        self.record("stop_playback", Call::Stop)
    }

    async fn run_shortcut(&self, name: &str) -> Result<(), RoomcastError> {
        self.record("run_shortcut", Call::Shortcut(name.to_string()))
    }
}
