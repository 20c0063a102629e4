//! Step executor — turns one automation step into backend calls.
//!
//! Each step runs against the effective defaults of its run. Continuous
//! steps drive the player directly; discrete steps resolve shortcuts from
//! the configuration document and hand them to [`crate::discrete`].

use std::time::Duration;

use roomcast_domain::automation::Step;
use roomcast_domain::backend::BackendKind;
use roomcast_domain::config::ConfigDocument;
use roomcast_domain::defaults::Defaults;
use roomcast_domain::duration::parse_duration;
use roomcast_domain::error::{
    ConfigStateError, NotFoundError, RoomcastError, TimeoutError, ValidationError,
};
use roomcast_domain::volume::Volume;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

use crate::discrete::{run_discrete_playlist_action, run_discrete_volume_action};
use crate::ports::PlaybackBackend;

/// How often a `wait` step polls the player state.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Deadline of a `wait` step that does not name one.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_WAIT_TIMEOUT_TOKEN: &str = "30s";

/// Executes single steps against a [`PlaybackBackend`].
pub struct StepExecutor<B> {
    backend: B,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl<B: PlaybackBackend> StepExecutor<B> {
    /// Create an executor polling every [`DEFAULT_POLL_INTERVAL`].
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Abort pending `wait` steps, and any run using this executor, once
    /// `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Execute `step` under `defaults`.
    ///
    /// `config` is only consulted by discrete-backend steps.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed steps, a configuration error
    /// when the backend or configuration cannot satisfy the step, a timeout
    /// for an unmet `wait`, or whatever the backend reports.
    pub async fn execute(
        &self,
        step: &Step,
        defaults: &Defaults,
        config: Option<&ConfigDocument>,
    ) -> Result<(), RoomcastError> {
        match step {
            Step::OutputsSet { rooms } => self.outputs_set(rooms, defaults).await,
            Step::Play { query, playlist_id } => {
                self.play(
                    non_blank(query.as_deref()),
                    non_blank(playlist_id.as_deref()),
                    defaults,
                    config,
                )
                .await
            }
            Step::VolumeSet { value, rooms } => {
                self.volume_set(*value, rooms, defaults, config).await
            }
            Step::Wait { state, timeout } => {
                self.wait(non_blank(state.as_deref()), non_blank(timeout.as_deref()))
                    .await
            }
            Step::Transport { action } => self.transport(action.as_deref()).await,
            Step::Unsupported { kind } => {
                Err(ValidationError::UnsupportedStepType(kind.clone()).into())
            }
        }
    }

    async fn outputs_set(&self, rooms: &[String], defaults: &Defaults) -> Result<(), RoomcastError> {
        let backend = defaults.backend_kind()?;
        if backend != BackendKind::Continuous {
            return Err(ConfigStateError::ContinuousOnly {
                kind: Step::OUTPUTS_SET,
                backend: backend.as_str(),
            }
            .into());
        }
        let rooms = pick_rooms(rooms, &defaults.rooms);
        if rooms.is_empty() {
            return Err(ConfigStateError::NoRooms {
                kind: Step::OUTPUTS_SET,
            }
            .into());
        }
        self.backend.select_outputs(rooms).await
    }

    async fn play(
        &self,
        query: Option<&str>,
        playlist_id: Option<&str>,
        defaults: &Defaults,
        config: Option<&ConfigDocument>,
    ) -> Result<(), RoomcastError> {
        if query.is_none() && playlist_id.is_none() {
            return missing_target();
        }
        match defaults.backend_kind()? {
            BackendKind::Continuous => self.play_continuous(query, playlist_id, defaults).await,
            BackendKind::Discrete => {
                self.play_discrete(query, playlist_id, defaults, config)
                    .await
            }
        }
    }

    async fn play_continuous(
        &self,
        query: Option<&str>,
        playlist_id: Option<&str>,
        defaults: &Defaults,
    ) -> Result<(), RoomcastError> {
        let volume = defaults.volume.map(Volume::try_from).transpose()?;

        if !defaults.rooms.is_empty() {
            self.backend.select_outputs(&defaults.rooms).await?;
            if let Some(volume) = volume {
                self.backend.set_volume(&defaults.rooms, volume).await?;
            }
        }
        if let Some(shuffle) = defaults.shuffle {
            self.backend.set_shuffle(shuffle).await?;
        }

        let id = match (playlist_id, query) {
            (Some(id), _) => id.to_string(),
            (None, Some(query)) => {
                let candidates = self.backend.search_playlists(query).await?;
                let best = self
                    .backend
                    .pick_best_match(query, &candidates)
                    .ok_or_else(|| NotFoundError {
                        entity: "playlist",
                        id: query.to_string(),
                    })?;
                tracing::debug!(query, playlist = %best.name, "matched playlist");
                best.id
            }
            (None, None) => missing_target()?,
        };
        self.backend.play_by_id(&id).await
    }

    async fn play_discrete(
        &self,
        query: Option<&str>,
        playlist_id: Option<&str>,
        defaults: &Defaults,
        config: Option<&ConfigDocument>,
    ) -> Result<(), RoomcastError> {
        let config = config.ok_or(ConfigStateError::MissingConfig {
            action: "discrete playback",
        })?;
        if defaults.rooms.is_empty() {
            return Err(ConfigStateError::NoRooms { kind: Step::PLAY }.into());
        }
        let name = match (query, playlist_id) {
            (Some(query), _) => query.to_string(),
            (None, Some(id)) => self.backend.find_playlist_name_by_id(id).await?,
            (None, None) => missing_target()?,
        };
        run_discrete_playlist_action(&self.backend, config, &defaults.rooms, &name).await
    }

    async fn volume_set(
        &self,
        value: Option<i64>,
        rooms: &[String],
        defaults: &Defaults,
        config: Option<&ConfigDocument>,
    ) -> Result<(), RoomcastError> {
        let value = value.ok_or(ValidationError::MissingField {
            kind: Step::VOLUME_SET,
            field: "value",
        })?;
        let volume = Volume::try_from(value)?;
        let rooms = pick_rooms(rooms, &defaults.rooms).to_vec();

        match defaults.backend_kind()? {
            BackendKind::Continuous => {
                let rooms = if rooms.is_empty() {
                    self.backend.infer_current_outputs().await
                } else {
                    rooms
                };
                if rooms.is_empty() {
                    return Err(ConfigStateError::NoRooms {
                        kind: Step::VOLUME_SET,
                    }
                    .into());
                }
                self.backend.set_volume(&rooms, volume).await
            }
            BackendKind::Discrete => {
                let config = config.ok_or(ConfigStateError::MissingConfig {
                    action: "discrete volume",
                })?;
                if rooms.is_empty() {
                    return Err(ConfigStateError::NoRooms {
                        kind: Step::VOLUME_SET,
                    }
                    .into());
                }
                run_discrete_volume_action(&self.backend, config, &rooms, volume).await
            }
        }
    }

    async fn wait(&self, state: Option<&str>, timeout: Option<&str>) -> Result<(), RoomcastError> {
        let wanted = state.ok_or(ValidationError::MissingField {
            kind: Step::WAIT,
            field: "state",
        })?;
        let timeout = match timeout {
            Some(token) => parse_duration(token)?,
            None => DEFAULT_WAIT_TIMEOUT,
        };

        let started = tokio::time::Instant::now();
        loop {
            let current = self.backend.now_playing_state().await?;
            if current.trim().eq_ignore_ascii_case(wanted) {
                tracing::debug!(state = wanted, "player reached state");
                return Ok(());
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(TimeoutError {
                    elapsed,
                    wanted: wanted.to_string(),
                }
                .into());
            }

            let pause = self.poll_interval.min(timeout - elapsed);
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(RoomcastError::Cancelled),
                () = tokio::time::sleep(pause) => {}
            }
        }
    }

    async fn transport(&self, action: Option<&str>) -> Result<(), RoomcastError> {
        match action {
            Some("stop") => self.backend.stop_playback().await,
            Some(other) => Err(ValidationError::UnsupportedAction(other.to_string()).into()),
            None => Err(ValidationError::MissingField {
                kind: Step::TRANSPORT,
                field: "action",
            }
            .into()),
        }
    }
}

/// Describe what `step` will do under `defaults`, without touching a backend.
#[must_use]
pub fn resolve_step(step: &Step, defaults: &Defaults) -> Map<String, Value> {
    let mut resolved = Map::new();
    let backend = defaults
        .backend_kind()
        .map_or_else(|_| defaults.backend.clone(), |kind| kind.as_str().to_string());

    match step {
        Step::OutputsSet { rooms } => {
            resolved.insert("backend".into(), json!(backend));
            resolved.insert("rooms".into(), json!(pick_rooms(rooms, &defaults.rooms)));
        }
        Step::Play { query, playlist_id } => {
            resolved.insert("backend".into(), json!(backend));
            resolved.insert("rooms".into(), json!(defaults.rooms));
            insert_some(&mut resolved, "volume", defaults.volume);
            insert_some(&mut resolved, "shuffle", defaults.shuffle);
            insert_some(&mut resolved, "query", non_blank(query.as_deref()));
            insert_some(&mut resolved, "playlistId", non_blank(playlist_id.as_deref()));
        }
        Step::VolumeSet { value, rooms } => {
            resolved.insert("backend".into(), json!(backend));
            resolved.insert("rooms".into(), json!(pick_rooms(rooms, &defaults.rooms)));
            insert_some(&mut resolved, "value", *value);
        }
        Step::Wait { state, timeout } => {
            insert_some(&mut resolved, "state", non_blank(state.as_deref()));
            let timeout = non_blank(timeout.as_deref()).unwrap_or(DEFAULT_WAIT_TIMEOUT_TOKEN);
            resolved.insert("timeout".into(), json!(timeout));
            if let Ok(parsed) = parse_duration(timeout) {
                resolved.insert(
                    "timeoutMs".into(),
                    json!(roomcast_domain::time::duration_ms(parsed)),
                );
            }
        }
        Step::Transport { action } => {
            insert_some(&mut resolved, "action", action.as_deref());
        }
        Step::Unsupported { .. } => {}
    }
    resolved
}

fn insert_some<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

/// Step rooms when given, otherwise the default rooms.
fn pick_rooms<'a>(step_rooms: &'a [String], default_rooms: &'a [String]) -> &'a [String] {
    if step_rooms.is_empty() {
        default_rooms
    } else {
        step_rooms
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn missing_target<T>() -> Result<T, RoomcastError> {
    Err(ValidationError::MissingField {
        kind: Step::PLAY,
        field: "query or playlistId",
    }
    .into())
}
