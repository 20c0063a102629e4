//! Step — one unit of an automation plan.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One automation step, keyed by its `type` tag.
///
/// Fields are optional on purpose: whether a combination makes sense
/// (e.g. a `play` with neither query nor playlist id) is decided when the
/// step runs, not when the document is read. A `type` outside the known set
/// parses into [`Step::Unsupported`] and fails at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStep", into = "RawStep")]
pub enum Step {
    /// Select the current outputs.
    OutputsSet { rooms: Vec<String> },
    /// Start a playlist, by id or by free-text query.
    Play {
        query: Option<String>,
        playlist_id: Option<String>,
    },
    /// Set the volume, optionally for an explicit set of rooms.
    VolumeSet {
        value: Option<i64>,
        rooms: Vec<String>,
    },
    /// Poll the player until it reports `state` or `timeout` elapses.
    Wait {
        state: Option<String>,
        timeout: Option<String>,
    },
    /// Transport control; only `stop` is supported.
    Transport { action: Option<String> },
    /// Any step whose `type` is not recognised.
    Unsupported { kind: String },
}

impl Step {
    pub const OUTPUTS_SET: &'static str = "outputs.set";
    pub const PLAY: &'static str = "play";
    pub const VOLUME_SET: &'static str = "volume.set";
    pub const WAIT: &'static str = "wait";
    pub const TRANSPORT: &'static str = "transport";

    /// The `type` tag of this step.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::OutputsSet { .. } => Self::OUTPUTS_SET,
            Self::Play { .. } => Self::PLAY,
            Self::VolumeSet { .. } => Self::VOLUME_SET,
            Self::Wait { .. } => Self::WAIT,
            Self::Transport { .. } => Self::TRANSPORT,
            Self::Unsupported { kind } => kind,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputsSet { rooms } => write!(f, "outputs.set({})", rooms.join(", ")),
            Self::Play { query, playlist_id } => match (playlist_id, query) {
                (Some(id), _) => write!(f, "play(id={id})"),
                (None, Some(query)) => write!(f, "play({query})"),
                (None, None) => f.write_str("play()"),
            },
            Self::VolumeSet { value, .. } => match value {
                Some(value) => write!(f, "volume.set({value})"),
                None => f.write_str("volume.set()"),
            },
            Self::Wait { state, timeout } => write!(
                f,
                "wait({}, {})",
                state.as_deref().unwrap_or(""),
                timeout.as_deref().unwrap_or("")
            ),
            Self::Transport { action } => {
                write!(f, "transport({})", action.as_deref().unwrap_or(""))
            }
            Self::Unsupported { kind } => write!(f, "unsupported({kind})"),
        }
    }
}

/// Flat wire form: every kind's fields side by side, as authored.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rooms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
}

impl From<RawStep> for Step {
    fn from(raw: RawStep) -> Self {
        match raw.kind.trim() {
            Step::OUTPUTS_SET => Self::OutputsSet { rooms: raw.rooms },
            Step::PLAY => Self::Play {
                query: raw.query,
                playlist_id: raw.playlist_id,
            },
            Step::VOLUME_SET => Self::VolumeSet {
                value: raw.value,
                rooms: raw.rooms,
            },
            Step::WAIT => Self::Wait {
                state: raw.state,
                timeout: raw.timeout,
            },
            Step::TRANSPORT => Self::Transport { action: raw.action },
            _ => Self::Unsupported {
                kind: raw.kind.clone(),
            },
        }
    }
}

impl From<Step> for RawStep {
    fn from(step: Step) -> Self {
        let kind = step.kind().to_string();
        match step {
            Step::OutputsSet { rooms } => Self {
                kind,
                rooms,
                ..Self::default()
            },
            Step::Play { query, playlist_id } => Self {
                kind,
                query,
                playlist_id,
                ..Self::default()
            },
            Step::VolumeSet { value, rooms } => Self {
                kind,
                value,
                rooms,
                ..Self::default()
            },
            Step::Wait { state, timeout } => Self {
                kind,
                state,
                timeout,
                ..Self::default()
            },
            Step::Transport { action } => Self {
                kind,
                action,
                ..Self::default()
            },
            Step::Unsupported { .. } => Self {
                kind,
                ..Self::default()
            },
        }
    }
}
