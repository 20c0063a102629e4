//! Error types used across the workspace.
//!
//! Each failure family is its own typed enum. [`RoomcastError`] is the root
//! type every layer propagates; the families convert into it via `#[from]`,
//! and adapters wrap their own failures in [`RoomcastError::Backend`] or
//! [`RoomcastError::Storage`].

use std::time::Duration;

/// Root error type.
#[derive(Debug, thiserror::Error)]
pub enum RoomcastError {
    /// Caller mistake on the config surface (malformed path, arity, bad token).
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Malformed automation document or step.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The configuration cannot satisfy the request (missing document,
    /// unsupported backend, no rooms, missing shortcut).
    #[error(transparent)]
    Config(#[from] ConfigStateError),

    /// A named thing (alias, mapping, playlist) does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A `wait` step gave up.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// The run was cancelled from outside.
    #[error("cancelled")]
    Cancelled,

    /// Opaque failure from a playback backend, surfaced verbatim.
    #[error("{0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading or writing the configuration document failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RoomcastError {
    /// Wrap any error (or message) as a backend failure.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    /// Whether this error is a caller mistake rather than a runtime failure.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::Validation(_))
    }
}

/// Malformed config path or value tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("unknown config path: {path}")]
    UnknownPath { path: String },

    #[error("{path}: expected {expected} value(s), got {got}")]
    Arity {
        path: String,
        expected: usize,
        got: usize,
    },

    #[error("{path}: invalid boolean {value:?} (expected true/false, yes/no, on/off or 1/0)")]
    InvalidBool { path: String, value: String },

    #[error("{path}: invalid volume {value:?} (expected an integer 0..100)")]
    InvalidVolume { path: String, value: String },

    #[error("{path}: invalid backend {value:?} (expected continuous or discrete)")]
    InvalidBackend { path: String, value: String },

    #[error("{path}: {component} must not be empty")]
    EmptyComponent {
        path: String,
        component: &'static str,
    },

    #[error("{path}: alias name {name:?} must not contain '.'")]
    DottedAliasName { path: String, name: String },

    #[error("{path}: path cannot be unset")]
    NotUnsettable { path: String },
}

/// Shape problems in automation documents and steps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("automation document has no steps")]
    NoSteps,

    #[error("{kind} step requires {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("volume {0} is out of range 0..100")]
    VolumeOutOfRange(i64),

    #[error("invalid volume {0:?} (expected an integer 0..100)")]
    InvalidVolume(String),

    #[error("invalid duration {0:?}")]
    InvalidDuration(String),

    #[error("unsupported step type: {0}")]
    UnsupportedStepType(String),

    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("invalid config document at {path}: {reason}")]
    Invariant { path: String, reason: &'static str },
}

/// The configuration cannot satisfy a step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigStateError {
    #[error("{action} requires a configuration document")]
    MissingConfig { action: &'static str },

    #[error("{kind} is only supported by the continuous backend (backend is {backend})")]
    ContinuousOnly {
        kind: &'static str,
        backend: &'static str,
    },

    #[error("unknown backend: {0:?}")]
    UnknownBackend(String),

    #[error("{kind} requires at least one room")]
    NoRooms { kind: &'static str },

    #[error("no {what} shortcut configured for room {room:?} and {key:?}")]
    MissingShortcut {
        what: &'static str,
        room: String,
        key: String,
    },
}

/// Lookup of a named thing failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A `wait` step reached its deadline before the wanted state showed up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("timed out after {}ms waiting for state {wanted:?}", .elapsed.as_millis())]
pub struct TimeoutError {
    pub elapsed: Duration,
    pub wanted: String,
}
