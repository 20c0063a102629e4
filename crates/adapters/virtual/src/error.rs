//! Errors raised by the simulated player.

use roomcast_domain::error::RoomcastError;

#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    #[error("unknown room: {0}")]
    UnknownRoom(String),

    #[error("no playlist with id {0}")]
    UnknownPlaylist(String),

    #[error("shortcut name must not be empty")]
    EmptyShortcut,
}

impl From<VirtualError> for RoomcastError {
    fn from(err: VirtualError) -> Self {
        RoomcastError::backend(err)
    }
}
