//! Discrete backend helpers.
//!
//! The discrete backend cannot address outputs directly. Each room has
//! pre-built OS shortcuts for its playlists and volume levels, mapped in
//! [`NativeConfig`](roomcast_domain::config::NativeConfig). Every shortcut
//! is resolved before the first one runs, so a missing mapping leaves the
//! player untouched.

use roomcast_domain::config::ConfigDocument;
use roomcast_domain::error::{ConfigStateError, RoomcastError};
use roomcast_domain::volume::Volume;

use crate::ports::PlaybackBackend;

/// Start `playlist` in each of `rooms` through its mapped shortcut.
///
/// # Errors
///
/// Returns [`ConfigStateError::MissingShortcut`] for the first room without
/// a mapping, or the backend error of a failing shortcut.
#[tracing::instrument(skip(backend, config))]
pub async fn run_discrete_playlist_action<B: PlaybackBackend>(
    backend: &B,
    config: &ConfigDocument,
    rooms: &[String],
    playlist: &str,
) -> Result<(), RoomcastError> {
    let shortcuts = rooms
        .iter()
        .map(|room| {
            config
                .native
                .playlist_shortcut(room, playlist)
                .ok_or_else(|| ConfigStateError::MissingShortcut {
                    what: "playlist",
                    room: room.clone(),
                    key: playlist.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    run_all(backend, &shortcuts).await
}

/// Set each of `rooms` to `volume` through its mapped shortcut.
///
/// # Errors
///
/// Same as [`run_discrete_playlist_action`].
#[tracing::instrument(skip(backend, config))]
pub async fn run_discrete_volume_action<B: PlaybackBackend>(
    backend: &B,
    config: &ConfigDocument,
    rooms: &[String],
    volume: Volume,
) -> Result<(), RoomcastError> {
    let shortcuts = rooms
        .iter()
        .map(|room| {
            config
                .native
                .volume_shortcut(room, volume)
                .ok_or_else(|| ConfigStateError::MissingShortcut {
                    what: "volume",
                    room: room.clone(),
                    key: volume.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    run_all(backend, &shortcuts).await
}

async fn run_all<B: PlaybackBackend>(backend: &B, shortcuts: &[&str]) -> Result<(), RoomcastError> {
    for shortcut in shortcuts {
        tracing::debug!(shortcut, "running shortcut");
        backend.run_shortcut(shortcut).await?;
    }
    Ok(())
}
