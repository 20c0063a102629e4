//! # roomcast-adapter-osascript
//!
//! Playback adapter for macOS: drives the Music application by running
//! AppleScript through `osascript -e`, and runs named Shortcuts through the
//! `shortcuts run` command.
//!
//! Every value interpolated into a script goes through
//! [`script::quote`], so room and playlist names cannot break out of their
//! string literals.
//!
//! ## Dependency rule
//!
//! Depends on `roomcast-app` (port traits) and `roomcast-domain` only.

mod config;
mod error;
mod script;

pub use config::OsascriptConfig;
pub use error::OsascriptError;

use std::process::Stdio;

use roomcast_app::ports::PlaybackBackend;
use roomcast_domain::error::RoomcastError;
use roomcast_domain::playlist::Playlist;
use roomcast_domain::volume::Volume;
use tokio::process::Command;

/// [`PlaybackBackend`] backed by `osascript` and `shortcuts`.
#[derive(Debug, Clone, Default)]
pub struct OsascriptBackend {
    config: OsascriptConfig,
}

impl OsascriptBackend {
    #[must_use]
    pub fn new(config: OsascriptConfig) -> Self {
        Self { config }
    }

    async fn osascript(&self, source: String) -> Result<String, OsascriptError> {
        run(&self.config.osascript, &["-e", &source]).await
    }

    fn app(&self) -> &str {
        &self.config.application
    }
}

/// Run `program` with `args`, returning its stdout.
async fn run(program: &str, args: &[&str]) -> Result<String, OsascriptError> {
    tracing::trace!(program, ?args, "spawning helper");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| OsascriptError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(OsascriptError::Failed {
            program: program.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

impl PlaybackBackend for OsascriptBackend {
    #[tracing::instrument(skip(self))]
    async fn select_outputs(&self, rooms: &[String]) -> Result<(), RoomcastError> {
        self.osascript(script::select_outputs(self.app(), rooms))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn set_volume(&self, rooms: &[String], volume: Volume) -> Result<(), RoomcastError> {
        self.osascript(script::set_volume(self.app(), rooms, volume))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn set_shuffle(&self, enabled: bool) -> Result<(), RoomcastError> {
        self.osascript(script::set_shuffle(self.app(), enabled))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn search_playlists(&self, query: &str) -> Result<Vec<Playlist>, RoomcastError> {
        let output = self
            .osascript(script::search_playlists(self.app(), query))
            .await?;
        Ok(script::parse_playlists(&output))
    }

    #[tracing::instrument(skip(self))]
    async fn play_by_id(&self, id: &str) -> Result<(), RoomcastError> {
        self.osascript(script::play_by_id(self.app(), id)).await?;
        Ok(())
    }

    async fn find_playlist_name_by_id(&self, id: &str) -> Result<String, RoomcastError> {
        let output = self.osascript(script::playlist_name(self.app(), id)).await?;
        Ok(output.trim().to_string())
    }

    async fn infer_current_outputs(&self) -> Vec<String> {
        match self.osascript(script::current_outputs(self.app())).await {
            Ok(output) => script::parse_lines(&output),
            Err(err) => {
                tracing::warn!(error = %err, "could not read current outputs");
                Vec::new()
            }
        }
    }

    async fn now_playing_state(&self) -> Result<String, RoomcastError> {
        let output = self.osascript(script::player_state(self.app())).await?;
        Ok(output.trim().to_string())
    }

    #[tracing::instrument(skip(self))]
    async fn stop_playback(&self) -> Result<(), RoomcastError> {
        self.osascript(script::stop(self.app())).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn run_shortcut(&self, name: &str) -> Result<(), RoomcastError> {
        run(&self.config.shortcuts, &["run", name]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_programs() -> OsascriptBackend {
        OsascriptBackend::new(OsascriptConfig {
            osascript: "/nonexistent/roomcast-osascript".to_string(),
            shortcuts: "/nonexistent/roomcast-shortcuts".to_string(),
            ..OsascriptConfig::default()
        })
    }

    #[tokio::test]
    async fn should_report_spawn_failure_as_backend_error() {
        let err = missing_programs().stop_playback().await.unwrap_err();
        assert!(matches!(err, RoomcastError::Backend(_)));
        assert_eq!(err.to_string(), "failed to run /nonexistent/roomcast-osascript");
    }

    #[tokio::test]
    async fn should_infer_no_outputs_when_player_unreachable() {
        assert!(missing_programs().infer_current_outputs().await.is_empty());
    }

    #[tokio::test]
    async fn should_run_shortcuts_through_shortcuts_program() {
        let err = missing_programs().run_shortcut("BR Sleep").await.unwrap_err();
        assert_eq!(err.to_string(), "failed to run /nonexistent/roomcast-shortcuts");
    }
}
