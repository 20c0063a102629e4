use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roomcast_domain::automation::{AutomationDocument, Step};
use roomcast_domain::config::parse_bool;
use roomcast_domain::defaults::Defaults;
use roomcast_domain::error::RoomcastError;

use crate::config::Driver;

/// roomcast - drive multi-room audio playback from scripts and the shell
#[derive(Debug, Parser)]
#[command(name = "roomcast")]
#[command(about = "Run playback automations across rooms and edit their configuration")]
#[command(version)]
pub struct Cli {
    /// Runtime settings file
    #[arg(long, global = true, env = "ROOMCAST_SETTINGS", default_value = "roomcast.toml")]
    pub settings: PathBuf,

    /// Player driver, overriding the settings file
    #[arg(long, global = true, value_enum)]
    pub driver: Option<Driver>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read or edit the configuration document
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Run an automation file (`-` reads JSON from stdin)
    Run {
        /// JSON or TOML automation document
        file: String,
    },
    /// Show how an automation file would run, without running it
    Plan {
        /// JSON or TOML automation document
        file: String,
    },
    /// Play a playlist
    Play {
        /// Playlist name to search for
        query: Option<String>,
        /// Persistent playlist identifier, takes precedence over the query
        #[arg(long)]
        playlist_id: Option<String>,
        /// Room to play in (repeatable)
        #[arg(long = "room")]
        rooms: Vec<String>,
        /// Volume applied to the rooms before playing
        #[arg(long, allow_negative_numbers = true)]
        volume: Option<i64>,
        /// Shuffle on or off (1/true/yes/on, 0/false/no/off)
        #[arg(long, value_parser = parse_switch)]
        shuffle: Option<bool>,
        /// Backend: continuous (airplay) or discrete (native)
        #[arg(long)]
        backend: Option<String>,
    },
    /// Set the volume of rooms
    Volume {
        /// Level between 0 and 100
        #[arg(allow_negative_numbers = true)]
        value: i64,
        /// Room to change (repeatable); defaults to the configured or current rooms
        #[arg(long = "room")]
        rooms: Vec<String>,
        /// Backend: continuous (airplay) or discrete (native)
        #[arg(long)]
        backend: Option<String>,
    },
    /// Route playback to exactly these rooms
    Outputs {
        #[arg(required = true)]
        rooms: Vec<String>,
    },
    /// Stop playback
    Stop,
    /// Wait until the player reaches a state
    Wait {
        /// State to wait for, e.g. playing or paused
        state: String,
        /// Deadline such as 10s or 1m30s (default 30s)
        #[arg(long)]
        timeout: Option<String>,
    },
    /// Run a configured alias
    Alias {
        /// Alias name
        name: String,
    },
    /// Print the player state and current outputs
    Status,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value at a dotted path
    Get { path: String },
    /// Set the value at a dotted path (several values for room lists)
    Set {
        path: String,
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Remove an optional value, an alias or a native mapping
    Unset { path: String },
    /// Print the whole configuration document
    Show,
}

fn parse_switch(value: &str) -> Result<bool, String> {
    parse_bool(value).ok_or_else(|| format!("expected a boolean, got {value:?}"))
}

impl Commands {
    /// The single-step automation behind a one-off playback command.
    ///
    /// Returns `None` for commands that are not automations.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the document cannot be built.
    pub fn one_off(&self) -> Result<Option<AutomationDocument>, RoomcastError> {
        let (name, defaults, step) = match self {
            Self::Play {
                query,
                playlist_id,
                rooms,
                volume,
                shuffle,
                backend,
            } => (
                "play",
                Defaults {
                    backend: backend.clone().unwrap_or_default(),
                    rooms: rooms.clone(),
                    volume: *volume,
                    shuffle: *shuffle,
                },
                Step::Play {
                    query: query.clone(),
                    playlist_id: playlist_id.clone(),
                },
            ),
            Self::Volume {
                value,
                rooms,
                backend,
            } => (
                "volume",
                Defaults {
                    backend: backend.clone().unwrap_or_default(),
                    ..Defaults::default()
                },
                Step::VolumeSet {
                    value: Some(*value),
                    rooms: rooms.clone(),
                },
            ),
            Self::Outputs { rooms } => (
                "outputs",
                Defaults::default(),
                Step::OutputsSet {
                    rooms: rooms.clone(),
                },
            ),
            Self::Stop => (
                "stop",
                Defaults::default(),
                Step::Transport {
                    action: Some("stop".to_string()),
                },
            ),
            Self::Wait { state, timeout } => (
                "wait",
                Defaults::default(),
                Step::Wait {
                    state: Some(state.clone()),
                    timeout: timeout.clone(),
                },
            ),
            _ => return Ok(None),
        };

        AutomationDocument::builder()
            .name(name)
            .defaults(defaults)
            .step(step)
            .build()
            .map(Some)
    }
}
