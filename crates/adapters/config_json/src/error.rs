//! Store-specific error type wrapping IO and JSON errors.

use std::path::PathBuf;

use roomcast_domain::error::RoomcastError;

/// Errors originating from the JSON config file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading, writing or renaming the file failed.
    #[error("config file error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid configuration document.
    #[error("invalid config file at {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StoreError> for RoomcastError {
    fn from(err: StoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}
