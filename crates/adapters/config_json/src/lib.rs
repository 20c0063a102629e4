//! # roomcast-adapter-config-json
//!
//! Persistence adapter that implements [`ConfigStore`] on top of a single
//! pretty-printed JSON file.
//!
//! A missing file reads as "no document". Saves write a sibling temporary
//! file first and rename it over the target, so a crash never leaves a
//! half-written document behind.
//!
//! ## Dependency rule
//!
//! Depends on `roomcast-app` (port traits) and `roomcast-domain` only.

mod error;

pub use error::StoreError;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use roomcast_app::ports::ConfigStore;
use roomcast_domain::config::ConfigDocument;
use roomcast_domain::error::RoomcastError;

/// JSON file backed [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigStore for JsonConfigStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<ConfigDocument>, RoomcastError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("no config file yet");
                return Ok(None);
            }
            Err(err) => return Err(self.io_error(err).into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let document = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(document))
    }

    #[tracing::instrument(skip(self, document), fields(path = %self.path.display()))]
    async fn save(&self, document: &ConfigDocument) -> Result<(), RoomcastError> {
        let mut raw = serde_json::to_string_pretty(document).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        raw.push('\n');

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, raw)
            .await
            .map_err(|err| self.io_error(err))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|err| self.io_error(err))?;
        tracing::debug!("config saved");
        Ok(())
    }
}
