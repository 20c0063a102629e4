//! Config service — use-cases for reading and editing the configuration document.

use roomcast_domain::automation::{AutomationDocument, Step};
use roomcast_domain::config::{ConfigDocument, ConfigValue};
use roomcast_domain::error::{RoomcastError, ValidationError};

use crate::ports::ConfigStore;

/// What invoking an alias amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasAction {
    /// Run this OS shortcut and nothing else.
    Shortcut(String),
    /// Run this one-step automation.
    Automation(AutomationDocument),
}

/// Application service over the stored [`ConfigDocument`].
///
/// Every edit loads the current document (or starts from an empty one),
/// applies the change in memory and saves the whole document back.
pub struct ConfigService<S> {
    store: S,
}

impl<S: ConfigStore> ConfigService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load and validate the stored document.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the store, or a validation error when
    /// the stored document breaks an invariant.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<Option<ConfigDocument>, RoomcastError> {
        let document = self.store.load().await?;
        if let Some(document) = &document {
            document.validate()?;
        }
        Ok(document)
    }

    /// The stored document, or an empty one when none exists yet.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigService::load`].
    pub async fn document(&self) -> Result<ConfigDocument, RoomcastError> {
        Ok(self.load().await?.unwrap_or_default())
    }

    /// Read the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns a usage error for malformed paths, a not-found error for
    /// unknown aliases or mappings, or a storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Option<ConfigValue>, RoomcastError> {
        self.document().await?.get(path)
    }

    /// Set the value at `path` and persist the document.
    ///
    /// # Errors
    ///
    /// Returns a usage error when `values` do not fit `path`; nothing is
    /// saved in that case.
    #[tracing::instrument(skip(self, values))]
    pub async fn set<V: AsRef<str>>(&self, path: &str, values: &[V]) -> Result<(), RoomcastError> {
        let mut document = self.document().await?;
        document.set(path, values)?;
        self.store.save(&document).await?;
        tracing::info!(path, "config updated");
        Ok(())
    }

    /// Remove the value at `path` and persist the document.
    ///
    /// # Errors
    ///
    /// Returns a usage error for required fields or a not-found error when
    /// there is nothing to remove.
    #[tracing::instrument(skip(self))]
    pub async fn unset(&self, path: &str) -> Result<(), RoomcastError> {
        let mut document = self.document().await?;
        document.unset(path)?;
        self.store.save(&document).await?;
        tracing::info!(path, "config value removed");
        Ok(())
    }

    /// Work out what invoking alias `name` should do.
    ///
    /// An alias with a shortcut runs it directly. Otherwise its settings
    /// become the document defaults of a single `play` step.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown aliases and a validation error
    /// for aliases naming neither a shortcut nor a playlist.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_alias(&self, name: &str) -> Result<AliasAction, RoomcastError> {
        let document = self.document().await?;
        let alias = document.alias(name)?;

        let shortcut = alias.shortcut.trim();
        if !shortcut.is_empty() {
            return Ok(AliasAction::Shortcut(shortcut.to_string()));
        }

        let query = non_empty(&alias.playlist);
        let playlist_id = non_empty(&alias.playlist_id);
        if query.is_none() && playlist_id.is_none() {
            return Err(ValidationError::MissingField {
                kind: "alias",
                field: "shortcut, playlist or playlistId",
            }
            .into());
        }

        let automation = AutomationDocument::builder()
            .name(name.trim())
            .defaults(alias.to_defaults())
            .step(Step::Play { query, playlist_id })
            .build()?;
        Ok(AliasAction::Automation(automation))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
