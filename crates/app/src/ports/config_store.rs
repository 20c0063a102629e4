//! Config store port — persistence for the configuration document.

use std::future::Future;

use roomcast_domain::config::ConfigDocument;
use roomcast_domain::error::RoomcastError;

/// Loads and saves the single [`ConfigDocument`].
pub trait ConfigStore: Send + Sync {
    /// Read the stored document. `None` when nothing has been saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<ConfigDocument>, RoomcastError>> + Send;

    /// Replace the stored document with `document`.
    fn save(
        &self,
        document: &ConfigDocument,
    ) -> impl Future<Output = Result<(), RoomcastError>> + Send;
}
