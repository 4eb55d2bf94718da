use eventra_core::error::CoreError;
use eventra_core::types::DbId;

/// Errors surfaced by the sync stores and remote store implementations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Input rejected before any remote call.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The HTTP request to the remote store failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store answered with an error status.
    #[error("Remote store returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// The remote store has no such entity.
    #[error("{entity} {id} not found in remote store")]
    NotFound { entity: &'static str, id: DbId },

    /// Transport failure reported by a non-HTTP remote store.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A settings write targeted an event whose settings are not loaded.
    #[error("Settings for event {requested} are not loaded (loaded: {loaded:?})")]
    EventNotLoaded { requested: DbId, loaded: Option<DbId> },

    /// The remote payload did not have the expected shape.
    #[error("Failed to decode remote payload: {0}")]
    Decode(#[from] serde_json::Error),
}
