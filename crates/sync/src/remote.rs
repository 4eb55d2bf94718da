//! Abstraction over the hosted relational store.

use async_trait::async_trait;
use eventra_core::category::{Category, CategoryDraft, CategoryPatch};
use eventra_core::settings::SettingsDocument;
use eventra_core::types::DbId;

use crate::error::SyncError;

/// Row-oriented operations the stores need from the remote side.
///
/// Identity and timestamps are always assigned remotely. Implementations do
/// not retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All categories of an event, oldest first.
    async fn list_categories(&self, event_id: DbId) -> Result<Vec<Category>, SyncError>;

    /// Insert a category and return the stored row.
    async fn insert_category(
        &self,
        event_id: DbId,
        draft: &CategoryDraft,
    ) -> Result<Category, SyncError>;

    /// Apply the present fields of `patch` and return the stored row.
    async fn update_category(&self, id: DbId, patch: &CategoryPatch) -> Result<Category, SyncError>;

    /// Delete a category. Deleting an id that does not exist succeeds.
    async fn delete_category(&self, id: DbId) -> Result<(), SyncError>;

    /// The stored settings document, or `None` if never written.
    async fn fetch_settings(&self, event_id: DbId) -> Result<Option<SettingsDocument>, SyncError>;

    /// Replace the stored settings document.
    async fn store_settings(
        &self,
        event_id: DbId,
        document: &SettingsDocument,
    ) -> Result<(), SyncError>;
}
