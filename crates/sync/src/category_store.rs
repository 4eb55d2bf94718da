//! Local mirror of an event's attendee categories.

use std::sync::Arc;

use eventra_core::category::{Category, CategoryDraft, CategoryPatch};
use eventra_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::SyncError;
use crate::notify::{Notification, Notifier};
use crate::remote::RemoteStore;

/// A write that settled while the latest fetch was in flight.
#[derive(Debug, Clone)]
enum LocalWrite {
    Created(Category),
    Updated(Category),
    Deleted(DbId),
}

impl LocalWrite {
    /// Re-apply the write onto a freshly fetched list of `event_id`.
    fn replay(&self, event_id: DbId, items: &mut Vec<Category>) {
        match self {
            LocalWrite::Created(category) if category.event_id == event_id => {
                if !items.iter().any(|c| c.id == category.id) {
                    items.push(category.clone());
                }
            }
            LocalWrite::Created(_) => {}
            LocalWrite::Updated(category) => {
                if let Some(item) = items.iter_mut().find(|c| c.id == category.id) {
                    *item = category.clone();
                }
            }
            LocalWrite::Deleted(id) => items.retain(|c| c.id != *id),
        }
    }
}

#[derive(Debug, Default)]
struct CategoryState {
    event_id: Option<DbId>,
    items: Vec<Category>,
    /// Bumped by every `fetch_all`; a response for an older generation is
    /// dropped.
    generation: u64,
    /// `Some` while the latest fetch is in flight. Writes that settle in the
    /// meantime are recorded here and replayed over the fetched rows.
    overtaken: Option<Vec<LocalWrite>>,
}

impl CategoryState {
    fn record(&mut self, write: LocalWrite) {
        if let Some(writes) = self.overtaken.as_mut() {
            writes.push(write);
        }
    }
}

/// CRUD over one event's categories, mirrored into a local list.
///
/// The lock is never held across a remote call. Concurrent writers are not
/// coordinated: last write wins.
pub struct CategoryStore {
    remote: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<CategoryState>,
}

impl CategoryStore {
    pub fn new(remote: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            remote,
            notifier,
            state: RwLock::new(CategoryState::default()),
        }
    }

    /// Snapshot of the local list.
    pub async fn categories(&self) -> Vec<Category> {
        self.state.read().await.items.clone()
    }

    /// The event the local list belongs to.
    pub async fn event_id(&self) -> Option<DbId> {
        self.state.read().await.event_id
    }

    /// Load every category of `event_id`, oldest first, replacing the local
    /// list.
    ///
    /// Failures are reported through the notifier and read as an empty list.
    pub async fn fetch_all(&self, event_id: DbId) -> Vec<Category> {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.overtaken = Some(Vec::new());
            state.generation
        };

        let mut items = match self.remote.list_categories(event_id).await {
            Ok(items) => items,
            Err(e) => {
                self.report("load", &e);
                Vec::new()
            }
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(event_id, generation, "Discarding stale category fetch");
            return items;
        }
        for write in state.overtaken.take().unwrap_or_default() {
            write.replay(event_id, &mut items);
        }
        state.event_id = Some(event_id);
        state.items = items.clone();
        tracing::debug!(event_id, count = items.len(), "Categories loaded");
        items
    }

    /// Validate and insert a category, returning the stored row.
    ///
    /// The row is appended locally when the local list belongs to the same
    /// event (or to no event yet).
    pub async fn create(&self, event_id: DbId, draft: CategoryDraft) -> Result<Category, SyncError> {
        draft.validate()?;

        let category = match self.remote.insert_category(event_id, &draft).await {
            Ok(c) => c,
            Err(e) => {
                self.report("create", &e);
                return Err(e);
            }
        };

        let mut state = self.state.write().await;
        match state.event_id {
            Some(current) if current != event_id => {}
            _ => {
                state.event_id = Some(event_id);
                state.items.push(category.clone());
            }
        }
        state.record(LocalWrite::Created(category.clone()));
        tracing::info!(event_id, category_id = category.id, "Category created");
        Ok(category)
    }

    /// Send the present fields of `patch` and merge them into the local entry.
    ///
    /// An empty patch makes no remote call and returns the local entry.
    pub async fn update(&self, id: DbId, patch: CategoryPatch) -> Result<Category, SyncError> {
        patch.validate()?;

        if patch.is_empty() {
            let state = self.state.read().await;
            return state
                .items
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(SyncError::NotFound {
                    entity: "Category",
                    id,
                });
        }

        let stored = match self.remote.update_category(id, &patch).await {
            Ok(c) => c,
            Err(e) => {
                self.report("update", &e);
                return Err(e);
            }
        };

        let mut state = self.state.write().await;
        if let Some(local) = state.items.iter_mut().find(|c| c.id == id) {
            patch.apply_to(local);
            local.updated_at = stored.updated_at;
        }
        state.record(LocalWrite::Updated(stored.clone()));
        tracing::info!(category_id = id, "Category updated");
        Ok(stored)
    }

    /// Delete remotely, then drop the id from the local list.
    ///
    /// The remote call is made even when the id is not in the local list.
    pub async fn delete(&self, id: DbId) -> Result<(), SyncError> {
        if let Err(e) = self.remote.delete_category(id).await {
            self.report("delete", &e);
            return Err(e);
        }

        let mut state = self.state.write().await;
        state.items.retain(|c| c.id != id);
        state.record(LocalWrite::Deleted(id));
        drop(state);
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }

    fn report(&self, action: &str, error: &SyncError) {
        tracing::error!(error = %error, action, "Category store operation failed");
        self.notifier.notify(Notification::error(
            "Error",
            format!("Failed to {action} category: {error}"),
        ));
    }
}
