//! Process-local [`RemoteStore`] used by tests, demos and offline previews.
//!
//! Besides storing rows, it counts every call it receives and lets callers
//! inject failures per operation or hold calls at a gate until released, so
//! in-flight states can be observed deterministically. Reads are answered
//! when the call arrives; the gate only delays the response.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use eventra_core::category::{Category, CategoryDraft, CategoryPatch};
use eventra_core::settings::SettingsDocument;
use eventra_core::types::DbId;
use tokio::sync::watch;

use crate::error::SyncError;
use crate::remote::RemoteStore;

/// The kinds of call a [`RemoteStore`] receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListCategories,
    InsertCategory,
    UpdateCategory,
    DeleteCategory,
    FetchSettings,
    StoreSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Hold {
    Released,
    All,
    Events(HashSet<DbId>),
    Operations(HashSet<Operation>),
}

impl Hold {
    fn holds(&self, operation: Operation, event_id: Option<DbId>) -> bool {
        match self {
            Hold::Released => false,
            Hold::All => true,
            Hold::Events(events) => event_id.is_some_and(|id| events.contains(&id)),
            Hold::Operations(operations) => operations.contains(&operation),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: DbId,
    categories: Vec<Category>,
    settings: HashMap<DbId, SettingsDocument>,
    calls: Vec<Operation>,
    failing: HashSet<Operation>,
}

/// In-memory remote store.
pub struct InMemoryRemoteStore {
    state: Mutex<MemoryState>,
    hold: watch::Sender<Hold>,
    waiting: watch::Sender<usize>,
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        let (hold, _) = watch::channel(Hold::Released);
        let (waiting, _) = watch::channel(0);
        Self {
            state: Mutex::new(MemoryState::default()),
            hold,
            waiting,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -- Failure injection --

    /// Make every subsequent `operation` call fail with a transport error.
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    /// Undo [`fail`](Self::fail).
    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    // -- Gate --

    /// Park every subsequent call until [`release`](Self::release).
    pub fn hold_all(&self) {
        self.hold.send_replace(Hold::All);
    }

    /// Park calls scoped to `event_id` until [`release`](Self::release).
    pub fn hold_event(&self, event_id: DbId) {
        self.hold.send_modify(|hold| match hold {
            Hold::Events(events) => {
                events.insert(event_id);
            }
            other => *other = Hold::Events(HashSet::from([event_id])),
        });
    }

    /// Park calls of `operation` until [`release`](Self::release).
    pub fn hold_operation(&self, operation: Operation) {
        self.hold.send_modify(|hold| match hold {
            Hold::Operations(operations) => {
                operations.insert(operation);
            }
            other => *other = Hold::Operations(HashSet::from([operation])),
        });
    }

    /// Let every parked call proceed.
    pub fn release(&self) {
        self.hold.send_replace(Hold::Released);
    }

    /// Resolve once at least `count` calls are parked at the gate.
    pub async fn parked(&self, count: usize) {
        let mut rx = self.waiting.subscribe();
        let _ = rx.wait_for(|n| *n >= count).await;
    }

    // -- Inspection / seeding --

    pub fn count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|&&op| op == operation)
            .count()
    }

    /// Stored categories of an event, oldest first.
    pub fn categories_for(&self, event_id: DbId) -> Vec<Category> {
        self.lock()
            .categories
            .iter()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn stored_settings(&self, event_id: DbId) -> Option<SettingsDocument> {
        self.lock().settings.get(&event_id).cloned()
    }

    pub fn seed_settings(&self, event_id: DbId, document: SettingsDocument) {
        self.lock().settings.insert(event_id, document);
    }

    /// Insert a category directly, bypassing the call log.
    pub fn seed_category(&self, event_id: DbId, draft: &CategoryDraft) -> Category {
        insert(&mut self.lock(), event_id, draft)
    }

    // -- Call plumbing --

    /// Record the call, wait at the gate if held, then fail if injected.
    async fn enter(&self, operation: Operation, event_id: Option<DbId>) -> Result<(), SyncError> {
        self.lock().calls.push(operation);

        let mut rx = self.hold.subscribe();
        if rx.borrow().holds(operation, event_id) {
            self.waiting.send_modify(|n| *n += 1);
            let _ = rx.wait_for(|hold| !hold.holds(operation, event_id)).await;
            self.waiting.send_modify(|n| *n = n.saturating_sub(1));
        }

        if self.lock().failing.contains(&operation) {
            return Err(SyncError::Transport(format!(
                "injected failure for {operation:?}"
            )));
        }
        Ok(())
    }

    fn event_of_category(&self, id: DbId) -> Option<DbId> {
        self.lock()
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.event_id)
    }
}

fn insert(state: &mut MemoryState, event_id: DbId, draft: &CategoryDraft) -> Category {
    state.next_id += 1;
    let now = Utc::now();
    let category = Category {
        id: state.next_id,
        event_id,
        name: draft.name.trim().to_string(),
        description: draft.description.clone(),
        color: draft.color.clone(),
        icon: draft.icon.clone(),
        is_default: draft.is_default,
        is_active: draft.is_active,
        assignment_criteria: draft.assignment_criteria,
        assignment_value: draft.assignment_value.clone(),
        created_at: now,
        updated_at: now,
    };
    state.categories.push(category.clone());
    category
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn list_categories(&self, event_id: DbId) -> Result<Vec<Category>, SyncError> {
        let rows = self.categories_for(event_id);
        self.enter(Operation::ListCategories, Some(event_id)).await?;
        Ok(rows)
    }

    async fn insert_category(
        &self,
        event_id: DbId,
        draft: &CategoryDraft,
    ) -> Result<Category, SyncError> {
        self.enter(Operation::InsertCategory, Some(event_id)).await?;
        Ok(insert(&mut self.lock(), event_id, draft))
    }

    async fn update_category(&self, id: DbId, patch: &CategoryPatch) -> Result<Category, SyncError> {
        let event_id = self.event_of_category(id);
        self.enter(Operation::UpdateCategory, event_id).await?;

        let mut state = self.lock();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(SyncError::NotFound {
                entity: "Category",
                id,
            })?;
        patch.apply_to(category);
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: DbId) -> Result<(), SyncError> {
        let event_id = self.event_of_category(id);
        self.enter(Operation::DeleteCategory, event_id).await?;
        self.lock().categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn fetch_settings(&self, event_id: DbId) -> Result<Option<SettingsDocument>, SyncError> {
        let stored = self.stored_settings(event_id);
        self.enter(Operation::FetchSettings, Some(event_id)).await?;
        Ok(stored)
    }

    async fn store_settings(
        &self,
        event_id: DbId,
        document: &SettingsDocument,
    ) -> Result<(), SyncError> {
        self.enter(Operation::StoreSettings, Some(event_id)).await?;
        self.seed_settings(event_id, document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = InMemoryRemoteStore::new();
        let a = store.insert_category(1, &CategoryDraft::named("A")).await.unwrap();
        let b = store.insert_category(1, &CategoryDraft::named("B")).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.categories_for(1).len(), 2);
        assert!(store.categories_for(2).is_empty());
    }

    #[tokio::test]
    async fn injected_failures_are_recorded_and_recoverable() {
        let store = InMemoryRemoteStore::new();
        store.fail(Operation::ListCategories);
        assert_matches!(store.list_categories(1).await, Err(SyncError::Transport(_)));

        store.recover(Operation::ListCategories);
        assert!(store.list_categories(1).await.is_ok());
        assert_eq!(store.count(Operation::ListCategories), 2);
    }

    #[tokio::test]
    async fn held_calls_wait_for_release() {
        let store = Arc::new(InMemoryRemoteStore::new());
        store.hold_event(9);

        let task = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.fetch_settings(9).await })
        };
        store.parked(1).await;

        // Other events are not held.
        assert!(store.fetch_settings(10).await.is_ok());
        assert!(!task.is_finished());

        store.release();
        assert_matches!(task.await.unwrap(), Ok(None));
    }

    #[tokio::test]
    async fn held_reads_answer_with_rows_at_call_time() {
        let store = Arc::new(InMemoryRemoteStore::new());
        store.seed_category(1, &CategoryDraft::named("VIP"));
        store.hold_operation(Operation::ListCategories);

        let task = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.list_categories(1).await })
        };
        store.parked(1).await;

        // Writes are not held by a read hold.
        store.insert_category(1, &CategoryDraft::named("Press")).await.unwrap();

        store.release();
        let rows = task.await.unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.categories_for(1).len(), 2);
    }

    #[tokio::test]
    async fn updating_missing_category_is_not_found() {
        let store = InMemoryRemoteStore::new();
        let result = store.update_category(5, &CategoryPatch::default()).await;
        assert_matches!(result, Err(SyncError::NotFound { id: 5, .. }));
    }
}
