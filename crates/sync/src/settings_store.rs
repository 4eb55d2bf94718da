//! The attendee settings document of the loaded event.
//!
//! Reads merge the stored document onto the injected defaults. Writes are
//! optimistic: the merged document is visible locally before the remote
//! write resolves, and is rolled back if the write fails.

use std::sync::Arc;

use eventra_core::settings::{AttendeeSettings, SettingsDocument};
use eventra_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::SyncError;
use crate::notify::{Notification, Notifier};
use crate::optimistic::Optimistic;
use crate::remote::RemoteStore;

#[derive(Debug)]
struct SettingsState {
    event_id: Option<DbId>,
    document: SettingsDocument,
    /// Bumped by every fetch; a fetch that settles under an older generation
    /// is dropped.
    generation: u64,
    /// Bumped by every write. A fetch of the loaded event that settles after
    /// a write started is dropped; fetches of other events are unaffected.
    writes: u64,
}

pub struct SettingsStore {
    remote: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    defaults: SettingsDocument,
    state: RwLock<SettingsState>,
}

impl SettingsStore {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        notifier: Arc<dyn Notifier>,
        defaults: SettingsDocument,
    ) -> Self {
        Self {
            remote,
            notifier,
            state: RwLock::new(SettingsState {
                event_id: None,
                document: defaults.clone(),
                generation: 0,
                writes: 0,
            }),
            defaults,
        }
    }

    /// A store seeded with [`AttendeeSettings::default_document`].
    pub fn with_attendee_defaults(remote: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(remote, notifier, AttendeeSettings::default_document())
    }

    /// The current document.
    pub async fn document(&self) -> SettingsDocument {
        self.state.read().await.document.clone()
    }

    /// The event whose settings are loaded.
    pub async fn event_id(&self) -> Option<DbId> {
        self.state.read().await.event_id
    }

    /// The current document decoded into the typed view.
    pub async fn typed(&self) -> Result<AttendeeSettings, SyncError> {
        Ok(self.state.read().await.document.decode()?)
    }

    /// Load the settings of `event_id`, merged onto the defaults.
    ///
    /// An event with nothing stored reads as the defaults. On failure the
    /// current state is kept and the error is reported and returned.
    pub async fn fetch(&self, event_id: DbId) -> Result<SettingsDocument, SyncError> {
        let (generation, writes) = self.begin_fetch().await;

        let stored = match self.remote.fetch_settings(event_id).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, event_id, "Failed to load attendee settings");
                self.notifier.notify(Notification::error(
                    "Error",
                    format!("Failed to load attendee settings: {e}"),
                ));
                return Err(e);
            }
        };
        let document = match stored {
            Some(stored) => stored.merged_onto(&self.defaults),
            None => self.defaults.clone(),
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(event_id, generation, "Discarding stale settings fetch");
            return Ok(document);
        }
        if state.event_id == Some(event_id) && state.writes != writes {
            tracing::debug!(event_id, "Discarding settings fetch overtaken by a local write");
            return Ok(state.document.clone());
        }
        state.event_id = Some(event_id);
        state.document = document.clone();
        tracing::debug!(event_id, keys = document.len(), "Attendee settings loaded");
        Ok(document)
    }

    /// Merge `partial` over the current document and persist the whole result.
    ///
    /// `event_id` must be the loaded event.
    pub async fn update(
        &self,
        event_id: DbId,
        partial: SettingsDocument,
    ) -> Result<SettingsDocument, SyncError> {
        self.write(event_id, |current| current.merge(&partial)).await
    }

    /// Write the defaults back as the event's settings.
    pub async fn reset(&self, event_id: DbId) -> Result<SettingsDocument, SyncError> {
        let defaults = self.defaults.clone();
        self.write(event_id, move |_| defaults).await
    }

    async fn write<F>(&self, event_id: DbId, next: F) -> Result<SettingsDocument, SyncError>
    where
        F: FnOnce(&SettingsDocument) -> SettingsDocument,
    {
        let pending = {
            let mut state = self.state.write().await;
            if state.event_id != Some(event_id) {
                return Err(SyncError::EventNotLoaded {
                    requested: event_id,
                    loaded: state.event_id,
                });
            }
            let merged = next(&state.document);
            merged.validate_size()?;
            state.writes += 1;
            Optimistic::apply(&mut state.document, merged)
        };

        match self.remote.store_settings(event_id, pending.applied()).await {
            Ok(()) => {
                tracing::info!(event_id, "Attendee settings saved");
                self.notifier.notify(Notification::success(
                    "Settings updated",
                    "Attendee settings have been saved",
                ));
                Ok(pending.commit())
            }
            Err(e) => {
                tracing::error!(error = %e, event_id, "Failed to save attendee settings");
                let mut state = self.state.write().await;
                if state.event_id == Some(event_id) {
                    let _ = pending.rollback(&mut state.document);
                } else {
                    let _ = pending.commit();
                }
                drop(state);
                self.notifier.notify(Notification::error(
                    "Error",
                    format!("Failed to update attendee settings: {e}"),
                ));
                Err(e)
            }
        }
    }

    async fn begin_fetch(&self) -> (u64, u64) {
        let mut state = self.state.write().await;
        state.generation += 1;
        (state.generation, state.writes)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::{json, Value};

    use super::*;
    use crate::memory::{InMemoryRemoteStore, Operation};
    use crate::notify::{NotificationLevel, RecordingNotifier};

    fn doc(value: Value) -> SettingsDocument {
        SettingsDocument::from_value(value).unwrap()
    }

    fn setup(
        defaults: SettingsDocument,
    ) -> (Arc<InMemoryRemoteStore>, Arc<RecordingNotifier>, Arc<SettingsStore>) {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let store = Arc::new(SettingsStore::new(remote.clone(), notifier.clone(), defaults));
        (remote, notifier, store)
    }

    #[tokio::test]
    async fn stored_keys_win_over_defaults() {
        let (remote, _, store) = setup(doc(json!({"a": 0, "b": 0})));
        remote.seed_settings(1, doc(json!({"a": 1})));

        let loaded = store.fetch(1).await.unwrap();

        assert_eq!(loaded, doc(json!({"a": 1, "b": 0})));
        assert_eq!(store.document().await, loaded);
    }

    #[tokio::test]
    async fn missing_row_reads_as_defaults() {
        let (_, _, store) = setup(doc(json!({"a": 0, "b": 0})));
        assert_eq!(store.fetch(1).await.unwrap(), doc(json!({"a": 0, "b": 0})));
        assert_eq!(store.event_id().await, Some(1));
    }

    #[tokio::test]
    async fn optimistic_update_is_visible_then_rolled_back() {
        let (remote, notifier, store) = setup(doc(json!({"a": 0, "b": 0})));
        remote.seed_settings(1, doc(json!({"a": 1})));
        store.fetch(1).await.unwrap();

        remote.fail(Operation::StoreSettings);
        remote.hold_all();
        let write = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.update(1, doc(json!({"b": 2}))).await })
        };
        remote.parked(1).await;

        assert_eq!(store.document().await, doc(json!({"a": 1, "b": 2})));

        remote.release();
        assert_matches!(write.await.unwrap(), Err(SyncError::Transport(_)));
        assert_eq!(store.document().await, doc(json!({"a": 1, "b": 0})));
        assert_eq!(notifier.errors(), 1);
    }

    #[tokio::test]
    async fn update_persists_full_merged_document() {
        let (remote, notifier, store) = setup(doc(json!({"a": 0, "b": 0})));
        store.fetch(1).await.unwrap();

        store.update(1, doc(json!({"b": 2}))).await.unwrap();

        assert_eq!(remote.stored_settings(1), Some(doc(json!({"a": 0, "b": 2}))));
        assert_eq!(notifier.all()[0].level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn update_requires_the_event_to_be_loaded() {
        let (remote, _, store) = setup(doc(json!({"a": 0})));
        store.fetch(1).await.unwrap();

        let result = store.update(2, doc(json!({"a": 1}))).await;

        assert_matches!(
            result,
            Err(SyncError::EventNotLoaded { requested: 2, loaded: Some(1) })
        );
        assert_eq!(remote.count(Operation::StoreSettings), 0);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_state_and_notifies() {
        let (remote, notifier, store) = setup(doc(json!({"a": 0})));
        remote.seed_settings(1, doc(json!({"a": 5})));
        store.fetch(1).await.unwrap();

        remote.fail(Operation::FetchSettings);
        assert!(store.fetch(2).await.is_err());

        assert_eq!(store.event_id().await, Some(1));
        assert_eq!(store.document().await, doc(json!({"a": 5})));
        assert_eq!(notifier.errors(), 1);
    }

    #[tokio::test]
    async fn reset_restores_defaults_exactly() {
        let (remote, _, store) = setup(doc(json!({"a": 0})));
        remote.seed_settings(1, doc(json!({"a": 3, "legacy": true})));
        store.fetch(1).await.unwrap();

        store.reset(1).await.unwrap();

        assert_eq!(store.document().await, doc(json!({"a": 0})));
        assert_eq!(remote.stored_settings(1), Some(doc(json!({"a": 0}))));
    }

    #[tokio::test]
    async fn stale_fetch_is_discarded() {
        let (remote, _, store) = setup(doc(json!({"a": 0})));
        remote.seed_settings(1, doc(json!({"a": 1})));
        remote.seed_settings(2, doc(json!({"a": 2})));
        remote.hold_event(1);

        let slow = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.fetch(1).await })
        };
        remote.parked(1).await;

        store.fetch(2).await.unwrap();
        remote.release();
        slow.await.unwrap().unwrap();

        assert_eq!(store.event_id().await, Some(2));
        assert_eq!(store.document().await, doc(json!({"a": 2})));
    }

    #[tokio::test]
    async fn write_overtakes_fetch_of_the_same_event() {
        let (remote, _, store) = setup(doc(json!({"a": 0})));
        remote.seed_settings(1, doc(json!({"a": 1})));
        store.fetch(1).await.unwrap();

        remote.hold_event(1);
        let refetch = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.fetch(1).await })
        };
        remote.parked(1).await;
        let write = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.update(1, doc(json!({"a": 7}))).await })
        };
        remote.parked(2).await;

        remote.release();
        refetch.await.unwrap().unwrap();
        write.await.unwrap().unwrap();

        assert_eq!(store.document().await, doc(json!({"a": 7})));
        assert_eq!(remote.stored_settings(1), Some(doc(json!({"a": 7}))));
    }

    #[tokio::test]
    async fn gdpr_toggle_persists_full_default_document() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let store =
            SettingsStore::with_attendee_defaults(remote.clone(), Arc::new(RecordingNotifier::new()));
        let defaults = AttendeeSettings::default_document();

        assert_eq!(store.fetch(1).await.unwrap(), defaults);

        store
            .update(1, doc(json!({"gdprCompliance": true})))
            .await
            .unwrap();

        let mut expected = defaults.clone();
        expected.insert("gdprCompliance", json!(true));
        assert_eq!(remote.stored_settings(1), Some(expected));
        assert!(store.typed().await.unwrap().gdpr_compliance);
    }
}
