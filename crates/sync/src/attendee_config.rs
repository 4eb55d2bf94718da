//! Loads categories and settings for an event together.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use eventra_core::settings::SettingsDocument;
use eventra_core::types::DbId;
use tokio::sync::watch;

use crate::category_store::CategoryStore;
use crate::notify::Notifier;
use crate::remote::RemoteStore;
use crate::settings_store::SettingsStore;

/// Load state of the attendee configuration.
///
/// `Idle -> Loading -> Ready`, re-entering `Loading` whenever a new event is
/// loaded. Failed fetches still end in `Ready`; they are reported through the
/// notifier and leave stale or default state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading { event_id: DbId },
    Ready { event_id: DbId },
}

impl LoadPhase {
    pub fn event_id(&self) -> Option<DbId> {
        match self {
            LoadPhase::Idle => None,
            LoadPhase::Loading { event_id } | LoadPhase::Ready { event_id } => Some(*event_id),
        }
    }
}

/// Category and settings stores bound to one event at a time.
pub struct AttendeeConfig {
    categories: Arc<CategoryStore>,
    settings: Arc<SettingsStore>,
    phase: watch::Sender<LoadPhase>,
    generation: AtomicU64,
}

impl AttendeeConfig {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        notifier: Arc<dyn Notifier>,
        defaults: SettingsDocument,
    ) -> Self {
        Self::from_stores(
            Arc::new(CategoryStore::new(remote.clone(), notifier.clone())),
            Arc::new(SettingsStore::new(remote, notifier, defaults)),
        )
    }

    pub fn from_stores(categories: Arc<CategoryStore>, settings: Arc<SettingsStore>) -> Self {
        let (phase, _) = watch::channel(LoadPhase::Idle);
        Self {
            categories,
            settings,
            phase,
            generation: AtomicU64::new(0),
        }
    }

    pub fn categories(&self) -> &Arc<CategoryStore> {
        &self.categories
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn phase(&self) -> LoadPhase {
        *self.phase.borrow()
    }

    /// `true` from the start of a load until both fetches have settled.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase(), LoadPhase::Loading { .. })
    }

    /// Watch phase transitions.
    pub fn subscribe(&self) -> watch::Receiver<LoadPhase> {
        self.phase.subscribe()
    }

    /// Fetch categories and settings of `event_id` concurrently.
    ///
    /// If another load starts before this one settles, this one does not mark
    /// the phase `Ready`.
    pub async fn load(&self, event_id: DbId) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.phase.send_replace(LoadPhase::Loading { event_id });
        tracing::debug!(event_id, generation, "Loading attendee configuration");

        let (categories, settings) = tokio::join!(
            self.categories.fetch_all(event_id),
            self.settings.fetch(event_id),
        );

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(event_id, generation, "Superseded attendee configuration load");
            return;
        }
        self.phase.send_replace(LoadPhase::Ready { event_id });
        tracing::info!(
            event_id,
            categories = categories.len(),
            settings_loaded = settings.is_ok(),
            "Attendee configuration loaded"
        );
    }

    /// Load `event_id` unless it is already the current event. Returns whether
    /// a load ran.
    pub async fn set_event(&self, event_id: DbId) -> bool {
        if self.phase().event_id() == Some(event_id) {
            return false;
        }
        self.load(event_id).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::memory::{InMemoryRemoteStore, Operation};
    use crate::notify::RecordingNotifier;
    use eventra_core::category::CategoryDraft;

    fn setup() -> (Arc<InMemoryRemoteStore>, Arc<RecordingNotifier>, Arc<AttendeeConfig>) {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let defaults = SettingsDocument::from_value(json!({"a": 0})).unwrap();
        let config = Arc::new(AttendeeConfig::new(remote.clone(), notifier.clone(), defaults));
        (remote, notifier, config)
    }

    #[tokio::test]
    async fn starts_idle() {
        let (_, _, config) = setup();
        assert_eq!(config.phase(), LoadPhase::Idle);
        assert!(!config.is_loading());
    }

    #[tokio::test]
    async fn loading_until_both_fetches_settle() {
        let (remote, _, config) = setup();
        remote.seed_category(1, &CategoryDraft::named("VIP"));
        remote.hold_all();

        let load = {
            let config = Arc::clone(&config);
            tokio::spawn(async move { config.load(1).await })
        };
        remote.parked(2).await;
        assert!(config.is_loading());
        assert_eq!(config.phase(), LoadPhase::Loading { event_id: 1 });

        remote.release();
        load.await.unwrap();

        assert_eq!(config.phase(), LoadPhase::Ready { event_id: 1 });
        assert_eq!(config.categories().categories().await.len(), 1);
        assert_eq!(config.settings().event_id().await, Some(1));
    }

    #[tokio::test]
    async fn failures_still_settle_to_ready() {
        let (remote, notifier, config) = setup();
        remote.fail(Operation::ListCategories);
        remote.fail(Operation::FetchSettings);

        config.load(1).await;

        assert_eq!(config.phase(), LoadPhase::Ready { event_id: 1 });
        assert_eq!(notifier.errors(), 2);
    }

    #[tokio::test]
    async fn set_event_only_reloads_on_change() {
        let (remote, _, config) = setup();

        assert!(config.set_event(1).await);
        assert!(!config.set_event(1).await);
        assert!(config.set_event(2).await);

        assert_eq!(remote.count(Operation::ListCategories), 2);
        assert_eq!(remote.count(Operation::FetchSettings), 2);
    }

    #[tokio::test]
    async fn superseded_load_is_discarded() {
        let (remote, _, config) = setup();
        remote.seed_category(1, &CategoryDraft::named("Old"));
        remote.seed_category(2, &CategoryDraft::named("New"));
        remote.hold_event(1);

        let slow = {
            let config = Arc::clone(&config);
            tokio::spawn(async move { config.load(1).await })
        };
        remote.parked(2).await;

        config.load(2).await;
        assert_eq!(config.phase(), LoadPhase::Ready { event_id: 2 });

        remote.release();
        slow.await.unwrap();

        assert_eq!(config.phase(), LoadPhase::Ready { event_id: 2 });
        let names: Vec<_> = config
            .categories()
            .categories()
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["New"]);
        assert_eq!(config.settings().event_id().await, Some(2));
    }

    #[tokio::test]
    async fn settings_write_during_event_switch_keeps_both_stores_on_new_event() {
        let (remote, notifier, config) = setup();
        config.load(1).await;

        remote.hold_event(2);
        let switch = {
            let config = Arc::clone(&config);
            tokio::spawn(async move { config.load(2).await })
        };
        remote.parked(2).await;

        config
            .settings()
            .update(1, SettingsDocument::from_value(json!({"a": 1})).unwrap())
            .await
            .unwrap();

        remote.release();
        switch.await.unwrap();

        assert_eq!(config.phase(), LoadPhase::Ready { event_id: 2 });
        assert_eq!(config.categories().event_id().await, Some(2));
        assert_eq!(config.settings().event_id().await, Some(2));
        assert_eq!(
            config.settings().document().await,
            SettingsDocument::from_value(json!({"a": 0})).unwrap()
        );
        assert_eq!(
            remote.stored_settings(1),
            Some(SettingsDocument::from_value(json!({"a": 1})).unwrap())
        );
        assert_eq!(notifier.errors(), 0);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let (_, _, config) = setup();
        let mut rx = config.subscribe();

        config.load(3).await;

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), LoadPhase::Ready { event_id: 3 });
    }
}
