//! Client-side data layer for the attendee configuration screens.
//!
//! Keeps an event's attendee categories and attendee settings document in
//! sync with the remote store:
//!
//! - [`CategoryStore`]: CRUD over the event's categories, mirrored locally.
//! - [`SettingsStore`]: the settings document, merged with injected defaults
//!   on read and written optimistically with rollback.
//! - [`AttendeeConfig`]: runs both fetches concurrently and exposes a single
//!   loading flag.
//!
//! The remote side is abstracted by [`RemoteStore`]; [`HttpRemoteStore`]
//! talks to `eventra-api` and [`InMemoryRemoteStore`] is a process-local fake.
//! User-facing failures go through a [`Notifier`].

pub mod attendee_config;
pub mod category_store;
pub mod error;
pub mod http;
pub mod memory;
pub mod notify;
pub mod optimistic;
pub mod remote;
pub mod settings_store;

pub use attendee_config::{AttendeeConfig, LoadPhase};
pub use category_store::CategoryStore;
pub use error::SyncError;
pub use http::HttpRemoteStore;
pub use memory::InMemoryRemoteStore;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use optimistic::Optimistic;
pub use remote::RemoteStore;
pub use settings_store::SettingsStore;
