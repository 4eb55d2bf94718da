//! Domain types and rules shared by the Eventra server and client crates.
//!
//! - [`category`]: attendee categories, drafts, patches and their validation.
//! - [`settings`]: the per-event attendee settings document and its
//!   merge-on-read semantics.
//! - [`mail`]: the outbound mail message accepted by the mail relay.

pub mod category;
pub mod error;
pub mod mail;
pub mod settings;
pub mod types;
