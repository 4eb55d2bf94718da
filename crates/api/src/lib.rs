//! Eventra API server library.
//!
//! Serves the remote store used by the attendee configuration screens
//! (events, attendee categories and attendee settings) plus the mail relay.
//! Exposed as a library so integration tests and the binary entrypoint share
//! the same router.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
