//! Request handlers.
//!
//! Resource handlers delegate to the repositories in `eventra_db` and map
//! errors via [`AppError`](crate::error::AppError). The mail relay answers
//! with its own `{ ok }` / `{ error }` shape.

pub mod attendee_settings;
pub mod category;
pub mod event;
pub mod mail;
