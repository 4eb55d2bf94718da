//! Row types and request DTOs.
//!
//! Category types are defined in `eventra_core::category` (with `FromRow`
//! derived under the `sqlx` feature) so client crates share them without
//! depending on sqlx.

pub mod event;

pub use eventra_core::category::{Category, CategoryDraft, CategoryPatch};
