//! Event entity model and DTOs.

use eventra_core::error::CoreError;
use eventra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum length for an event name.
pub const MAX_EVENT_NAME_LEN: usize = 200;

/// An event row from the `events` table. The attendee settings document is
/// read separately through `AttendeeSettingsRepo`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub name: String,
    pub starts_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub starts_at: Option<Timestamp>,
}

impl CreateEvent {
    pub fn validate(&self) -> Result<(), CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Event name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_EVENT_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "Event name too long (max {MAX_EVENT_NAME_LEN})"
            )));
        }
        Ok(())
    }
}
