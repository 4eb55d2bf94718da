//! Repository for the `events.attendee_settings` JSON column.
//!
//! The column holds the whole settings document. Reads return it as stored
//! (merging with defaults is the caller's job) and writes replace it wholesale.

use eventra_core::types::DbId;
use sqlx::PgPool;

/// Provides access to per-event attendee settings documents.
pub struct AttendeeSettingsRepo;

impl AttendeeSettingsRepo {
    /// Fetch the stored settings document for an event.
    ///
    /// Returns `None` if the event does not exist and `Some(None)` if the
    /// event has never had settings written.
    pub async fn get(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Option<Option<serde_json::Value>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<serde_json::Value>>(
            "SELECT attendee_settings FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(pool)
        .await
    }

    /// Replace the settings document of an event, returning what was stored.
    ///
    /// Returns `None` if the event does not exist.
    pub async fn replace(
        pool: &PgPool,
        event_id: DbId,
        document: &serde_json::Value,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar::<_, serde_json::Value>(
            "UPDATE events SET attendee_settings = $2
             WHERE id = $1
             RETURNING attendee_settings",
        )
        .bind(event_id)
        .bind(document)
        .fetch_optional(pool)
        .await
    }

    /// Clear the settings document so reads fall back to defaults.
    /// Returns `true` if the event exists.
    pub async fn clear(pool: &PgPool, event_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE events SET attendee_settings = NULL WHERE id = $1")
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
