//! Repository for the `attendee_categories` table.

use eventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::{Category, CategoryDraft, CategoryPatch};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, event_id, name, description, color, icon, is_default, is_active, \
    assignment_criteria, assignment_value, created_at, updated_at";

/// Provides CRUD operations for attendee categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category for `event_id`, returning the created row with
    /// its store-assigned id.
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        input: &CategoryDraft,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendee_categories
                 (event_id, name, description, color, icon, is_default, is_active,
                  assignment_criteria, assignment_value)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(event_id)
            .bind(input.name.trim())
            .bind(input.description.is_some())
            .bind(input.description.as_deref())
            .bind(&input.color)
            .bind(&input.icon)
            .bind(input.is_default)
            .bind(input.is_active)
            .bind(input.assignment_criteria.as_str())
            .bind(&input.assignment_value)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendee_categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the categories of an event in creation order.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendee_categories
             WHERE event_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// `description` and `assignment_value` are `Option<Option<String>>`: an
    /// outer `Some` writes the inner value, which may be `NULL` to clear it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CategoryPatch,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE attendee_categories SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                color = COALESCE($5, color),
                icon = COALESCE($6, icon),
                is_default = COALESCE($7, is_default),
                is_active = COALESCE($8, is_active),
                assignment_criteria = COALESCE($9, assignment_criteria),
                assignment_value = CASE WHEN $10 THEN $11 ELSE assignment_value END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(&input.color)
            .bind(&input.icon)
            .bind(input.is_default)
            .bind(input.is_active)
            .bind(input.assignment_criteria.map(|c| c.as_str()))
            .bind(input.assignment_value.is_some())
            .bind(input.assignment_value.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a category. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attendee_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
