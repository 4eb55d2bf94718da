//! Handlers for attendee categories.
//!
//! Listing and creation are nested under the owning event:
//! `/events/{event_id}/categories`. Update and delete address the category
//! directly: `/categories/{id}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventra_core::category::{Category, CategoryDraft, CategoryPatch};
use eventra_core::types::DbId;
use eventra_db::repositories::{CategoryRepo, EventRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_event(state: &AppState, event_id: DbId) -> AppResult<()> {
    if EventRepo::exists(&state.pool, event_id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Event", event_id))
    }
}

/// GET /api/v1/events/{event_id}/categories
///
/// Oldest first.
pub async fn list_by_event(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    ensure_event(&state, event_id).await?;
    let categories = CategoryRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/events/{event_id}/categories
pub async fn create(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    payload: Result<Json<CategoryDraft>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let Json(input) = payload?;
    input.validate()?;
    ensure_event(&state, event_id).await?;
    let category = CategoryRepo::create(&state.pool, event_id, &input).await?;
    tracing::info!(event_id, category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PATCH /api/v1/categories/{id}
///
/// Only the fields present in the body are changed. An empty body returns the
/// row unchanged.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<CategoryPatch>, JsonRejection>,
) -> AppResult<Json<DataResponse<Category>>> {
    let Json(input) = payload?;
    input.validate()?;
    let updated = if input.is_empty() {
        CategoryRepo::find_by_id(&state.pool, id).await?
    } else {
        CategoryRepo::update(&state.pool, id, &input).await?
    };
    let category = updated.ok_or(AppError::not_found("Category", id))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CategoryRepo::delete(&state.pool, id).await? {
        tracing::info!(category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Category", id))
    }
}
