//! Handlers for per-event attendee settings.
//!
//! Routes nested under `/events/{event_id}/attendee-settings`. The stored
//! document is returned as-is; merging with defaults happens client side.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventra_core::settings::SettingsDocument;
use eventra_core::types::DbId;
use eventra_db::repositories::AttendeeSettingsRepo;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/events/{event_id}/attendee-settings
///
/// `data` is `null` when nothing has been stored yet.
pub async fn get(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<Value>>>> {
    let stored = AttendeeSettingsRepo::get(&state.pool, event_id)
        .await?
        .ok_or(AppError::not_found("Event", event_id))?;
    Ok(Json(DataResponse { data: stored }))
}

/// PUT /api/v1/events/{event_id}/attendee-settings
///
/// Replace the whole document. The body must be a JSON object.
pub async fn replace(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<DataResponse<Value>>> {
    let Json(body) = payload?;
    let document = SettingsDocument::from_value(body)?;
    document.validate_size()?;

    let stored = AttendeeSettingsRepo::replace(&state.pool, event_id, &document.into_value())
        .await?
        .ok_or(AppError::not_found("Event", event_id))?;
    tracing::info!(event_id, "Attendee settings replaced");
    Ok(Json(DataResponse { data: stored }))
}

/// DELETE /api/v1/events/{event_id}/attendee-settings
///
/// Clear the stored document so readers fall back to defaults.
pub async fn clear(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AttendeeSettingsRepo::clear(&state.pool, event_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Event", event_id))
    }
}
