//! Handlers for the `/events` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventra_core::types::DbId;
use eventra_db::models::event::{CreateEvent, Event};
use eventra_db::repositories::EventRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateEvent>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    let Json(input) = payload?;
    input.validate()?;
    let event = EventRepo::create(&state.pool, &input).await?;
    tracing::info!(event_id = event.id, "Event created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = EventRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{event_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::not_found("Event", event_id))?;
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{event_id}
///
/// Cascades to the event's categories.
pub async fn delete(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if EventRepo::delete(&state.pool, event_id).await? {
        tracing::info!(event_id, "Event deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Event", event_id))
    }
}
