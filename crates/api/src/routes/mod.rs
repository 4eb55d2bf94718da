pub mod category;
pub mod event;
pub mod health;
pub mod mail;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                                      list, create
/// /events/{event_id}                           get, delete
/// /events/{event_id}/categories                list, create
/// /events/{event_id}/attendee-settings         get, replace (PUT), clear
///
/// /categories/{id}                             update (PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", event::router())
        .nest("/categories", category::router())
}
