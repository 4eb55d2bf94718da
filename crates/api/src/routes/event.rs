//! Route definitions for the `/events` resource and its nested attendee
//! configuration.

use axum::routing::get;
use axum::Router;

use crate::handlers::{attendee_settings, category, event};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{event_id}                        -> get_by_id
/// DELETE /{event_id}                        -> delete
/// GET    /{event_id}/categories             -> category::list_by_event
/// POST   /{event_id}/categories             -> category::create
/// GET    /{event_id}/attendee-settings      -> attendee_settings::get
/// PUT    /{event_id}/attendee-settings      -> attendee_settings::replace
/// DELETE /{event_id}/attendee-settings      -> attendee_settings::clear
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(event::list).post(event::create))
        .route("/{event_id}", get(event::get_by_id).delete(event::delete))
        .route(
            "/{event_id}/categories",
            get(category::list_by_event).post(category::create),
        )
        .route(
            "/{event_id}/attendee-settings",
            get(attendee_settings::get)
                .put(attendee_settings::replace)
                .delete(attendee_settings::clear),
        )
}
