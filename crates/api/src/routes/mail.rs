use axum::routing::post;
use axum::Router;

use crate::handlers::mail;
use crate::state::AppState;

/// Mail relay route, mounted at the root outside the `/api/v1` CORS layer.
///
/// ```text
/// POST    /functions/v1/send-email    -> send_email
/// OPTIONS /functions/v1/send-email    -> preflight
/// *       /functions/v1/send-email    -> 405
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/functions/v1/send-email",
        post(mail::send_email)
            .options(mail::preflight)
            .fallback(mail::method_not_allowed),
    )
}
