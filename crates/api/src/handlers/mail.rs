//! The browser-callable mail relay at `/functions/v1/send-email`.
//!
//! Open to any origin: every response carries permissive CORS headers,
//! independent of the `CORS_ORIGINS` allow-list used by `/api/v1`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use eventra_mail::{MailError, MailMessage};
use serde_json::json;

use crate::state::AppState;

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    ]
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    (status, cors_headers(), Json(json!({ "error": message }))).into_response()
}

/// OPTIONS /functions/v1/send-email
pub async fn preflight() -> Response {
    (StatusCode::OK, cors_headers(), "ok").into_response()
}

/// POST /functions/v1/send-email
///
/// Body `{ to, subject, html }`; `to` is one address or a list.
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<MailMessage>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(message)) => message,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected mail relay payload");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let Some(mailer) = state.mailer.as_ref() else {
        tracing::error!("Mail relay called but no mail transport is configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Email service is not configured",
        );
    };

    match mailer.send(&message).await {
        Ok(receipt) => (
            StatusCode::OK,
            cors_headers(),
            Json(json!({ "ok": true, "id": receipt.id })),
        )
            .into_response(),
        Err(MailError::Invalid(e)) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, transport = mailer.transport_name(), "Failed to send email");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Any other method on the relay.
pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
