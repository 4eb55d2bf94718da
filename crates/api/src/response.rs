//! Shared response envelope types for API handlers.
//!
//! Resource responses use a `{ "data": ... }` envelope. The HTTP remote store
//! client in `eventra-sync` unwraps the same shape.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
