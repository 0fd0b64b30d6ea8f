//! API response types.
//!
//! Every endpoint answers with an `error` field: `null` on success, a short
//! message otherwise (see `AppError`). Read endpoints add a `data` field.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
///
/// Failures never pass through here; they are rendered by `AppError`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response carrying data.
    pub const fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response for a mutation: `{"error": null}`.
    #[must_use]
    pub const fn done() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_serializes_null_error() {
        let json = serde_json::to_value(ApiResponse::done()).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "error": null }));
    }

    #[test]
    fn test_ok_carries_data() {
        let json = serde_json::to_value(ApiResponse::ok(3_u64)).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "data": 3, "error": null }));
    }
}
