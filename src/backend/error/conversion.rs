/**
 * Error Conversion
 *
 * Turns a `BackendError` into the JSON error response every endpoint uses.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 *
 * Server-side failures are logged here with their full detail before the
 * generic message goes out; client errors are logged at warn level.
 */

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;
use crate::shared::ErrorBody;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if self.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "Request rejected: {}", self);
        }

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };
        let mut response = (status, Json(body)).into_response();

        if let BackendError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
