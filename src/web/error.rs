// Error types for the web front-end

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Message returned for every processing failure. The cause is only logged.
pub const PROCESSING_FAILED_MESSAGE: &str = "Background removal failed.";

/// Web front-end error types
#[derive(Debug)]
pub enum ApiError {
    /// Client-caused validation failure; the message is shown to the user.
    BadRequest(String),

    /// Background removal or decoding of the upload failed.
    ProcessingFailed,

    /// Any other server-side failure. The message is for logs, not clients.
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::ProcessingFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PROCESSING_FAILED_MESSAGE.to_string(),
            ),
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PROCESSING_FAILED_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "status": status.as_u16(),
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}
