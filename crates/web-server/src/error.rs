use analytics::AnalyticsError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Expected query failures become 4xx responses carrying `{"error": ...}`;
/// anything else is logged and answered with a generic 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Analytics(err) => match err {
                AnalyticsError::InvalidDate(_) | AnalyticsError::InvalidWindow(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                AnalyticsError::EventNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                AnalyticsError::NotEnoughData(_) => {
                    tracing::error!(error = ?err, "Analytics error.");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An error occurred during analysis".to_string(),
                    )
                }
            },
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
