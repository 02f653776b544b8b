// API error type - maps service failures onto HTTP status codes and JSON bodies
use crate::application::config_store::StoreError;
use crate::application::sanitizer::SanitizeError;
use crate::application::settings_service::UpdateError;
use crate::application::weather_refresh::RefreshError;
use crate::infrastructure::http_response::json_response;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Request body is not a JSON object.
    InvalidJson,
    /// Settings failed validation; carries the offending field.
    InvalidSettings(String),
    /// Weather provider failed or returned a non-object body.
    Upstream {
        error: &'static str,
        status: u16,
        message: String,
    },
    /// Provider payload lacks the expected time series.
    Format { error: &'static str, details: String },
    /// Write or rename failed.
    WriteFailed(String),
    /// A stored document could not be read.
    Store(StoreError),
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidJson => (StatusCode::BAD_REQUEST, json!({"error": "invalid json"})),
            ApiError::InvalidSettings(field) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "invalid settings data", "details": field}),
            ),
            ApiError::Upstream {
                error,
                status,
                message,
            } => (
                StatusCode::BAD_GATEWAY,
                json!({"error": error, "http_code": status, "message": message}),
            ),
            ApiError::Format { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": error, "details": details}),
            ),
            ApiError::WriteFailed(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "write_failed", "message": message}),
            ),
            ApiError::Store(err) => {
                tracing::error!("Store read failed: {}", err);
                let body = match err {
                    StoreError::Malformed { .. } => {
                        json!({"error": "stored data malformed", "details": err.to_string()})
                    }
                    _ => json!({"error": "store unavailable", "message": err.to_string()}),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({"error": "method not allowed"}),
            ),
        };
        json_response(status, &body)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<SanitizeError> for ApiError {
    fn from(err: SanitizeError) -> Self {
        match err {
            SanitizeError::InvalidJson => ApiError::InvalidJson,
            SanitizeError::InvalidSettings(field) => ApiError::InvalidSettings(field),
        }
    }
}

impl From<UpdateError> for ApiError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::Rejected(e) => e.into(),
            UpdateError::Store(e) => ApiError::WriteFailed(e.to_string()),
        }
    }
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        tracing::warn!("Weather refresh failed: {}", err);
        match err {
            RefreshError::DailyFetch(e) => ApiError::Upstream {
                error: "daily_fetch_failed",
                status: e.status,
                message: e.message,
            },
            RefreshError::HourlyFetch(e) => ApiError::Upstream {
                error: "hourly_fetch_failed",
                status: e.status,
                message: e.message,
            },
            RefreshError::DailyFormat(details) => ApiError::Format {
                error: "unexpected_daily_format",
                details,
            },
            RefreshError::HourlyFormat(details) => ApiError::Format {
                error: "unexpected_hourly_format",
                details,
            },
            RefreshError::Write(e) => ApiError::WriteFailed(e.to_string()),
        }
    }
}
