//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use medassist_core::session::RejectReason;
use medassist_types::error::FormError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Form operation rejected by the elicitation engine.
    Form(FormError),
    /// A dispatch is already in flight.
    Busy,
    /// Malformed or blank input.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        AppError::Form(e)
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::Busy => AppError::Busy,
            RejectReason::Empty => AppError::Validation(reason.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Form(e) => {
                let details = match &e {
                    FormError::InvalidValue { name, reason } => {
                        Some(json!({ "field": name, "reason": reason }))
                    }
                    _ => None,
                };
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string(), details)
            }
            AppError::Busy => (
                StatusCode::CONFLICT,
                "BUSY",
                RejectReason::Busy.to_string(),
                None,
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg, None)
            }
        };

        (status, Json(ApiResponse::error(code, &message, details))).into_response()
    }
}
