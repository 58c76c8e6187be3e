//! API error mapping.
//!
//! Three client-visible failure classes: envelope validation, expression
//! build, and everything else. The two validation channels stay distinct
//! all the way to the response shape: build errors carry the echoed
//! expression, envelope errors carry a field path. Internal failures are
//! logged in full and surfaced as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::hostcfg::ValidationError;
use crate::rules::RuleBuildError;
use crate::store::StoreError;

/// Failure of an API request.
#[derive(Debug)]
pub enum ApiError {
    /// Envelope validation failed (400, field-scoped message)
    Validation(ValidationError),
    /// Expression compilation failed (400, echoed input)
    Build(RuleBuildError),
    /// Handler-level rejection: id shape, window ceiling, quota, bad plan
    /// name (400)
    BadRequest(String),
    /// Unknown or foreign resource (404)
    NotFound,
    /// Backend fault; details logged, never echoed (500)
    Internal(anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<RuleBuildError> for ApiError {
    fn from(err: RuleBuildError) -> Self {
        Self::Build(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": err.to_string(),
                    "field": err.field(),
                })),
            )
                .into_response(),
            Self::Build(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": err.to_string(),
                    "data": err.echo,
                })),
            )
                .into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "error": "resource not found" })),
            )
                .into_response(),
            Self::Internal(err) => {
                error!(error = ?err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}
