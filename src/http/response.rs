//! Error responses.
//!
//! # Responsibilities
//! - Map handler failures to HTTP status codes
//! - Render a uniform JSON error body
//!
//! # Design Decisions
//! - Database details are logged, never sent to the client
//! - Unmatched paths get a JSON 404, not axum's empty body

use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::database::DatabaseError;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::NotFound => "not found",
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error while handling request");
                "database unavailable"
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Fallback for requests no route matched.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found", "path": uri.path() })),
    )
        .into_response()
}
