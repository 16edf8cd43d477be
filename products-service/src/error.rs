//! Errors a caller of the catalogue routes can observe.
//!
//! Every client-visible failure maps to exactly one status and one fixed
//! message here; driver details stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// The collection a data route reads from, as named in its error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Deals,
    Products,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Deals => f.write_str("deals"),
            Resource::Products => f.write_str("products"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No database handle was available when the request arrived.
    #[error("Database not connected")]
    NotConnected,

    /// A handle was available but the query itself failed.
    #[error("Error fetching {0}!")]
    FetchFailed(Resource),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotConnected => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::FetchFailed(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
