//! Mapping from handler failures to HTTP responses.
//!
//! Every failure becomes `{"error": "<message>"}`. Client-caused failures get
//! 400/404; storage faults get 500 with a fixed per-operation message, and
//! the underlying error only goes to the log.

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ValidationError;
use crate::store::StoreError;

/// The API operation a storage call was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::List => "Failed to fetch todos",
            Operation::Get => "Failed to fetch todo",
            Operation::Create => "Failed to create todo",
            Operation::Update => "Failed to update todo",
            Operation::Delete => "Failed to delete todo",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Operation::List => "list_todos",
            Operation::Get => "get_todo",
            Operation::Create => "create_todo",
            Operation::Update => "update_todo",
            Operation::Delete => "delete_todo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Todo not found")]
    NotFound,

    #[error("{}", .operation.failure_message())]
    Storage {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Adapter for `map_err` on store results.
    pub fn storage(operation: Operation) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Storage { operation, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage { operation, source } = &self {
            tracing::error!(%operation, error = %source, "storage call failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
