//! Error types for the todo API client.
//!
//! # Design
//! The server separates client faults (400, 404) from server faults (500) by
//! status alone, so the first two get their own variants. Every non-2xx body
//! is `{"error": "..."}`; the message is pulled out when the body has that
//! shape and kept verbatim otherwise.

use std::fmt;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    NotFound,

    /// The server returned 400: the request payload failed validation.
    BadRequest(String),

    /// The server returned any other unexpected status.
    HttpError { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "todo not found"),
            ApiError::BadRequest(message) => write!(f, "bad request: {message}"),
            ApiError::HttpError { status, message } => {
                write!(f, "HTTP {status}: {message}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
