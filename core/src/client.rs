//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiInfo, CreateTodo, DeleteConfirmation, Todo, UpdateTodo};

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_api_info(&self) -> HttpRequest {
        request(HttpMethod::Get, format!("{}/", self.base_url), None)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        request(HttpMethod::Get, self.collection(), None)
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        request(HttpMethod::Get, self.item(id), None)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(request(HttpMethod::Post, self.collection(), Some(body)))
    }

    pub fn build_update_todo(&self, id: i64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(request(HttpMethod::Put, self.item(id), Some(body)))
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        request(HttpMethod::Delete, self.item(id), None)
    }

    pub fn parse_api_info(&self, response: HttpResponse) -> Result<ApiInfo, ApiError> {
        parse(response, 200)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse(response, 200)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<DeleteConfirmation, ApiError> {
        parse(response, 200)
    }

    fn collection(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn item(&self, id: i64) -> String {
        format!("{}/api/todos/{id}", self.base_url)
    }
}

fn request(method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
    let headers = match body {
        Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
        None => Vec::new(),
    };
    HttpRequest {
        method,
        url,
        headers,
        body,
    }
}

fn to_json<T: serde::Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn parse<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .map(|body| body.error)
        .unwrap_or_else(|_| response.body.clone());
    match response.status {
        404 => Err(ApiError::NotFound),
        400 => Err(ApiError::BadRequest(message)),
        status => Err(ApiError::HttpError { status, message }),
    }
}
