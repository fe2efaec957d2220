//! Request handlers for `/api/todos`.
//!
//! Each handler is one independent unit of work against the injected store.
//! Write-then-read pairs are two separate store calls; if the row vanishes in
//! between, the read-back reports not-found.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, Operation};
use crate::model::{validate_text, CreateTodo, Todo, TodoChanges, TodoId, UpdateTodo};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "Todo List API is running!",
        "endpoints": {
            "GET /api/todos": "Get all todos",
            "GET /api/todos/:id": "Get single todo",
            "POST /api/todos": "Create new todo",
            "PUT /api/todos/:id": "Update todo",
            "DELETE /api/todos/:id": "Delete todo",
        }
    }))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state
        .store
        .list()
        .await
        .map_err(ApiError::storage(Operation::List))?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    fetch(&state, id, Operation::Get).await.map(Json)
}

pub async fn create_todo(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input: CreateTodo = decode_body(&headers, &body)?;
    let text = validate_text(input.text.as_deref().unwrap_or_default())?;

    let id = state
        .store
        .insert(&text)
        .await
        .map_err(ApiError::storage(Operation::Create))?;
    tracing::debug!(id, "todo created");

    let todo = fetch(&state, id, Operation::Create).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;

    fetch(&state, id, Operation::Update).await?;
    let input: UpdateTodo = decode_body(&headers, &body)?;
    let changes = TodoChanges::from_payload(input)?;

    let found = state
        .store
        .update(id, &changes)
        .await
        .map_err(ApiError::storage(Operation::Update))?;
    if !found {
        return Err(ApiError::NotFound);
    }

    fetch(&state, id, Operation::Update).await.map(Json)
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::storage(Operation::Delete))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    Ok(Json(Message {
        message: "Todo deleted successfully".to_string(),
    }))
}

/// An id that is not an integer cannot match any row.
fn parse_id(raw: &str) -> Result<TodoId, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::NotFound)
}

/// Decode a JSON payload. A request without a JSON content type, or with an
/// empty body, carries an empty payload rather than a malformed one.
fn decode_body<T: DeserializeOwned + Default>(
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<T, ApiError> {
    if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let Json(payload) = Json::<T>::from_bytes(body)?;
    Ok(payload)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

async fn fetch(state: &AppState, id: TodoId, operation: Operation) -> Result<Todo, ApiError> {
    state
        .store
        .get(id)
        .await
        .map_err(ApiError::storage(operation))?
        .ok_or(ApiError::NotFound)
}
