use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use todo_server::handlers::Message;
use todo_server::model::{TodoChanges, TodoId};
use todo_server::{app, MemoryTodoStore, StoreError, Todo, TodoStore};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn memory_app() -> Router {
    app(Arc::new(MemoryTodoStore::new()))
}

async fn error_message(response: axum::response::Response) -> String {
    let body: serde_json::Value = body_json(response).await;
    body["error"].as_str().unwrap().to_string()
}

async fn create(app: &Router, text: &str) -> Todo {
    let body = serde_json::json!({ "text": text }).to_string();
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/todos", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn list(app: &Router) -> Vec<Todo> {
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/todos"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

/// A store whose every call fails, as if the database were unreachable.
struct FailingStore;

#[async_trait]
impl TodoStore for FailingStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _id: TodoId) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert(&self, _text: &str) -> Result<TodoId, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn update(&self, _id: TodoId, _changes: &TodoChanges) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _id: TodoId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

// --- descriptor ---

#[tokio::test]
async fn root_describes_endpoints() {
    let resp = memory_app().oneshot(empty_request("GET", "/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Todo List API is running!");
    let endpoints = body["endpoints"].as_object().unwrap();
    assert_eq!(endpoints.len(), 5);
    assert!(endpoints.contains_key("PUT /api/todos/:id"));
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    assert!(list(&memory_app()).await.is_empty());
}

#[tokio::test]
async fn list_todos_newest_first() {
    let app = memory_app();
    for text in ["first", "second", "third"] {
        create(&app, text).await;
    }

    let todos = list(&app).await;
    let texts: Vec<&str> = todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["third", "second", "first"]);
    assert!(todos.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201_with_trimmed_text() {
    let app = memory_app();
    let todo = create(&app, "  Buy milk  ").await;

    assert_eq!(todo.text, "Buy milk");
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);
}

#[tokio::test]
async fn create_todo_assigns_fresh_ids() {
    let app = memory_app();
    let a = create(&app, "a").await;
    let b = create(&app, "b").await;
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn create_todo_blank_text_returns_400_and_writes_nothing() {
    let app = memory_app();
    for body in [r#"{"text":""}"#, r#"{"text":"   "}"#, r#"{}"#] {
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/todos", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error_message(resp).await, "Todo text is required");
    }
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_todo_without_content_type_asks_for_text() {
    let app = memory_app();
    let resp = app
        .clone()
        .oneshot(empty_request("POST", "/api/todos"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "Todo text is required");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_todo_byte_order_mark_only_is_blank() {
    let app = memory_app();
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/todos", "{\"text\":\"\u{feff} \"}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "Todo text is required");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_todo_too_long_returns_400() {
    let body = serde_json::json!({ "text": "x".repeat(501) }).to_string();
    let resp = memory_app()
        .oneshot(json_request("POST", "/api/todos", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_todo_malformed_json_returns_400_with_error_body() {
    let resp = memory_app()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!error_message(resp).await.is_empty());
}

// --- get ---

#[tokio::test]
async fn get_todo_after_create() {
    let app = memory_app();
    let created = create(&app, "Walk dog").await;

    let resp = app
        .oneshot(empty_request("GET", &format!("/api/todos/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo = body_json(resp).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_todo_not_found() {
    let resp = memory_app()
        .oneshot(empty_request("GET", "/api/todos/999"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(resp).await, "Todo not found");
}

#[tokio::test]
async fn get_todo_non_integer_id_is_not_found() {
    let resp = memory_app()
        .oneshot(empty_request("GET", "/api/todos/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- update ---

#[tokio::test]
async fn update_completed_leaves_text_alone() {
    let app = memory_app();
    let created = create(&app, "Buy milk").await;

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", created.id),
            r#"{"completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.text, "Buy milk");
    assert!(updated.completed);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= updated.created_at);
}

#[tokio::test]
async fn update_empty_payload_returns_400() {
    let app = memory_app();
    let created = create(&app, "Buy milk").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", created.id),
            "{}",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "No fields to update");
    assert_eq!(list(&app).await[0], created);
}

#[tokio::test]
async fn update_blank_text_returns_400() {
    let app = memory_app();
    let created = create(&app, "Buy milk").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", created.id),
            r#"{"text":"   "}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&app).await[0].text, "Buy milk");
}

#[tokio::test]
async fn update_todo_not_found() {
    let resp = memory_app()
        .oneshot(json_request("PUT", "/api/todos/999", r#"{"text":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_missing_row_wins_over_empty_payload() {
    let resp = memory_app()
        .oneshot(json_request("PUT", "/api/todos/999", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_missing_row_without_body_is_not_found() {
    let app = memory_app();
    for request in [
        empty_request("PUT", "/api/todos/999"),
        json_request("PUT", "/api/todos/999", ""),
        json_request("PUT", "/api/todos/999", r#"{"text":"#),
    ] {
        let resp = app.clone().oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(resp).await, "Todo not found");
    }
}

#[tokio::test]
async fn update_existing_row_without_body_has_nothing_to_update() {
    let app = memory_app();
    let created = create(&app, "Buy milk").await;

    let resp = app
        .oneshot(empty_request("PUT", &format!("/api/todos/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "No fields to update");
}

#[tokio::test]
async fn update_existing_row_with_malformed_json_returns_400() {
    let app = memory_app();
    let created = create(&app, "Buy milk").await;

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", created.id),
            r#"{"completed":"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = memory_app()
        .oneshot(empty_request("DELETE", "/api/todos/999"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(resp).await, "Todo not found");
}

// --- storage failures ---

#[tokio::test]
async fn storage_failures_return_500_with_opaque_message() {
    let app = app(Arc::new(FailingStore));
    let cases = [
        (empty_request("GET", "/api/todos"), "Failed to fetch todos"),
        (empty_request("GET", "/api/todos/1"), "Failed to fetch todo"),
        (
            json_request("POST", "/api/todos", r#"{"text":"a"}"#),
            "Failed to create todo",
        ),
        (
            json_request("PUT", "/api/todos/1", r#"{"completed":true}"#),
            "Failed to update todo",
        ),
        (empty_request("DELETE", "/api/todos/1"), "Failed to delete todo"),
    ];

    for (request, expected) in cases {
        let resp = app.clone().oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = error_message(resp).await;
        assert_eq!(message, expected);
        assert!(!message.contains("connection refused"));
    }
}

#[tokio::test]
async fn create_validation_runs_before_storage() {
    let resp = app(Arc::new(FailingStore))
        .oneshot(json_request("POST", "/api/todos", r#"{"text":" "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- cors ---

#[tokio::test]
async fn any_origin_is_allowed() {
    let request = Request::builder()
        .uri("/api/todos")
        .header(http::header::ORIGIN, "http://example.com")
        .body(String::new())
        .unwrap();
    let resp = memory_app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = memory_app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"Buy milk"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo = body_json(resp).await;
    assert_eq!(created.id, 1);
    assert_eq!(created.text, "Buy milk");
    assert!(!created.completed);

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/api/todos/1", r#"{"completed":true}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.id, 1);
    assert_eq!(updated.text, "Buy milk");
    assert!(updated.completed);

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/todos"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos, vec![updated]);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/api/todos/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let message: Message = body_json(resp).await;
    assert_eq!(message.message, "Todo deleted successfully");

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/todos/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Todo not found");
}
