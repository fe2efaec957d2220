//! REST API for a single-table todo list.
//!
//! # Overview
//! Five stateless operations under `/api/todos` (list, get, create, update,
//! delete) plus an API descriptor at `/`. All state lives behind the
//! `TodoStore` handed to `app`; handlers hold nothing between requests.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod schema;
pub mod store;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use model::{Todo, TodoId};
pub use store::{MemoryTodoStore, MySqlTodoStore, StoreError, TodoStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

pub fn app(store: Arc<dyn TodoStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::api_info))
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { store })
}

pub async fn run(listener: TcpListener, store: Arc<dyn TodoStore>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
