//! Requests and responses exchanged between `TodoClient` and the host.
//!
//! `TodoClient` never opens a socket. It hands the host an `HttpRequest`
//! aimed at the todo API, and the host hands back whatever the server
//! answered as an `HttpResponse`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// One call against the todo API, ready to send.
///
/// `url` is absolute: the client's base URL joined with `/`, `/api/todos` or
/// `/api/todos/{id}`. Requests with a body carry `content-type:
/// application/json`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// What the server answered. Only `status` and `body` are read when parsing;
/// error bodies are expected to look like `{"error": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
