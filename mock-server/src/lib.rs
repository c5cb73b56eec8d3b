use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

/// What the backend answers for a scripted (method, path).
#[derive(Clone, Debug)]
pub enum Reply {
    /// JSON body with the given status.
    Json { status: u16, body: String },
    /// Status only, empty body.
    Empty { status: u16 },
    /// The request body sent back unchanged.
    Echo { status: u16 },
}

impl Reply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Reply::Json {
            status,
            body: body.into(),
        }
    }
}

/// A request as the backend received it.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Inner {
    replies: HashMap<(String, String), Reply>,
    requests: Vec<RecordedRequest>,
}

/// Scripted backend shared between the router and the test driving it.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<RwLock<Inner>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for `method path`, replacing any earlier one.
    pub async fn respond(&self, method: &str, path: &str, reply: Reply) {
        self.inner
            .write()
            .await
            .replies
            .insert((method.to_ascii_uppercase(), path.to_string()), reply);
    }

    /// Every request received so far except health checks, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.read().await.requests.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .fallback(handle)
            .with_state(self.clone())
    }
}

pub fn app() -> Router {
    MockBackend::new().router()
}

pub async fn run(listener: TcpListener, backend: MockBackend) -> Result<(), std::io::Error> {
    axum::serve(listener, backend.router()).await
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let mut inner = backend.inner.write().await;
    let reply = inner
        .replies
        .get(&(recorded.method.clone(), recorded.path.clone()))
        .cloned();
    log::debug!("{} {} scripted={}", recorded.method, recorded.path, reply.is_some());

    let response = match reply {
        Some(Reply::Json { status, body }) => json_response(status, body),
        Some(Reply::Empty { status }) => status_code(status).into_response(),
        Some(Reply::Echo { status }) => {
            let mut response = (status_code(status), recorded.body.clone()).into_response();
            if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type.clone());
            }
            response
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not Found" })),
        )
            .into_response(),
    };
    inner.requests.push(recorded);
    response
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn json_response(status: u16, body: String) -> Response {
    (
        status_code(status),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
