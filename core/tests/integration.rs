//! End-to-end calls against the live mock backend.
//!
//! # Design
//! Starts the mock server on a random port, scripts its replies, then drives
//! every `HttpClient` operation over real HTTP. The backend records what it
//! received, so the tests check both what went over the wire and what the
//! client returned.

use api_client::{ApiError, ClientConfig, HttpClient};
use mock_server::{MockBackend, Reply};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct NewUser<'a> {
    name: &'a str,
}

/// Serve a fresh backend on a random port and return a client pointed at
/// its `/api` prefix.
async fn start() -> (MockBackend, HttpClient) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let backend = MockBackend::new();

    let served = backend.clone();
    tokio::spawn(async move { mock_server::run(listener, served).await });

    let client = HttpClient::new(ClientConfig::new(&format!("http://{addr}/api")));
    (backend, client)
}

#[tokio::test]
async fn get_returns_parsed_body() {
    let (backend, client) = start().await;
    backend
        .respond("GET", "/api/gaming", Reply::json(200, r#"{"games":[]}"#))
        .await;

    let games: Value = client.get("/gaming").await.unwrap();
    assert_eq!(games, json!({"games": []}));

    let requests = backend.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/gaming");
    assert!(requests[0].body.is_empty());
    assert_eq!(requests[0].header("content-type"), None);
}

#[tokio::test]
async fn post_sends_exact_json_and_parses_reply() {
    let (backend, client) = start().await;
    backend
        .respond("POST", "/api/user", Reply::json(201, r#"{"id":1,"name":"alice"}"#))
        .await;

    let created: User = client.post("/user", &NewUser { name: "alice" }).await.unwrap();
    assert_eq!(
        created,
        User {
            id: 1,
            name: "alice".to_string()
        }
    );

    let requests = backend.requests().await;
    assert_eq!(requests[0].body, r#"{"name":"alice"}"#);
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn put_round_trips_through_echo() {
    let (backend, client) = start().await;
    backend
        .respond("PUT", "/api/user/1", Reply::Echo { status: 200 })
        .await;

    let input = User {
        id: 1,
        name: "bob".to_string(),
    };
    let echoed: User = client.put("/user/1", &input).await.unwrap();
    assert_eq!(echoed, input);

    let requests = backend.requests().await;
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].body, serde_json::to_string(&input).unwrap());
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn delete_sends_no_body_and_accepts_no_content() {
    let (backend, client) = start().await;
    backend
        .respond("DELETE", "/api/user/1", Reply::Empty { status: 204 })
        .await;

    client.delete::<()>("/user/1").await.unwrap();
    let err = client.delete::<User>("/user/1").await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)));

    let requests = backend.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.body.is_empty()));
}

#[tokio::test]
async fn not_found_fails_without_body() {
    let (_backend, client) = start().await;

    let err = client.get::<Value>("/missing").await.unwrap_err();
    match &err {
        ApiError::HttpStatus { status, status_text } => {
            assert_eq!(*status, 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    assert!(err.to_string().contains("Not Found"));
}

#[tokio::test]
async fn each_call_is_one_request() {
    let (backend, client) = start().await;
    backend
        .respond("GET", "/api/defi", Reply::Empty { status: 500 })
        .await;

    assert!(client.get::<Value>("/defi").await.is_err());
    assert_eq!(backend.requests().await.len(), 1);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (backend, client) = start().await;
    for (path, body) in [
        ("/api/gaming", r#"{"games":[]}"#),
        ("/api/nft", r#"{"items":[]}"#),
        ("/api/governance", r#"{"proposals":[]}"#),
    ] {
        backend.respond("GET", path, Reply::json(200, body)).await;
    }

    let (gaming, nft, governance) = tokio::join!(
        client.get::<Value>("/gaming"),
        client.get::<Value>("/nft"),
        client.get::<Value>("/governance"),
    );

    assert_eq!(gaming.unwrap(), json!({"games": []}));
    assert_eq!(nft.unwrap(), json!({"items": []}));
    assert_eq!(governance.unwrap(), json!({"proposals": []}));
    assert_eq!(backend.requests().await.len(), 3);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(ClientConfig::new(&format!("http://{addr}/api")));
    let err = client.get::<Value>("/gaming").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
