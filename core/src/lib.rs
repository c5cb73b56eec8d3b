//! Asynchronous JSON client for the backend REST API.
//!
//! # Overview
//! `HttpClient` issues GET/POST/PUT/DELETE requests against a fixed base URL,
//! sends JSON bodies, and parses JSON replies into a caller-chosen type.
//! Statuses outside 200-299 become `ApiError::HttpStatus`.
//!
//! # Design
//! - `ClientConfig` is passed to the constructor; nothing is read from the
//!   environment unless the caller asks for `ClientConfig::from_env`.
//! - Request building and response parsing are pure; only `Transport`
//!   performs I/O, so tests can swap in a scripted transport.
//! - One call is one round-trip: no retry, caching, timeout or cancellation.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::{parse_response, HttpClient};
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
