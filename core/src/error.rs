//! Error types for the API client.
//!
//! # Design
//! Two failure kinds come from the round-trip itself: the request never
//! completed (`Transport`) or the server answered outside the success range
//! (`HttpStatus`). JSON problems on either side of the call get their own
//! variants so callers can tell a bad payload from a bad server.

use thiserror::Error;

/// Errors returned by `HttpClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed: DNS failure, refused or reset
    /// connection, malformed URL.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status outside 200-299.
    #[error("API Error: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}
