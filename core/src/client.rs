//! JSON HTTP client for the backend REST API.
//!
//! # Design
//! `HttpClient` holds an immutable `ClientConfig` and a `Transport`; it keeps
//! no state between calls. Every operation goes through the same three
//! steps: build an `HttpRequest`, execute it on the transport exactly once,
//! parse the `HttpResponse`. `get`, `post`, `put` and `delete` are thin
//! wrappers over one private `send` routine. The build and parse steps are
//! public and I/O-free so they can be checked without a server.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Stateless client issuing one HTTP round-trip per call.
#[derive(Debug, Clone)]
pub struct HttpClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl HttpClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::default())
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues a GET to `base_url + endpoint` and parses the JSON reply.
    #[tracing::instrument(skip(self))]
    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.send(self.build_request(HttpMethod::Get, endpoint)).await
    }

    /// Issues a POST with `data` serialized as the JSON body.
    #[tracing::instrument(skip(self, data))]
    pub async fn post<B, R>(&self, endpoint: &str, data: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_json_request(HttpMethod::Post, endpoint, data)?;
        self.send(request).await
    }

    /// Issues a PUT with `data` serialized as the JSON body.
    #[tracing::instrument(skip(self, data))]
    pub async fn put<B, R>(&self, endpoint: &str, data: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_json_request(HttpMethod::Put, endpoint, data)?;
        self.send(request).await
    }

    /// Issues a DELETE without a body.
    #[tracing::instrument(skip(self))]
    pub async fn delete<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.send(self.build_request(HttpMethod::Delete, endpoint)).await
    }

    /// Builds a request with neither body nor headers.
    pub fn build_request(&self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.config.url_for(endpoint),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Builds a request whose body is the JSON serialization of `data`.
    pub fn build_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(data).map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method,
            url: self.config.url_for(endpoint),
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body: Some(body),
        })
    }

    async fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            warn!(
                "{} {} failed: {} {}",
                method.as_str(),
                url,
                response.status,
                response.status_text
            );
        }
        parse_response(response)
    }
}

/// Interprets a response: non-2xx becomes `HttpStatus`, otherwise the body
/// is parsed as JSON into `R`.
///
/// An empty body is read as JSON `null`, so `()`, `Option<_>` and
/// `serde_json::Value` accept "no content" replies while concrete shapes
/// still fail with `Deserialization`.
pub fn parse_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    check_status(&response)?;
    let body = response.body.trim();
    let body = if body.is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(ApiError::Deserialization)
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        status_text: response.status_text.clone(),
    })
}
