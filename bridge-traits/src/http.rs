//! HTTP Abstraction
//!
//! A deliberately small request surface. The only remote call the core makes
//! is the streaming service's "play on device" endpoint; hosts back this with
//! whatever client they already carry (fetch on the web, reqwest on desktop).

use async_trait::async_trait;

use crate::error::Result;

/// HTTP methods the core actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
}

/// A single outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Response to an [`HttpRequest`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Host-provided HTTP client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a request and return the response.
    ///
    /// Transport failures (no network, TLS) map to
    /// [`BridgeError::OperationFailed`](crate::error::BridgeError); HTTP error
    /// statuses are returned in the response for the caller to interpret.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
