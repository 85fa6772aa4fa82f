//! Recording HTTP client with canned responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};

/// `HttpClient` that records every request and replays queued responses.
///
/// With no queued response it answers `204 No Content`, which is what the
/// streaming service's play endpoint returns on success.
#[derive(Debug, Default)]
pub struct RecordingHttpClient {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl RecordingHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .expect("responses poisoned")
            .push_back(HttpResponse {
                status,
                body: body.into(),
            });
    }

    /// Drain and return every request seen so far.
    pub fn take_requests(&self) -> Vec<HttpRequest> {
        std::mem::take(&mut *self.requests.lock().expect("requests poisoned"))
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().expect("requests poisoned").push(request);
        let canned = self.responses.lock().expect("responses poisoned").pop_front();
        Ok(canned.unwrap_or(HttpResponse {
            status: 204,
            body: String::new(),
        }))
    }
}
