//! Canned-response transport for tests and offline runs.
//!
//! Responses are keyed by URL path. Unknown paths answer 404 unless a default
//! is set. Every request is recorded so callers can assert on the exact
//! sequence of URLs that was attempted.

use super::transport::{HttpResponse, Transport, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Result<HttpResponse, TransportError>>,
    fallback: Option<Result<HttpResponse, TransportError>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `response`.
    pub fn route(mut self, path: &str, response: HttpResponse) -> Self {
        self.routes.insert(path.to_string(), Ok(response));
        self
    }

    /// Fail `path` below the HTTP layer.
    pub fn fail(mut self, path: &str, error: TransportError) -> Self {
        self.routes.insert(path.to_string(), Err(error));
        self
    }

    /// Answer every unrouted path with `response` instead of 404.
    pub fn otherwise(mut self, response: Result<HttpResponse, TransportError>) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// URL paths requested so far, in order.
    pub fn requested_paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| path_of(&r.url))
            .collect()
    }
}

/// Path component of an absolute URL. Anything that does not parse as one is
/// taken to be a path already.
fn path_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                timeout,
            });
        }

        match self.routes.get(&path_of(url)) {
            Some(answer) => answer.clone(),
            None => self
                .fallback
                .clone()
                .unwrap_or_else(|| Ok(HttpResponse::not_found())),
        }
    }
}
