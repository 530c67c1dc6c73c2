//! Test doubles for the request chain.
//!
//! Used by the unit tests of this crate and by the application layer's tests
//! in place of a live backend.

use crate::handler::RequestHandler;
use async_trait::async_trait;
use reqwest::StatusCode;
use seedline_core::{ApiResponse, Navigator, OutboundRequest, Result, Route, SeedlineError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&OutboundRequest) -> Result<ApiResponse> + Send + Sync>;

/// A handler that records every request it receives and answers from a
/// caller-supplied function.
pub struct RecordingHandler {
    responder: Responder,
    requests: Mutex<Vec<OutboundRequest>>,
    delay: Option<Duration>,
}

impl RecordingHandler {
    /// Answers every request with `f(request)`.
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&OutboundRequest) -> Result<ApiResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(f),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Answers every request with status 200 and `body`.
    pub fn ok(body: Value) -> Self {
        Self::with(move |_| Ok(ApiResponse::new(StatusCode::OK, body.clone())))
    }

    /// Fails every request with `err`.
    pub fn failing(err: SeedlineError) -> Self {
        Self::with(move |_| Err(err.clone()))
    }

    /// Answers from `script` in order, repeating the last entry once exhausted.
    pub fn scripted(script: Vec<Result<ApiResponse>>) -> Self {
        let queue = Mutex::new(VecDeque::from(script));
        Self::with(move |_| {
            let mut queue = queue
                .lock()
                .map_err(|_| SeedlineError::internal("script lock poisoned"))?;
            match queue.len() {
                0 => Err(SeedlineError::internal("empty script")),
                1 => queue
                    .front()
                    .cloned()
                    .unwrap_or_else(|| Err(SeedlineError::internal("empty script"))),
                _ => queue
                    .pop_front()
                    .unwrap_or_else(|| Err(SeedlineError::internal("empty script"))),
            }
        })
    }

    /// Delays every answer, simulating a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<OutboundRequest> {
        self.requests().pop()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl RequestHandler for RecordingHandler {
    async fn handle(&self, request: OutboundRequest) -> Result<ApiResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&request)
    }
}

/// A navigator that only remembers where it was sent.
#[derive(Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut history) = self.history.lock() {
            history.push(route);
        }
    }

    fn current(&self) -> Route {
        self.history().last().copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;

    fn request() -> OutboundRequest {
        OutboundRequest::new(Method::GET, "http://127.0.0.1:5001/api/v1/torrent/list")
    }

    #[tokio::test]
    async fn test_scripted_answers_in_order_then_repeats_last() {
        let handler = RecordingHandler::scripted(vec![
            Ok(ApiResponse::new(StatusCode::OK, json!({"items": []}))),
            Err(SeedlineError::http(503, json!(null))),
        ]);

        assert!(handler.handle(request()).await.is_ok());
        assert_eq!(handler.handle(request()).await.unwrap_err().status(), Some(503));
        assert_eq!(handler.handle(request()).await.unwrap_err().status(), Some(503));
        assert_eq!(handler.count(), 3);
    }

    #[tokio::test]
    async fn test_empty_script_fails_every_request() {
        let handler = RecordingHandler::scripted(Vec::new());
        let err = handler.handle(request()).await.unwrap_err();
        assert!(matches!(err, SeedlineError::Internal(_)));
    }

    #[test]
    fn test_navigator_remembers_routes() {
        let navigator = RecordingNavigator::default();
        assert_eq!(navigator.current(), Route::default());

        navigator.navigate(Route::Login);
        assert_eq!(navigator.history(), vec![Route::Login]);
        assert_eq!(navigator.current(), Route::Login);
    }
}
