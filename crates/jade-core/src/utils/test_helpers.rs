//! Scripted connectors for exercising the clients without a network
//!
//! [`MockConnector`] implements both the blocking and the async connector
//! traits. Responses are queued up front and handed out in order; every
//! request, the headers the connection was opened with, and the number of
//! connect/close calls are recorded for assertions.

use crate::error::LlmError;
use crate::exchange::{HttpRequest, HttpResponse};
use crate::transport::{AsyncConnection, AsyncConnector, Connection, Connector};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    responses: Mutex<VecDeque<Result<HttpResponse, LlmError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    headers: Mutex<Option<HashMap<String, String>>>,
    connects: AtomicUsize,
    closes: AtomicUsize,
}

/// Connector whose connections replay scripted responses
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<MockState>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue the canonical successful completion carrying `content`
    pub fn respond_with_content(self, content: &str) -> Self {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        });
        self.respond(200, &body.to_string())
    }

    /// Queue a transport-level failure
    pub fn fail_with(self, error: LlmError) -> Self {
        self.push(Err(error))
    }

    fn push(self, outcome: Result<HttpResponse, LlmError>) -> Self {
        self.state.responses.lock().unwrap().push_back(outcome);
        self
    }

    pub fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Headers passed to the most recent `connect`
    pub fn connected_headers(&self) -> Option<HashMap<String, String>> {
        self.state.headers.lock().unwrap().clone()
    }

    fn open(&self, headers: &HashMap<String, String>) -> MockConnection {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        *self.state.headers.lock().unwrap() = Some(headers.clone());
        MockConnection {
            state: Arc::clone(&self.state),
        }
    }
}

pub struct MockConnection {
    state: Arc<MockState>,
}

impl MockConnection {
    fn replay(&self, request: &HttpRequest) -> Result<HttpResponse, LlmError> {
        self.state.requests.lock().unwrap().push(request.clone());
        self.state
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::network(
                    "No scripted response left",
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "mock exhausted"),
                ))
            })
    }

    fn release(&self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    fn connect(&self, headers: &HashMap<String, String>) -> Result<MockConnection, LlmError> {
        Ok(self.open(headers))
    }
}

impl Connection for MockConnection {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, LlmError> {
        self.replay(request)
    }

    fn close(self) -> Result<(), LlmError> {
        self.release();
        Ok(())
    }
}

#[async_trait]
impl AsyncConnector for MockConnector {
    type Connection = MockConnection;

    async fn connect(
        &self,
        headers: &HashMap<String, String>,
    ) -> Result<MockConnection, LlmError> {
        Ok(self.open(headers))
    }
}

#[async_trait]
impl AsyncConnection for MockConnection {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, LlmError> {
        self.replay(request)
    }

    async fn close(self) -> Result<(), LlmError> {
        self.release();
        Ok(())
    }
}
