//! Request construction and response interpretation shared by the blocking
//! and non-blocking clients.
//!
//! Nothing in here performs I/O. A client prepares an [`Exchange`], hands
//! [`Exchange::request`] to its connection (blocking or awaited), and passes
//! whatever the connection returned to [`Exchange::finish`].

use crate::config::ClientConfig;
use crate::error::LlmError;
use crate::transport::http::parse_header;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, QueryOptions};
use metrics::{counter, histogram};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The only status code accepted as success
pub const SUCCESS_STATUS: u16 = 200;

/// A fully built outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    /// Per-call headers; the fixed headers live on the connection
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Decode the body back into the wire type
    pub fn completion_request(&self) -> Result<ChatCompletionRequest, LlmError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| LlmError::serialization("Request body is not a completion request", e))
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One request/response round trip
#[derive(Debug)]
pub struct Exchange {
    request: HttpRequest,
    started: Instant,
}

impl Exchange {
    /// Build the request for a single user prompt
    pub fn prepare(
        config: &ClientConfig,
        prompt: &str,
        options: Option<&QueryOptions>,
    ) -> Result<Self, LlmError> {
        if prompt.is_empty() {
            return Err(LlmError::usage("Query text must not be empty"));
        }

        let payload = ChatCompletionRequest::single(&config.model, prompt);
        let body = serde_json::to_vec(&payload)
            .map_err(|e| LlmError::serialization("Failed to encode ChatCompletionRequest", e))?;

        if let Some(options) = options {
            for (key, value) in &options.headers {
                parse_header(key, value).map_err(LlmError::usage)?;
            }
        }

        let (headers, timeout) = match options {
            Some(options) => (options.headers.clone(), options.timeout.or(config.timeout)),
            None => (HashMap::new(), config.timeout),
        };

        Ok(Self {
            request: HttpRequest {
                url: config.endpoint_url(),
                headers,
                body,
                timeout,
            },
            started: Instant::now(),
        })
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Interpret the transport outcome and record metrics for the exchange
    pub fn finish(self, outcome: Result<HttpResponse, LlmError>) -> Result<String, LlmError> {
        let result = outcome.and_then(interpret);

        let label = match &result {
            Ok(_) => "success",
            Err(LlmError::Status { .. }) => "status_error",
            Err(LlmError::Protocol { .. }) => "protocol_error",
            Err(LlmError::Network { .. }) => "network_error",
            Err(_) => "other_error",
        };
        counter!("jade_completion_requests_total", "outcome" => label).increment(1);
        histogram!("jade_completion_latency_ms").record(self.started.elapsed().as_millis() as f64);

        result
    }
}

/// Map a raw response onto the completion text or one of the error kinds.
///
/// - any status other than 200 → [`LlmError::Status`]
/// - body that is not JSON of the expected types → [`LlmError::Protocol`]
/// - valid JSON without `choices` → [`LlmError::Protocol`]
/// - `choices` without a first `message.content` → [`LlmError::Protocol`]
pub fn interpret(response: HttpResponse) -> Result<String, LlmError> {
    if response.status != SUCCESS_STATUS {
        log::warn!("Completion API returned status {}", response.status);
        return Err(LlmError::status(response.status, response.body));
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(&response.body)
        .map_err(|e| LlmError::protocol_with_source("Response body is not valid JSON", e))?;

    let Some(choices) = parsed.choices else {
        log::warn!("Completion response has no `choices` field");
        return Err(LlmError::protocol("Response shape unexpected: missing `choices`"));
    };

    choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            LlmError::protocol("Response shape unexpected: no `choices[0].message.content`")
        })
}
