use super::{AsyncConnection, AsyncConnector, Connection, Connector};
use crate::error::LlmError;
use crate::exchange::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Opens [`HttpConnection`]s backed by `reqwest::blocking`.
///
/// The blocking client runs its own runtime internally and must not be
/// created or dropped from inside an async context.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector;

pub struct HttpConnection {
    client: reqwest::blocking::Client,
}

impl Connector for HttpConnector {
    type Connection = HttpConnection;

    fn connect(&self, headers: &HashMap<String, String>) -> Result<HttpConnection, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .default_headers(header_map(headers)?)
            // reqwest's blocking client defaults to 30s; only per-call overrides apply
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| LlmError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(HttpConnection { client })
    }
}

impl Connection for HttpConnection {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, LlmError> {
        log::debug!("POST {}", request.url);

        let mut req = self.client.post(&request.url).body(request.body.clone());
        for (key, value) in &request.headers {
            req = req.header(key, value);
        }
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(HttpResponse { status, body })
    }

    fn close(self) -> Result<(), LlmError> {
        drop(self.client);
        Ok(())
    }
}

/// Opens [`AsyncHttpConnection`]s backed by `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct AsyncHttpConnector;

pub struct AsyncHttpConnection {
    client: reqwest::Client,
}

#[async_trait]
impl AsyncConnector for AsyncHttpConnector {
    type Connection = AsyncHttpConnection;

    async fn connect(
        &self,
        headers: &HashMap<String, String>,
    ) -> Result<AsyncHttpConnection, LlmError> {
        let client = reqwest::Client::builder()
            .default_headers(header_map(headers)?)
            .build()
            .map_err(|e| LlmError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(AsyncHttpConnection { client })
    }
}

#[async_trait]
impl AsyncConnection for AsyncHttpConnection {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, LlmError> {
        log::debug!("POST {}", request.url);

        let mut req = self.client.post(&request.url).body(request.body.clone());
        for (key, value) in &request.headers {
            req = req.header(key, value);
        }
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }

    async fn close(self) -> Result<(), LlmError> {
        drop(self.client);
        Ok(())
    }
}

/// Parse one header, describing what HTTP cannot carry on failure
pub(crate) fn parse_header(key: &str, value: &str) -> Result<(HeaderName, HeaderValue), String> {
    let name = HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| format!("Invalid header name `{key}`: {e}"))?;
    let value =
        HeaderValue::from_str(value).map_err(|e| format!("Invalid value for header `{key}`: {e}"))?;
    Ok((name, value))
}

/// Convert string headers, rejecting names or values HTTP cannot carry
fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, LlmError> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let (name, mut value) = parse_header(key, value).map_err(LlmError::configuration)?;
        if name == AUTHORIZATION {
            value.set_sensitive(true);
        }
        map.insert(name, value);
    }
    Ok(map)
}
