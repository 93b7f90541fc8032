//! Connection seam between the clients and the HTTP stack.
//!
//! A connector opens a connection configured with the fixed headers; the
//! connection sends requests until it is closed. [`http`] provides the
//! reqwest-backed implementations used by default.

pub mod http;

use crate::error::LlmError;
use crate::exchange::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::collections::HashMap;

pub use http::{AsyncHttpConnection, AsyncHttpConnector, HttpConnection, HttpConnector};

/// Opens blocking connections
pub trait Connector {
    type Connection: Connection;

    fn connect(&self, headers: &HashMap<String, String>) -> Result<Self::Connection, LlmError>;
}

/// A blocking connection context
pub trait Connection {
    /// Send one request on the caller's thread
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, LlmError>;

    /// Release the connection context
    fn close(self) -> Result<(), LlmError>;
}

/// Opens non-blocking connections
#[async_trait]
pub trait AsyncConnector: Send + Sync {
    type Connection: AsyncConnection;

    async fn connect(
        &self,
        headers: &HashMap<String, String>,
    ) -> Result<Self::Connection, LlmError>;
}

/// A non-blocking connection context
#[async_trait]
pub trait AsyncConnection: Send + Sync {
    /// Send one request, yielding to the scheduler while it is outstanding
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, LlmError>;

    /// Release the connection context
    async fn close(self) -> Result<(), LlmError>;
}
