use super::state::{ClientState, Lifecycle};
use crate::config::ClientConfig;
use crate::error::LlmError;
use crate::exchange::Exchange;
use crate::transport::{AsyncConnection, AsyncConnector, AsyncHttpConnector};
use crate::types::QueryOptions;
use futures::future::BoxFuture;

/// Non-blocking chat-completion client.
///
/// Same contract as [`crate::GptClient`]; `connect`, `query` and `close` are
/// suspension points. `query` takes `&self`, so a connected client can be
/// shared (e.g. behind an `Arc`) and queried concurrently; each query is an
/// independent exchange.
///
/// There is no async drop: use [`AsyncGptClient::scoped`] or call
/// [`AsyncGptClient::close`] explicitly.
///
/// ```no_run
/// use jade_core::AsyncGptClient;
///
/// # async fn example() -> Result<(), jade_core::LlmError> {
/// let mut client = AsyncGptClient::new(None)?;
/// let answer = client
///     .scoped(|client| Box::pin(async move { client.query("Hello!").await }))
///     .await?;
/// println!("{answer}");
/// # Ok(())
/// # }
/// ```
pub struct AsyncGptClient<C: AsyncConnector = AsyncHttpConnector> {
    config: ClientConfig,
    connector: C,
    lifecycle: Lifecycle<C::Connection>,
}

impl AsyncGptClient {
    /// Create a client from an optional explicit token, falling back to
    /// `OPENAI_API_TOKEN`. Fails immediately if neither is available.
    pub fn new(token: Option<&str>) -> Result<Self, LlmError> {
        Self::with_config(ClientConfig::resolve(token)?, AsyncHttpConnector)
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(None)
    }
}

impl<C: AsyncConnector> AsyncGptClient<C> {
    pub fn with_config(config: ClientConfig, connector: C) -> Result<Self, LlmError> {
        config.validate()?;
        Ok(Self {
            config,
            connector,
            lifecycle: Lifecycle::Uninitialized,
        })
    }

    pub fn token(&self) -> &str {
        self.config.token()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ClientState {
        self.lifecycle.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ClientState::Connected
    }

    /// Open the connection context with the JSON and bearer headers
    pub async fn connect(&mut self) -> Result<(), LlmError> {
        self.lifecycle.ensure_connectable()?;
        let connection = self.connector.connect(&self.config.headers()).await?;
        self.lifecycle.open(connection);
        log::debug!("Connected async completion client to {}", self.config.base_url);
        Ok(())
    }

    /// Ask a single question and return the generated text
    pub async fn query(&self, text: &str) -> Result<String, LlmError> {
        self.send(text, None).await
    }

    /// Like [`AsyncGptClient::query`], with per-call transport overrides
    pub async fn query_with(
        &self,
        text: &str,
        options: &QueryOptions,
    ) -> Result<String, LlmError> {
        self.send(text, Some(options)).await
    }

    async fn send(&self, text: &str, options: Option<&QueryOptions>) -> Result<String, LlmError> {
        let connection = self.lifecycle.connection()?;
        let exchange = Exchange::prepare(&self.config, text, options)?;
        let outcome = connection.send(exchange.request()).await;
        exchange.finish(outcome)
    }

    /// Release the connection context. Closing a client that is not
    /// connected is a no-op.
    pub async fn close(&mut self) -> Result<(), LlmError> {
        match self.lifecycle.release() {
            Some(connection) => {
                log::debug!("Closing async completion client");
                connection.close().await
            }
            None => Ok(()),
        }
    }

    /// Connect, run the future produced by `f`, then close on every exit path.
    ///
    /// An error from `f` takes precedence over an error from closing.
    pub async fn scoped<T, F>(&mut self, f: F) -> Result<T, LlmError>
    where
        F: for<'c> FnOnce(&'c Self) -> BoxFuture<'c, Result<T, LlmError>>,
    {
        self.connect().await?;
        let outcome = f(&*self).await;
        let closed = self.close().await;
        let value = outcome?;
        closed?;
        Ok(value)
    }
}
