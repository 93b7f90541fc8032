use super::state::{ClientState, Lifecycle};
use crate::config::ClientConfig;
use crate::error::LlmError;
use crate::exchange::Exchange;
use crate::transport::{Connection, Connector, HttpConnector};
use crate::types::QueryOptions;
use std::ops::Deref;

/// Blocking chat-completion client.
///
/// Every call runs on the caller's thread. The client must be connected
/// before it is queried and should be closed when done; [`GptClient::session`]
/// and [`GptClient::scoped`] do both automatically.
///
/// ```no_run
/// use jade_core::GptClient;
///
/// # fn example() -> Result<(), jade_core::LlmError> {
/// let mut client = GptClient::new(None)?;
/// let session = client.session()?;
/// let answer = session.query("What is the capital of France?")?;
/// println!("{answer}");
/// # Ok(())
/// # }
/// ```
pub struct GptClient<C: Connector = HttpConnector> {
    config: ClientConfig,
    connector: C,
    lifecycle: Lifecycle<C::Connection>,
}

impl GptClient {
    /// Create a client from an optional explicit token, falling back to
    /// `OPENAI_API_TOKEN`. Fails immediately if neither is available.
    pub fn new(token: Option<&str>) -> Result<Self, LlmError> {
        Self::with_config(ClientConfig::resolve(token)?, HttpConnector)
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(None)
    }
}

impl<C: Connector> GptClient<C> {
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
    pub fn connect(&mut self) -> Result<(), LlmError> {
        self.lifecycle.ensure_connectable()?;
        let connection = self.connector.connect(&self.config.headers())?;
        self.lifecycle.open(connection);
        log::debug!("Connected completion client to {}", self.config.base_url);
        Ok(())
    }

    /// Ask a single question and return the generated text
    pub fn query(&self, text: &str) -> Result<String, LlmError> {
        self.send(text, None)
    }

    /// Like [`GptClient::query`], with per-call transport overrides
    pub fn query_with(&self, text: &str, options: &QueryOptions) -> Result<String, LlmError> {
        self.send(text, Some(options))
    }

    fn send(&self, text: &str, options: Option<&QueryOptions>) -> Result<String, LlmError> {
        let connection = self.lifecycle.connection()?;
        let exchange = Exchange::prepare(&self.config, text, options)?;
        let outcome = connection.send(exchange.request());
        exchange.finish(outcome)
    }

    /// Release the connection context. Closing a client that is not
    /// connected is a no-op.
    pub fn close(&mut self) -> Result<(), LlmError> {
        match self.lifecycle.release() {
            Some(connection) => {
                log::debug!("Closing completion client");
                connection.close()
            }
            None => Ok(()),
        }
    }

    /// Connect and return a guard that closes the client when dropped
    pub fn session(&mut self) -> Result<Session<'_, C>, LlmError> {
        self.connect()?;
        Ok(Session { client: self })
    }

    /// Run `f` on a connected client, closing it on every exit path.
    ///
    /// An error from `f` takes precedence over an error from closing.
    pub fn scoped<T, F>(&mut self, f: F) -> Result<T, LlmError>
    where
        F: FnOnce(&Self) -> Result<T, LlmError>,
    {
        let session = self.session()?;
        let outcome = f(&*session);
        let closed = session.close();
        let value = outcome?;
        closed?;
        Ok(value)
    }
}

/// A connected [`GptClient`] that is closed when the guard goes out of scope,
/// including during unwinding.
pub struct Session<'a, C: Connector = HttpConnector> {
    client: &'a mut GptClient<C>,
}

impl<C: Connector> Session<'_, C> {
    /// Close now and report any error instead of logging it on drop
    pub fn close(self) -> Result<(), LlmError> {
        self.client.close()
    }
}

impl<C: Connector> Deref for Session<'_, C> {
    type Target = GptClient<C>;

    fn deref(&self) -> &Self::Target {
        self.client
    }
}

impl<C: Connector> Drop for Session<'_, C> {
    fn drop(&mut self) {
        if let Err(e) = self.client.close() {
            log::warn!("Failed to close completion client: {e}");
        }
    }
}
