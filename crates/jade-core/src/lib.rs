//! # jade-core
//!
//! A small client for the OpenAI chat-completion endpoint, in a blocking
//! ([`GptClient`]) and a non-blocking ([`AsyncGptClient`]) flavour.
//!
//! Each client resolves its bearer token at construction (explicit argument
//! first, then `OPENAI_API_TOKEN`), opens its HTTP connection on `connect`,
//! sends one `POST /v1/chat/completions` per `query` and releases the
//! connection on `close`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jade_core::{AsyncGptClient, QueryOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = AsyncGptClient::new(None)?;
//!     client.connect().await?;
//!
//!     let options = QueryOptions::new().timeout(Duration::from_secs(200));
//!     let answer = client
//!         .query_with("What is the capital of France?", &options)
//!         .await;
//!
//!     client.close().await?;
//!     println!("{}", answer?);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is returned to the caller as an [`LlmError`]; nothing is
//! retried:
//!
//! ```rust,no_run
//! use jade_core::{GptClient, LlmError};
//!
//! # fn example(client: &GptClient) {
//! match client.query("Hello") {
//!     Ok(text) => println!("{text}"),
//!     Err(LlmError::Status { status, .. }) => println!("API answered {status}"),
//!     Err(LlmError::Protocol { message, .. }) => println!("Unexpected response: {message}"),
//!     Err(LlmError::Network { .. }) => println!("Could not reach the API"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod transport;
pub mod types;

#[cfg(test)]
mod utils;

pub use client::{AsyncGptClient, ClientState, GptClient, Session};
pub use config::{ClientConfig, TOKEN_ENV_VAR, resolve_token, resolve_token_with};
pub use error::{ErrorKind, LlmError};
pub use exchange::{Exchange, HttpRequest, HttpResponse};
pub use transport::{
    AsyncConnection, AsyncConnector, AsyncHttpConnector, Connection, Connector, HttpConnector,
};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, QueryOptions};
