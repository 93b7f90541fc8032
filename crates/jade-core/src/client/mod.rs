//! Blocking and non-blocking completion clients.
//!
//! Both share the same lifecycle (`Uninitialized -> Connected -> Closed`)
//! and hand request building and response interpretation to
//! [`crate::exchange`]; they differ only in how the caller waits.

pub mod async_client;
pub mod blocking;
pub mod state;

pub use async_client::AsyncGptClient;
pub use blocking::{GptClient, Session};
pub use state::ClientState;
