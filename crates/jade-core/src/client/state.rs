use crate::error::LlmError;

/// Observable lifecycle state of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Constructed, token resolved, no connection held
    Uninitialized,
    /// Connection context open; queries allowed
    Connected,
    /// Connection context released; the client cannot be reconnected
    Closed,
}

/// `Uninitialized -> Connected -> Closed`, owning the connection while open
#[derive(Debug)]
pub(crate) enum Lifecycle<C> {
    Uninitialized,
    Connected(C),
    Closed,
}

impl<C> Lifecycle<C> {
    pub(crate) fn state(&self) -> ClientState {
        match self {
            Lifecycle::Uninitialized => ClientState::Uninitialized,
            Lifecycle::Connected(_) => ClientState::Connected,
            Lifecycle::Closed => ClientState::Closed,
        }
    }

    /// Fails unless the client has never been connected
    pub(crate) fn ensure_connectable(&self) -> Result<(), LlmError> {
        match self {
            Lifecycle::Uninitialized => Ok(()),
            Lifecycle::Connected(_) => Err(LlmError::usage("Client is already connected")),
            Lifecycle::Closed => Err(LlmError::usage(
                "Client has been closed and cannot be reconnected",
            )),
        }
    }

    pub(crate) fn open(&mut self, connection: C) {
        *self = Lifecycle::Connected(connection);
    }

    pub(crate) fn connection(&self) -> Result<&C, LlmError> {
        match self {
            Lifecycle::Connected(connection) => Ok(connection),
            Lifecycle::Uninitialized => Err(LlmError::usage(
                "Client is not connected; call `connect` before `query`",
            )),
            Lifecycle::Closed => Err(LlmError::usage("Client has been closed")),
        }
    }

    /// Move to `Closed`, handing back the connection if one was open.
    /// A client that was never connected stays `Uninitialized`.
    pub(crate) fn release(&mut self) -> Option<C> {
        match std::mem::replace(self, Lifecycle::Closed) {
            Lifecycle::Connected(connection) => Some(connection),
            Lifecycle::Uninitialized => {
                *self = Lifecycle::Uninitialized;
                None
            }
            Lifecycle::Closed => None,
        }
    }
}
