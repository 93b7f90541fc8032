use thiserror::Error;

/// Main error type for the completion client
#[derive(Error, Debug)]
pub enum LlmError {
    /// No usable credential or an invalid client configuration.
    /// Raised at construction, never retried.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The API answered with anything other than HTTP 200
    #[error("HTTP status error: {status} - {body}")]
    Status { status: u16, body: String },

    /// A 200 response whose body does not have the expected shape
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failure inside the HTTP stack (DNS, TLS, timeout, refused connection).
    /// The underlying error is kept untouched as the source.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The client was used outside of its connect/close lifecycle
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// The outgoing request could not be encoded
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Flat discriminant over [`LlmError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Status,
    Protocol,
    Network,
    Usage,
    Serialization,
}

impl LlmError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a protocol-shape error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// Create a protocol-shape error with source
    pub fn protocol_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Protocol {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a network error wrapping the HTTP stack's own error
    pub fn network(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Configuration { .. } => ErrorKind::Configuration,
            LlmError::Status { .. } => ErrorKind::Status,
            LlmError::Protocol { .. } => ErrorKind::Protocol,
            LlmError::Network { .. } => ErrorKind::Network,
            LlmError::Usage { .. } => ErrorKind::Usage,
            LlmError::Serialization { .. } => ErrorKind::Serialization,
        }
    }

    /// HTTP status carried by a [`LlmError::Status`] error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check whether a network error was caused by a request timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            LlmError::Network { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_timeout()),
            _ => false,
        }
    }
}

/// Errors from reqwest are passed through as network errors
impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out"
        } else if err.is_connect() {
            "Connection failed"
        } else {
            "HTTP request failed"
        };
        LlmError::network(message, err)
    }
}
