use crate::error::LlmError;
use reqwest::header::HeaderValue;
use std::collections::HashMap;
use std::time::Duration;

/// Environment variable consulted when no token is passed explicitly
pub const TOKEN_ENV_VAR: &str = "OPENAI_API_TOKEN";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";

/// Resolve the bearer token from the process environment.
///
/// An explicit, non-empty token always wins. Otherwise the value of
/// [`TOKEN_ENV_VAR`] is used if it is set and non-empty.
pub fn resolve_token(explicit: Option<&str>) -> Result<String, LlmError> {
    resolve_token_with(explicit, |key| std::env::var(key).ok())
}

/// Same as [`resolve_token`] but with a caller-supplied environment lookup
pub fn resolve_token_with<F>(explicit: Option<&str>, lookup: F) -> Result<String, LlmError>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    lookup(TOKEN_ENV_VAR)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            LlmError::configuration(format!(
                "No API token provided. Set the `{TOKEN_ENV_VAR}` environment variable, \
                 or pass it to the constructor explicitly"
            ))
        })
}

/// Configuration for a completion client.
///
/// The token is fixed once the config is built; the environment is never
/// consulted again after [`ClientConfig::resolve`] returns.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    token: String,
    pub base_url: String,
    pub model: String,
    /// Client-wide request timeout. `None` means no timeout unless a
    /// per-call override supplies one.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }

    /// Build a config from an optional explicit token, falling back to the
    /// environment. Fails fast when neither source yields a token.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, LlmError> {
        let config = Self::new(resolve_token(explicit)?);
        config.validate()?;
        Ok(config)
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        Self::resolve(None)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Full URL of the chat-completion endpoint
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_ENDPOINT
        )
    }

    /// Headers installed on the connection when it is opened
    pub fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.token),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.token.is_empty() {
            return Err(LlmError::configuration("API token is required"));
        }

        if HeaderValue::from_str(&format!("Bearer {}", self.token)).is_err() {
            return Err(LlmError::configuration(
                "API token contains characters that cannot be sent in an HTTP header",
            ));
        }

        if self.base_url.is_empty() {
            return Err(LlmError::configuration("Base URL is required"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LlmError::configuration(
                "Base URL must be a valid HTTP/HTTPS URL",
            ));
        }

        if self.model.trim().is_empty() {
            return Err(LlmError::configuration("Model is required"));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(LlmError::configuration("Timeout must be greater than zero"));
        }

        Ok(())
    }
}
