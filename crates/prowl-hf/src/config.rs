//! Public configuration for the catalog client.

use std::time::Duration;

/// Configuration for the `HuggingFace` catalog client.
///
/// Use the builder methods to customize; defaults point at the public
/// Hub. The client performs no internal retries: failures surface to the
/// caller, which decides whether to try again.
#[derive(Debug, Clone)]
pub struct HfClientConfig {
    /// Base URL for the models API.
    pub(crate) base_url: String,
    /// User agent string for HTTP requests.
    pub(crate) user_agent: String,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Optional authentication token for private models.
    pub(crate) token: Option<String>,
}

impl Default for HfClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://huggingface.co/api/models".to_string(),
            user_agent: concat!("prowl-hf/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

impl HfClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for the models API.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout. Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an authentication token for private models.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
