//! HTTP backend abstraction for the catalog API.
//!
//! A trait-based backend allows dependency injection and easy testing.
//! The production implementation uses reqwest. There is deliberately no
//! retry logic here: the pipeline's contract is fail-fast, with the
//! caller deciding whether to retry an install.

use async_trait::async_trait;
use url::Url;

use crate::config::HfClientConfig;
use crate::error::{HfError, HfResult, truncate_body};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can fetch JSON from URLs.
///
/// This is an implementation detail; external code talks to
/// [`HfCatalogClient`](crate::HfCatalogClient).
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch a URL and return the parsed JSON body.
    async fn get_json(&self, url: &Url) -> HfResult<serde_json::Value>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend from the client configuration.
    pub fn new(config: &HfClientConfig) -> HfResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            auth_token: config.token.clone(),
        })
    }

    fn build_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(ref token) = self.auth_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &Url) -> HfResult<serde_json::Value> {
        let response = self.build_request(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HfError::ApiRequestFailed {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| HfError::InvalidResponse {
            message: format!("{e}; body: {}", truncate_body(&body)),
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use super::testing::{CannedReply, FakeBackend};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reqwest_backend_creation() {
        let config = HfClientConfig::default();
        let backend = ReqwestBackend::new(&config).unwrap();
        assert!(backend.auth_token.is_none());
    }

    #[test]
    fn test_reqwest_backend_with_token() {
        let config = HfClientConfig::default().with_token("tok");
        let backend = ReqwestBackend::new(&config).unwrap();
        assert_eq!(backend.auth_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_fake_backend_returns_canned_json() {
        let backend =
            FakeBackend::new().with_reply("models/test", CannedReply::Json(json!({"id": "test"})));
        let url = Url::parse("https://example.com/api/models/test").unwrap();

        let value = backend.get_json(&url).await.unwrap();
        assert_eq!(value["id"], "test");
        assert_eq!(backend.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_backend_error_status() {
        let backend = FakeBackend::new()
            .with_reply("boom", CannedReply::Status(500, "server exploded".to_string()));
        let url = Url::parse("https://example.com/boom").unwrap();

        let err = backend.get_json(&url).await.unwrap_err();
        assert!(matches!(err, HfError::ApiRequestFailed { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fake_backend_malformed_body() {
        let backend = FakeBackend::new()
            .with_reply("html", CannedReply::RawBody("<html>rate limited</html>".to_string()));
        let url = Url::parse("https://example.com/html").unwrap();

        let err = backend.get_json(&url).await.unwrap_err();
        match err {
            HfError::InvalidResponse { message } => assert!(message.contains("rate limited")),
            other => panic!("expected InvalidResponse, got {other}"),
        }
    }
}
