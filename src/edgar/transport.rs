//! HTTP transport for EDGAR requests.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Fetches the body of a URL as text.
///
/// Implementations must send the identifying header EDGAR requires.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

/// reqwest-backed transport used against the live EDGAR endpoints.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport that identifies itself with `user_agent`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
