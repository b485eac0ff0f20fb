use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    provider: String,
}

impl HttpClient {
    /// Client whose errors are attributed to `provider`
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider: provider.into(),
        }
    }

    pub fn with_timeout(provider: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            provider: provider.into(),
        })
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        tracing::debug!(provider = %self.provider, url, "POST");

        let response = request.json(body).send().await.map_err(|e| {
            DomainError::provider(&self.provider, format!("Request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                &self.provider,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::provider(&self.provider, format!("Failed to parse response: {}", e))
        })
    }
}
