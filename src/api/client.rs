//! Classore admin API client with connection pooling

use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use super::models::{normalize_message, ApiEnvelope};
use super::resilience::{RetryConfig, RetryPolicy};

/// HTTP client over the Classore admin REST API.
///
/// Holds the pooled `reqwest` client, the API base URL and the bearer token.
/// All verbs return the decoded response envelope; a non-success envelope or
/// HTTP status becomes an error carrying the server's normalized message.
#[derive(Clone)]
pub struct ClassoreClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ClassoreClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("classore-admin/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Create a client with custom HTTP client configuration.
    pub fn with_custom_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Shared HTTP client for requests that bypass the JSON helpers, such as
    /// the chunk-upload transport (cheap clone).
    pub fn http_client(&self) -> reqwest::Client {
        self.http_client.clone()
    }

    /// GET with retry: reads are idempotent, so transient network errors
    /// and 5xx answers go through the backoff policy. Mutations stay
    /// fire-once.
    pub async fn get(&self, url: &str) -> Result<ApiEnvelope<Value>> {
        debug!("GET {url}");
        let policy = RetryPolicy::new(RetryConfig::default());
        let response = policy
            .execute(|| async {
                let response = self
                    .http_client
                    .get(url)
                    .bearer_auth(&self.token)
                    .send()
                    .await?;
                if response.status().is_server_error() {
                    response.error_for_status()
                } else {
                    Ok(response)
                }
            })
            .await
            .with_context(|| format!("GET {url} failed"))?;
        Self::decode(response).await
    }

    pub async fn post(&self, url: &str, body: &Value) -> Result<ApiEnvelope<Value>> {
        debug!("POST {url}");
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?;
        Self::decode(response).await
    }

    pub async fn put(&self, url: &str, body: &Value) -> Result<ApiEnvelope<Value>> {
        debug!("PUT {url}");
        let response = self
            .http_client
            .put(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("PUT {url} failed"))?;
        Self::decode(response).await
    }

    pub async fn delete(&self, url: &str) -> Result<ApiEnvelope<Value>> {
        debug!("DELETE {url}");
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("DELETE {url} failed"))?;
        Self::decode(response).await
    }

    /// Decode the envelope, turning HTTP errors and `success: false` bodies
    /// into errors that carry the server's normalized message.
    async fn decode(response: reqwest::Response) -> Result<ApiEnvelope<Value>> {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to decode response body (status {status})"))?;

        if !status.is_success() {
            let message = body
                .get("message")
                .map(normalize_message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("request failed with status {status}"));
            anyhow::bail!("{message}");
        }

        let envelope: ApiEnvelope<Value> =
            serde_json::from_value(body).context("Response did not match the API envelope")?;
        if !envelope.success {
            let message = envelope
                .message_text()
                .or_else(|| envelope.error.clone())
                .unwrap_or_else(|| "request was not successful".to_string());
            anyhow::bail!("{message}");
        }
        Ok(envelope)
    }
}
