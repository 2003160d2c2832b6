//! Authentication against the Classore admin API
//!
//! Email/password login exchanges for a bearer token. The token and its
//! expiry live in the local database so every later command can run without
//! re-prompting.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::SqlitePool;

use super::endpoints;
use super::models::{normalize_message, ApiEnvelope, LoginData, TokenInfo};
use crate::config::repository::tokens;

pub struct AuthManager {
    base_url: String,
    pool: SqlitePool,
}

impl AuthManager {
    pub fn new(base_url: impl Into<String>, pool: SqlitePool) -> Self {
        Self {
            base_url: base_url.into(),
            pool,
        }
    }

    /// Log in with admin credentials and persist the resulting token.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenInfo> {
        log::info!("Authenticating {email} against {}", self.base_url);

        let client = reqwest::Client::new();
        let response = client
            .post(endpoints::login(&self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("Login request failed")?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .with_context(|| format!("Failed to decode login response (status {status})"))?;

        if !status.is_success() {
            let message = body
                .get("message")
                .map(normalize_message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("login failed with status {status}"));
            anyhow::bail!("{message}");
        }

        let envelope: ApiEnvelope<LoginData> =
            serde_json::from_value(body).context("Login response did not match the API envelope")?;
        let data = envelope
            .data
            .context("Login response carried no access token")?;

        // Default token lifetime when the server does not say: one hour.
        let expires_in = data.expires_in.unwrap_or(3600);
        let token = TokenInfo {
            access_token: data.access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in as i64),
        };

        tokens::save(&self.pool, &token).await?;
        log::info!("Authenticated, token valid until {}", token.expires_at);
        Ok(token)
    }

    /// The stored token, if any, expired or not.
    pub async fn current_token(&self) -> Result<Option<TokenInfo>> {
        tokens::load(&self.pool).await
    }

    /// The stored token, failing with an actionable message when missing or
    /// expired. Every authenticated command calls this before any network
    /// traffic.
    pub async fn require_token(&self) -> Result<TokenInfo> {
        match tokens::load(&self.pool).await? {
            Some(token) if !token.is_expired() => Ok(token),
            Some(_) => anyhow::bail!("Session expired. Run `classore-admin auth login` again."),
            None => anyhow::bail!("Not authenticated. Run `classore-admin auth login` first."),
        }
    }

    /// Drop the stored token.
    pub async fn logout(&self) -> Result<()> {
        tokens::clear(&self.pool).await
    }
}
