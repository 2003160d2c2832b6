//! Wire shapes shared across the Classore admin API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every Classore endpoint answers with this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Either a single string or an array of strings; see
    /// [`normalize_message`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// The server's message, normalized: arrays collapse to their first
    /// element, anything else renders as-is.
    pub fn message_text(&self) -> Option<String> {
        self.message.as_ref().map(normalize_message)
    }
}

/// Collapse the server `message` field to one string. The backend sometimes
/// sends validation messages as an array; only the first one is shown.
pub fn normalize_message(message: &Value) -> String {
    match message {
        Value::Array(items) => items
            .first()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Bearer token and its expiry, persisted locally between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenInfo {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Payload returned by `/auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
