//! Repository for the stored auth token

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::api::models::TokenInfo;

/// Store the token, replacing any previous one. A single row is kept.
pub async fn save(pool: &SqlitePool, token: &TokenInfo) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO auth_tokens (id, access_token, expires_at, updated_at)
        VALUES (1, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(&token.access_token)
    .bind(token.expires_at.to_rfc3339())
    .execute(pool)
    .await
    .context("Failed to save auth token")?;
    Ok(())
}

/// Load the stored token, if any.
pub async fn load(pool: &SqlitePool) -> Result<Option<TokenInfo>> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT access_token, expires_at FROM auth_tokens WHERE id = 1")
            .fetch_optional(pool)
            .await
            .context("Failed to load auth token")?;

    match row {
        Some((access_token, expires_at)) => {
            let expires_at = DateTime::parse_from_rfc3339(&expires_at)
                .context("Stored token expiry is not valid RFC 3339")?
                .with_timezone(&Utc);
            Ok(Some(TokenInfo {
                access_token,
                expires_at,
            }))
        }
        None => Ok(None),
    }
}

/// Delete the stored token.
pub async fn clear(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM auth_tokens")
        .execute(pool)
        .await
        .context("Failed to clear auth token")?;
    Ok(())
}
