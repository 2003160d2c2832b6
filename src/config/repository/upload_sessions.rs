//! Repository for resumable upload sessions
//!
//! One row per module; starting a new upload for the same module replaces
//! the old session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::upload::session::UploadSession;
use crate::upload::uploader::SessionStore;

pub async fn save(pool: &SqlitePool, session: &UploadSession) -> Result<()> {
    let uploaded =
        serde_json::to_string(&session.uploaded).context("Failed to encode uploaded flags")?;
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO upload_sessions
            (module_id, upload_id, file_name, file_size, chunk_size, uploaded, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(&session.module_id)
    .bind(session.upload_id.to_string())
    .bind(&session.file_name)
    .bind(session.file_size as i64)
    .bind(session.chunk_size as i64)
    .bind(uploaded)
    .bind(session.created_at.to_rfc3339())
    .execute(pool)
    .await
    .with_context(|| format!("Failed to save upload session for module '{}'", session.module_id))?;
    Ok(())
}

pub async fn load(pool: &SqlitePool, module_id: &str) -> Result<Option<UploadSession>> {
    let row: Option<(String, String, i64, i64, String, String)> = sqlx::query_as(
        r#"
        SELECT upload_id, file_name, file_size, chunk_size, uploaded, created_at
        FROM upload_sessions WHERE module_id = ?
        "#,
    )
    .bind(module_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to load upload session for module '{}'", module_id))?;

    match row {
        Some((upload_id, file_name, file_size, chunk_size, uploaded, created_at)) => {
            let upload_id: Uuid = upload_id
                .parse()
                .context("Stored upload_id is not a valid UUID")?;
            let uploaded: Vec<bool> =
                serde_json::from_str(&uploaded).context("Stored uploaded flags are corrupt")?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .context("Stored session timestamp is not valid RFC 3339")?
                .with_timezone(&Utc);
            Ok(Some(UploadSession {
                upload_id,
                module_id: module_id.to_string(),
                file_name,
                file_size: file_size as u64,
                chunk_size: chunk_size as u64,
                uploaded,
                created_at,
            }))
        }
        None => Ok(None),
    }
}

pub async fn delete(pool: &SqlitePool, module_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM upload_sessions WHERE module_id = ?")
        .bind(module_id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete upload session for module '{}'", module_id))?;
    Ok(())
}

/// [`SessionStore`] backed by the local database, used by the uploader to
/// checkpoint after every confirmed chunk.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn save(&self, session: &UploadSession) -> Result<()> {
        save(&self.pool, session).await
    }

    async fn delete(&self, module_id: &str) -> Result<()> {
        delete(&self.pool, module_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::db;

    #[tokio::test]
    async fn roundtrip_preserves_uploaded_flags() {
        let pool = db::connect_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();

        let mut session = UploadSession::new("mod-1", "lecture.mp4", 25, 10);
        session.mark_uploaded(1);
        session.mark_uploaded(2);
        save(&pool, &session).await.unwrap();

        let loaded = load(&pool, "mod-1").await.unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.uploaded_count(), 2);
        let pending: Vec<u32> = loaded.pending_chunks().iter().map(|c| c.index_number).collect();
        assert_eq!(pending, vec![3]);
    }

    #[tokio::test]
    async fn missing_session_loads_none() {
        let pool = db::connect_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();
        assert!(load(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_per_module() {
        let pool = db::connect_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();

        let first = UploadSession::new("mod-1", "a.mp4", 10, 10);
        let second = UploadSession::new("mod-1", "b.mp4", 20, 10);
        save(&pool, &first).await.unwrap();
        save(&pool, &second).await.unwrap();

        let loaded = load(&pool, "mod-1").await.unwrap().unwrap();
        assert_eq!(loaded.file_name, "b.mp4");
        assert_eq!(loaded.upload_id, second.upload_id);
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let pool = db::connect_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();

        let session = UploadSession::new("mod-1", "a.mp4", 10, 10);
        save(&pool, &session).await.unwrap();
        delete(&pool, "mod-1").await.unwrap();
        assert!(load(&pool, "mod-1").await.unwrap().is_none());
    }
}
