//! Chunked video upload handlers

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

use crate::api::AuthManager;
use crate::config::repository::{upload_sessions, SqliteSessionStore};
use crate::config::Config;
use crate::upload::{
    status_topic, CancelHandle, HttpChunkTransport, ProgressTracker, UploadError, UploadPhase,
    UploadSession, VideoUploader,
};

pub async fn video_command(
    config: &Config,
    file: &Path,
    module_id: &str,
    restart: bool,
) -> Result<()> {
    // Preflight: both failures happen before any chunk leaves this machine.
    anyhow::ensure!(!module_id.is_empty(), "Module id is empty; save the lesson first");
    let auth = AuthManager::new(&config.api_base_url, config.pool().clone());
    let token = auth.require_token().await?;

    let metadata = std::fs::metadata(file)
        .with_context(|| format!("Failed to stat {}", file.display()))?;
    anyhow::ensure!(metadata.len() > 0, "File {} is empty", file.display());
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("video")
        .to_string();

    let mut session = resume_or_start(config, module_id, &file_name, metadata.len(), restart).await?;
    if session.is_complete() {
        println!("All chunks already uploaded for module {module_id}.");
        upload_sessions::delete(config.pool(), module_id).await?;
        return Ok(());
    }
    println!(
        "Uploading {} ({} of {} chunks left) as session {}",
        file_name,
        session.pending_chunks().len(),
        session.total_chunks(),
        session.upload_id
    );

    let cancel = CancelHandle::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let client = reqwest::Client::builder()
        .user_agent("classore-admin/0.1")
        .build()
        .context("Failed to build HTTP client")?;
    let transport = HttpChunkTransport::new(client, &config.api_base_url, token.access_token);
    let uploader = VideoUploader::new(transport, SqliteSessionStore::new(config.pool().clone()));

    let mut tracker = ProgressTracker::new();
    match uploader.run(file, &mut session, &mut tracker, &cancel).await {
        Ok(()) => {
            println!("{} upload complete; backend processing continues.", "Done.".green());
            Ok(())
        }
        Err(UploadError::Cancelled) => {
            // Session stays persisted; a later run resumes where this stopped.
            println!(
                "{} {} of {} chunks uploaded; rerun the command to resume.",
                "Cancelled.".yellow(),
                session.uploaded_count(),
                session.total_chunks()
            );
            Ok(())
        }
        Err(error) => {
            if let UploadPhase::Failed { message } = tracker.phase() {
                info!("Upload failed: {message}");
            }
            Err(error).context("Upload failed; the session is kept for resuming")
        }
    }
}

pub async fn status_command(config: &Config, module_id: &str) -> Result<()> {
    match upload_sessions::load(config.pool(), module_id).await? {
        Some(session) => {
            println!(
                "module {}: {} of {} chunks uploaded (session {}, file {})",
                module_id,
                session.uploaded_count(),
                session.total_chunks(),
                session.upload_id,
                session.file_name
            );
        }
        None => println!("No persisted upload session for module {module_id}."),
    }
    match &config.push_channel_url {
        Some(url) => println!("Server progress events: topic {} at {url}", status_topic(module_id)),
        None => println!(
            "Server progress events: topic {} (set CLASSORE_WS_URL to subscribe)",
            status_topic(module_id)
        ),
    }
    Ok(())
}

pub async fn abort_command(config: &Config, module_id: &str) -> Result<()> {
    upload_sessions::delete(config.pool(), module_id).await?;
    println!("Dropped persisted upload session for module {module_id}.");
    Ok(())
}

/// Use a persisted session when it still matches the file, otherwise start
/// fresh with a new `upload_id`.
async fn resume_or_start(
    config: &Config,
    module_id: &str,
    file_name: &str,
    file_size: u64,
    restart: bool,
) -> Result<UploadSession> {
    if !restart {
        if let Some(session) = upload_sessions::load(config.pool(), module_id).await? {
            if session.matches_file(file_name, file_size) {
                info!(
                    "Resuming session {} ({} chunks confirmed)",
                    session.upload_id,
                    session.uploaded_count()
                );
                return Ok(session);
            }
            log::warn!("Persisted session does not match the file, restarting upload");
        }
    }
    let session = UploadSession::new(module_id, file_name, file_size, config.chunk_size);
    upload_sessions::save(config.pool(), &session).await?;
    Ok(session)
}
