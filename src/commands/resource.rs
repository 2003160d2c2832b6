//! Generic resource command handlers
//!
//! Thin wrappers over [`Operation`]: read a payload, run one fire-once
//! request, print the server's answer. A failed mutation changes nothing
//! locally; the user retries by re-running the command.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

use crate::api::{endpoints, AuthManager, ClassoreClient, Operation};
use crate::config::Config;

pub async fn list_command(config: &Config, resource: &str) -> Result<()> {
    let client = authenticated_client(config).await?;
    let url = endpoints::resource_collection(&config.api_base_url, resource);
    let envelope = client.get(&url).await?;

    match envelope.data {
        Some(data) => println!("{}", serde_json::to_string_pretty(&data)?),
        None => println!("(empty)"),
    }
    Ok(())
}

pub async fn create_command(config: &Config, resource: &str, payload: &str) -> Result<()> {
    let data = read_payload(payload)?;
    let client = authenticated_client(config).await?;
    let result = Operation::create(resource, data).execute(&client).await?;

    println!("{} {}", "Created".green(), describe(&result.data));
    Ok(())
}

pub async fn update_command(config: &Config, resource: &str, id: &str, payload: &str) -> Result<()> {
    let data = read_payload(payload)?;
    let client = authenticated_client(config).await?;
    let result = Operation::update(resource, id, data).execute(&client).await?;

    println!("{} {resource}/{id}", "Updated".green());
    if let Some(message) = result.message {
        println!("{message}");
    }
    Ok(())
}

pub async fn delete_command(config: &Config, resource: &str, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete {resource}/{id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let client = authenticated_client(config).await?;
    Operation::delete(resource, id).execute(&client).await?;
    println!("{} {resource}/{id}", "Deleted".green());
    Ok(())
}

pub async fn publish_command(config: &Config, resource: &str, id: &str) -> Result<()> {
    let client = authenticated_client(config).await?;
    Operation::publish(resource, id).execute(&client).await?;
    println!("{} {resource}/{id}", "Published".green());
    Ok(())
}

/// Build a client from the stored token, failing before any network call
/// when the session is missing or expired.
pub async fn authenticated_client(config: &Config) -> Result<ClassoreClient> {
    let auth = AuthManager::new(&config.api_base_url, config.pool().clone());
    let token = auth.require_token().await?;
    Ok(ClassoreClient::new(&config.api_base_url, token.access_token))
}

/// Inline JSON, or `@path` to read it from a file.
pub fn read_payload(payload: &str) -> Result<Value> {
    let raw = match payload.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
        }
        None => payload.to_string(),
    };
    serde_json::from_str(&raw).context("Payload is not valid JSON")
}

fn describe(data: &Option<Value>) -> String {
    data.as_ref()
        .and_then(|d| d.get("id"))
        .and_then(Value::as_str)
        .map(|id| format!("record {id}"))
        .unwrap_or_else(|| "record".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_payload_parses() {
        let value = read_payload(r#"{"name": "JAMB"}"#).unwrap();
        assert_eq!(value["name"], "JAMB");
    }

    #[test]
    fn invalid_payload_rejected() {
        assert!(read_payload("not json").is_err());
    }
}
