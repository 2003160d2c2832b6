//! Auth command handlers

use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::api::AuthManager;
use crate::config::Config;

pub async fn login_command(config: &Config, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Admin email")
            .interact_text()?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    let auth = AuthManager::new(&config.api_base_url, config.pool().clone());
    let token = auth.login(&email, &password).await?;

    println!("{} session valid until {}", "Logged in.".green(), token.expires_at);
    Ok(())
}

pub async fn status_command(config: &Config) -> Result<()> {
    let auth = AuthManager::new(&config.api_base_url, config.pool().clone());
    match auth.current_token().await? {
        Some(token) if !token.is_expired() => {
            println!("{} token valid until {}", "Authenticated.".green(), token.expires_at);
        }
        Some(token) => {
            println!("{} token expired at {}", "Session expired.".yellow(), token.expires_at);
        }
        None => println!("{}", "Not authenticated.".yellow()),
    }
    Ok(())
}

pub async fn logout_command(config: &Config) -> Result<()> {
    let auth = AuthManager::new(&config.api_base_url, config.pool().clone());
    auth.logout().await?;
    info!("Cleared stored session token");
    println!("Logged out.");
    Ok(())
}
