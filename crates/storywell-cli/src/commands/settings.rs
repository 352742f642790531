use anyhow::{Context, Result};
use colored::Colorize;
use storywell_application::WritingAssistantService;

pub async fn show(service: &WritingAssistantService) -> Result<()> {
    let status = service.status().await;

    let authorized_url = if status.authorized_url.is_empty() {
        "(not set)".bright_black().to_string()
    } else {
        status.authorized_url.clone()
    };
    println!("{} {}", "Authorized URL:".bold(), authorized_url);
    println!("{} {}", "Current URL:".bold(), status.current_url);
    println!("{} {}", "Mode:".bold(), status.mode);
    if status.authorized {
        println!("{} {}", "AI features:".bold(), "enabled".green());
    } else {
        println!("{} {}", "AI features:".bold(), "not authorized".red());
    }
    Ok(())
}

pub async fn set_url(service: &WritingAssistantService, url: &str) -> Result<()> {
    service
        .update_authorized_url(url)
        .await
        .context("Failed to save the authorized URL")?;

    let saved = service.authorized_url().await;
    if saved.is_empty() {
        println!("{}", "Authorized URL cleared.".yellow());
    } else {
        println!("{} {}", "Authorized URL set to".green(), saved);
    }
    Ok(())
}
