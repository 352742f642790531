use anyhow::Result;
use colored::Colorize;
use storywell_application::WritingAssistantService;

pub async fn show(service: &WritingAssistantService) -> Result<()> {
    let status = service.status().await;

    println!("{} {}", "Mode:".bold(), status.mode);
    match status.quota {
        Some(quota) => {
            println!("{} {}/{}", "Used:".bold(), quota.count, quota.limit);
            let remaining = format!("{}", quota.remaining());
            if quota.is_exhausted() {
                println!("{} {}", "Remaining:".bold(), remaining.red());
            } else {
                println!("{} {}", "Remaining:".bold(), remaining.green());
            }
        }
        None => println!("{}", "No usage limit applies in owner mode.".bright_black()),
    }
    Ok(())
}
