//! One-shot generation commands.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use storywell_application::WritingAssistantService;
use storywell_core::assistant::GenerationOutcome;

fn print_outcome(outcome: GenerationOutcome) -> Result<()> {
    if outcome.is_success() {
        super::print_assistant(&outcome.into_message());
        Ok(())
    } else {
        bail!(outcome.display_text())
    }
}

fn read_story(file: &Path) -> Result<String> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if content.trim().is_empty() {
        bail!("{} is empty", file.display());
    }
    Ok(content)
}

pub async fn ask(service: &WritingAssistantService, prompt: &str) -> Result<()> {
    print_outcome(service.ask(prompt).await)
}

pub async fn idea(service: &WritingAssistantService, theme: &str) -> Result<()> {
    print_outcome(service.suggest_story_idea(theme).await?)
}

pub async fn continue_story(
    service: &WritingAssistantService,
    title: &str,
    file: &Path,
) -> Result<()> {
    let content = read_story(file)?;
    print_outcome(service.continue_story(title, &content).await?)
}

pub async fn polish(service: &WritingAssistantService, file: &Path) -> Result<()> {
    let content = read_story(file)?;
    print_outcome(service.polish_story(&content).await?)
}
