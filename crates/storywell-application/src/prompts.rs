//! Prompt templates for the one-shot writing tasks.
//!
//! Each task is a typed request rendered through a Jinja2 template.

use minijinja::Environment;
use serde::Serialize;
use storywell_core::error::{Result, StorywellError};

/// Story content longer than this is cut before being sent.
pub const MAX_STORY_CHARS: usize = 8_000;

const STORY_IDEA_TEMPLATE: &str = r#"Suggest one original short story idea{% if theme %} on the theme "{{ theme }}"{% endif %}.

Requirements:
{% for req in requirements -%}
- {{ req }}
{% endfor %}
Answer with a title on the first line, then the premise."#;

const CONTINUE_STORY_TEMPLATE: &str = r#"You are helping an author continue their short story{% if title %} "{{ title }}"{% endif %}.

Story so far:
{{ content }}

Write the next paragraph only. Match the existing voice, tense and point of view.
Do not repeat text that is already in the story."#;

const POLISH_STORY_TEMPLATE: &str = r#"Proofread the following passage.

{{ content }}

Fix spelling, grammar and punctuation. Keep the author's wording and style
wherever possible. Output only the corrected passage."#;

#[derive(Debug, Clone, Serialize)]
struct StoryIdeaRequest {
    theme: String,
    requirements: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
struct ContinueStoryRequest {
    title: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct PolishStoryRequest {
    content: String,
}

/// Renders the writing-task prompts.
pub struct PromptRenderer {
    env: Environment<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            ("story_idea", STORY_IDEA_TEMPLATE),
            ("continue_story", CONTINUE_STORY_TEMPLATE),
            ("polish_story", POLISH_STORY_TEMPLATE),
        ] {
            env.add_template(name, source).map_err(template_error)?;
        }
        Ok(Self { env })
    }

    pub fn story_idea(&self, theme: &str) -> Result<String> {
        self.render(
            "story_idea",
            StoryIdeaRequest {
                theme: theme.trim().to_string(),
                requirements: vec![
                    "Keep the premise under 120 words",
                    "Introduce a protagonist and a central conflict",
                    "Avoid well-known plots and characters",
                ],
            },
        )
    }

    pub fn continue_story(&self, title: &str, content: &str) -> Result<String> {
        self.render(
            "continue_story",
            ContinueStoryRequest {
                title: title.trim().to_string(),
                content: tail_chars(content.trim(), MAX_STORY_CHARS).to_string(),
            },
        )
    }

    pub fn polish_story(&self, content: &str) -> Result<String> {
        self.render(
            "polish_story",
            PolishStoryRequest {
                content: head_chars(content.trim(), MAX_STORY_CHARS).to_string(),
            },
        )
    }

    fn render<S: Serialize>(&self, name: &str, request: S) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(request))
            .map_err(template_error)
    }
}

fn template_error(err: minijinja::Error) -> StorywellError {
    StorywellError::internal(format!("Failed to render prompt: {}", err))
}

/// The first `max` characters of `text`.
fn head_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The last `max` characters of `text`; a continuation only needs the end.
fn tail_chars(text: &str, max: usize) -> &str {
    let total = text.chars().count();
    if total <= max {
        return text;
    }
    match text.char_indices().nth(total - max) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
