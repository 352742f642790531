//! Application layer for storywell.
//!
//! Coordinates the domain gate with the file-backed stores and the Gemini
//! gateway. Front-ends only talk to [`WritingAssistantService`].

pub mod prompts;
pub mod writing_assistant_service;

pub use prompts::PromptRenderer;
pub use writing_assistant_service::{AssistantStatus, WritingAssistantService};
