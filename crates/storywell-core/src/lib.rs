//! Domain core for Storywell's AI writing assistant.
//!
//! Everything here is I/O-free: storage, settings, and the AI provider are
//! reached through the traits at the seams ([`quota::QuotaStore`],
//! [`settings::SettingsRepository`], [`assistant::AssistantGateway`]).

pub mod assistant;
pub mod authorization;
pub mod chat;
pub mod config;
pub mod error;
pub mod quota;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export common error type
pub use error::StorywellError;
