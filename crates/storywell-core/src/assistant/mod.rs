//! Assistant domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ChatMessage`)
//! - `outcome`: Result of a single provider call (`GenerationOutcome`, `AssistantErrorKind`)
//! - `gateway`: The provider seam (`AssistantGateway`) and its request types
//! - `access`: The authorization/quota gate shared by every AI call (`AssistantAccess`)

mod access;
mod gateway;
mod message;
mod outcome;

pub use access::{Admission, AssistantAccess};
pub use gateway::{AssistantGateway, GenerationOptions, GenerationRequest};
pub use message::{ChatMessage, MessageRole};
pub use outcome::{AssistantErrorKind, GenerationOutcome};
