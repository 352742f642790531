//! Chat domain module.
//!
//! A `ChatSession` processes one user turn at a time through the shared
//! access gate and the assistant gateway.

mod session;

pub use session::{ChatSession, IgnoredReason, PendingState, SubmitResult};
