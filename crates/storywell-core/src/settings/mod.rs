//! Settings domain module.
//!
//! Only the authorized URL lives here; its value feeds every authorization
//! decision.

mod repository;
mod service;

pub use repository::SettingsRepository;
pub use service::SettingsService;
