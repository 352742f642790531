pub mod config_service;
pub mod local_storage;
pub mod paths;
pub mod storage;
pub mod toml_settings_repository;

pub use crate::config_service::ConfigService;
pub use crate::local_storage::{LocalStorage, LocalStorageQuotaStore};
pub use crate::paths::StorywellPaths;
pub use crate::storage::SecretStorage;
pub use crate::toml_settings_repository::TomlSettingsRepository;
