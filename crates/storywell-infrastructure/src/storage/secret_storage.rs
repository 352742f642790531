//! Secret configuration file storage.
//!
//! Read-only access to `secret.json`, which holds the provider API key.

use crate::paths::{PathError, StorywellPaths};
use std::fs;
use std::path::{Path, PathBuf};
use storywell_core::StorywellError;
use storywell_core::config::{GeminiConfig, SecretConfig};

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// The file exists but has no usable Gemini API key.
    MissingApiKey(PathBuf),
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Secret file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::MissingApiKey(path) => {
                write!(f, "No Gemini api_key configured in {}", path.display())
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

impl From<SecretStorageError> for StorywellError {
    fn from(e: SecretStorageError) -> Self {
        match e {
            SecretStorageError::NotFound(path) => {
                StorywellError::not_found("secret file", path.display().to_string())
            }
            SecretStorageError::IoError(io) => io.into(),
            SecretStorageError::ParseError(json) => json.into(),
            missing @ SecretStorageError::MissingApiKey(_) => {
                StorywellError::Security(missing.to_string())
            }
        }
    }
}

/// Storage for `secret.json`.
///
/// Does NOT:
/// - Write or modify secret files (read-only)
/// - Validate API keys against the provider
///
/// # Security Note
///
/// This storage reads plaintext JSON. Error messages carry the file path,
/// never the key.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn new(paths: &StorywellPaths) -> Result<Self, PathError> {
        Ok(Self {
            path: paths.secret_file()?,
        })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and parses the secret file.
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Loads the Gemini section, requiring a non-empty API key.
    pub fn load_gemini(&self) -> Result<GeminiConfig, SecretStorageError> {
        self.load()?
            .gemini
            .filter(|gemini| !gemini.api_key.trim().is_empty())
            .ok_or_else(|| SecretStorageError::MissingApiKey(self.path.clone()))
    }
}
