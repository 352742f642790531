//! Deployment mode resolution.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Host fragment that identifies a shared/preview deployment.
pub const DEFAULT_SHARED_HOST_MARKER: &str = "usercontent.goog";

/// How much the current deployment is trusted.
///
/// Resolved once at startup and injected wherever it is needed; nothing
/// downstream re-inspects the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeploymentMode {
    /// Local or self-hosted deployment. No URL authorization, no quota.
    #[default]
    Owner,
    /// Shared/preview deployment. Requires an authorized URL and is quota-limited.
    Restricted,
}

impl DeploymentMode {
    /// Derives the mode from the deployment host.
    ///
    /// The deployment is `Restricted` iff `host` contains `shared_marker`
    /// (case-insensitive). An empty marker never matches.
    pub fn from_host(host: &str, shared_marker: &str) -> Self {
        let marker = shared_marker.trim().to_lowercase();
        if !marker.is_empty() && host.to_lowercase().contains(&marker) {
            Self::Restricted
        } else {
            Self::Owner
        }
    }

    pub fn is_restricted(self) -> bool {
        matches!(self, Self::Restricted)
    }
}
