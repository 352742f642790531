//! Client quota model.

use serde::{Deserialize, Serialize};

/// Number of successful AI responses a client may consume in restricted mode.
pub const QUOTA_LIMIT: u32 = 3;

/// Key under which the usage count is kept in client-local storage.
pub const QUOTA_STORAGE_KEY: &str = "storywell.ai_usage_count";

/// Usage counter for one client installation.
///
/// `count` only ever grows; there is no reset operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientQuota {
    pub count: u32,
    pub limit: u32,
}

impl ClientQuota {
    /// Creates a quota with the standard limit.
    pub fn with_count(count: u32) -> Self {
        Self {
            count,
            limit: QUOTA_LIMIT,
        }
    }

    /// Parses the stored decimal string; absent or unparsable values count as 0.
    pub fn from_stored(raw: Option<&str>) -> Self {
        let count = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(0);
        Self::with_count(count)
    }

    /// The value written to storage.
    pub fn to_stored(&self) -> String {
        self.count.to_string()
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.limit
    }

    /// The quota after one more successful call.
    pub fn incremented(&self) -> Self {
        Self {
            count: self.count.saturating_add(1),
            limit: self.limit,
        }
    }
}

impl Default for ClientQuota {
    fn default() -> Self {
        Self::with_count(0)
    }
}
