//! Usage quota for restricted deployments.
//!
//! # Module Structure
//!
//! - `model`: The persisted counter (`ClientQuota`) and its constants
//! - `store`: Repository trait for the durable counter (`QuotaStore`)
//! - `tracker`: Process-local quota state backed by a store (`QuotaTracker`)

mod model;
mod store;
mod tracker;

pub use model::{ClientQuota, QUOTA_LIMIT, QUOTA_STORAGE_KEY};
pub use store::QuotaStore;
pub use tracker::QuotaTracker;
