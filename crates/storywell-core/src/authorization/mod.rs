//! Authorization domain module.
//!
//! Decides whether the running origin may use AI features at all.
//!
//! # Module Structure
//!
//! - `mode`: How the deployment is trusted (`DeploymentMode`)
//! - `authorizer`: Origin matching against the configured authorized URL (`UrlAuthorizer`)

mod authorizer;
mod mode;

pub use authorizer::{AuthorizationConfig, UrlAuthorizer};
pub use mode::{DEFAULT_SHARED_HOST_MARKER, DeploymentMode};
