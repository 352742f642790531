//! URL authorization for AI features.

use super::mode::DeploymentMode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Inputs to an authorization decision.
///
/// `authorized_url` comes from the settings store and may be empty; `mode`
/// comes from the deployment and is never persisted with the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    pub authorized_url: String,
    pub mode: DeploymentMode,
}

impl AuthorizationConfig {
    pub fn new(authorized_url: impl Into<String>, mode: DeploymentMode) -> Self {
        Self {
            authorized_url: authorized_url.into(),
            mode,
        }
    }

    /// Owner-mode config with no authorized URL.
    pub fn owner() -> Self {
        Self::new(String::new(), DeploymentMode::Owner)
    }
}

/// Decides whether the current origin may invoke AI features.
///
/// Stateless: every decision is made from the arguments alone, so a settings
/// change takes effect on the very next call.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlAuthorizer;

impl UrlAuthorizer {
    pub fn new() -> Self {
        Self
    }

    /// Returns whether `current_url` is authorized under `config`.
    ///
    /// - `Owner` mode: always `true`.
    /// - `Restricted` mode with an empty authorized URL: always `false`.
    /// - Otherwise `true` iff the normalized origin of `current_url` equals the
    ///   normalized authorized URL, or the lower-cased `current_url` starts
    ///   with it.
    pub fn is_authorized(&self, current_url: &str, config: &AuthorizationConfig) -> bool {
        if !config.mode.is_restricted() {
            return true;
        }

        let authorized = normalize(&config.authorized_url);
        if authorized.is_empty() {
            return false;
        }

        let origin = normalize(&origin_of(current_url));
        if origin == authorized {
            return true;
        }

        current_url.trim().to_lowercase().starts_with(&authorized)
    }
}

/// Strips surrounding whitespace and every trailing `/`, then lower-cases.
fn normalize(value: &str) -> String {
    value.trim().trim_end_matches('/').to_lowercase()
}

/// `scheme://host[:port]` for absolute URLs with a host, else the raw input.
fn origin_of(current_url: &str) -> String {
    let trimmed = current_url.trim();
    match Url::parse(trimmed) {
        Ok(url) if url.has_host() => {
            let origin = url.origin();
            if origin.is_tuple() {
                origin.ascii_serialization()
            } else {
                trimmed.to_string()
            }
        }
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted(url: &str) -> AuthorizationConfig {
        AuthorizationConfig::new(url, DeploymentMode::Restricted)
    }

    #[test]
    fn test_owner_mode_is_always_authorized() {
        let authorizer = UrlAuthorizer::new();
        assert!(authorizer.is_authorized("https://anything.test", &AuthorizationConfig::owner()));
        assert!(authorizer.is_authorized(
            "",
            &AuthorizationConfig::new("https://other.test", DeploymentMode::Owner)
        ));
    }

    #[test]
    fn test_restricted_with_empty_url_fails_closed() {
        let authorizer = UrlAuthorizer::new();
        assert!(!authorizer.is_authorized("https://app.example.com", &restricted("")));
        assert!(!authorizer.is_authorized("https://app.example.com", &restricted("   ")));
        assert!(!authorizer.is_authorized("", &restricted("")));
    }

    #[test]
    fn test_origin_match_ignores_case_and_trailing_slash() {
        let authorizer = UrlAuthorizer::new();
        let config = restricted("https://app.example.com");
        assert!(authorizer.is_authorized("https://APP.EXAMPLE.COM/", &config));
        assert!(authorizer.is_authorized("https://app.example.com/stories/42?x=1", &config));
    }

    #[test]
    fn test_authorized_url_trailing_slashes_are_stripped() {
        let authorizer = UrlAuthorizer::new();
        let config = restricted("HTTPS://App.Example.com///");
        assert!(authorizer.is_authorized("https://app.example.com", &config));
    }

    #[test]
    fn test_prefix_match_tolerates_path_on_authorized_value() {
        let authorizer = UrlAuthorizer::new();
        let config = restricted("https://host.test/app/");
        assert!(authorizer.is_authorized("https://host.test/app/editor", &config));
        assert!(!authorizer.is_authorized("https://host.test/other", &config));
    }

    #[test]
    fn test_different_origin_is_rejected() {
        let authorizer = UrlAuthorizer::new();
        let config = restricted("https://app.example.com");
        assert!(!authorizer.is_authorized("https://evil.example.org/", &config));
        assert!(!authorizer.is_authorized("http://app.example.com/", &config));
    }

    #[test]
    fn test_non_default_port_is_part_of_origin() {
        let authorizer = UrlAuthorizer::new();
        assert!(authorizer.is_authorized(
            "http://localhost:5173/write",
            &restricted("http://localhost:5173")
        ));
        assert!(!authorizer.is_authorized(
            "http://localhost:8080/",
            &restricted("http://localhost:5173")
        ));
    }

    #[test]
    fn test_unparsable_current_url_compares_literally() {
        let authorizer = UrlAuthorizer::new();
        assert!(authorizer.is_authorized("My-Host/", &restricted("my-host")));
        assert!(!authorizer.is_authorized("not a url", &restricted("https://app.example.com")));
    }
}
