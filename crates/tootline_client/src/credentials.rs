//! Credential resolution for a Mastodon server.

use derive_getters::Getters;
use tootline_error::{ConfigError, TootlineResult};

/// Base URL and OAuth2 access token for one Mastodon account.
///
/// Credentials are resolved internally by the dispatcher on every call, not
/// passed by operation modules.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Credentials {
    /// Server base URL without a trailing slash.
    base_url: String,
    /// OAuth2 bearer token.
    access_token: String,
}

impl Credentials {
    /// Create credentials, normalizing away any trailing slash on the base URL.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Fail with a configuration error when the base URL or token is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use tootline_client::Credentials;
    ///
    /// let incomplete = Credentials::new("https://mastodon.example", "");
    /// assert!(incomplete.validate().is_err());
    /// ```
    pub fn validate(&self) -> TootlineResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::new(
                "No Mastodon base URL configured; check the selected credential",
            )
            .into());
        }
        if self.access_token.is_empty() {
            return Err(ConfigError::new(
                "No valid access token found; reconnect your Mastodon account and ensure the credential is not expired",
            )
            .into());
        }
        Ok(())
    }

    /// Resolve `endpoint` against the base URL.
    ///
    /// Absolute `http(s)` endpoints pass through unchanged so helpers that
    /// already hold a full URL (media polling, pagination links) can reuse
    /// the dispatcher.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            return endpoint.to_string();
        }
        let separator = if endpoint.starts_with('/') { "" } else { "/" };
        format!("{}{}{}", self.base_url, separator, endpoint)
    }
}
