//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_AUTH_SCHEME: &str = "Token";
pub const DEFAULT_SESSION_FILE: &str = ".blogfront-session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL is not an `http://` or `https://` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The authorization scheme is empty or contains whitespace.
    #[error("invalid auth scheme: {0:?}")]
    InvalidAuthScheme(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash, e.g. `http://127.0.0.1:8000/api`.
    pub base_url: String,
    /// Prefix placed before the credential in the `Authorization` header.
    pub auth_scheme: String,
    /// Where [`crate::session::FileSessionStore`] keeps the credential.
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_owned(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BLOG_API_BASE_URL`: default `http://127.0.0.1:8000/api`
    /// - `BLOG_AUTH_SCHEME`: default `Token`
    /// - `BLOG_SESSION_FILE`: default `.blogfront-session.json`
    /// - `BLOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BLOG_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or auth scheme is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. `from_env` passes the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or auth scheme is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(lookup("BLOG_API_BASE_URL").as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let auth_scheme = parse_auth_scheme(lookup("BLOG_AUTH_SCHEME").as_deref())?;
        let session_file = lookup("BLOG_SESSION_FILE")
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);
        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("BLOG_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("BLOG_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, auth_scheme, session_file, timeouts })
    }
}

/// Trim whitespace and trailing slashes, and require an HTTP(S) scheme.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for anything that is not an
/// `http://` or `https://` URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_owned())),
    }
}

fn parse_auth_scheme(raw: Option<&str>) -> Result<String, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_AUTH_SCHEME.to_owned());
    };
    let scheme = raw.trim();
    if scheme.is_empty() || scheme.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidAuthScheme(raw.to_owned()));
    }
    Ok(scheme.to_owned())
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
