//! Client configuration.
//!
//! # Design
//! The base URL is parsed and validated once, here, so a bad value fails at
//! construction rather than on the first request. The environment is only
//! consulted through `ClientConfig::from_env`, which binaries call at their
//! outermost layer; everything below takes an explicit `ClientConfig`.

use url::Url;

use crate::error::ApiError;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Base URL used when `BASE_URL` is unset or empty.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1/";

/// Validated configuration for an `AccountClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
}

impl ClientConfig {
    /// Parse `base_url`. It must be absolute and able to act as a base for
    /// relative paths. A path without a trailing `/` gets one, so relative
    /// joins land under its last segment.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut url = Url::parse(base_url).map_err(|e| ApiError::MalformedUrl {
            input: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ApiError::MalformedUrl {
                input: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { base_url: url })
    }

    /// Resolve the base URL from `BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, ApiError> {
        let value = std::env::var(BASE_URL_ENV).ok();
        Self::new(resolve_base_url(value.as_deref()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn resolve_base_url(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_BASE_URL,
    }
}
