//! Consumer configuration.
//!
//! The gateway URL is fixed at construction and never changes afterwards.
//! `ConsumerConfig` can be built in code, deserialized from whatever format
//! the host application uses, or read from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Public gateway used when no URL is configured.
pub const DEFAULT_REST_URL: &str = "https://free-bch.fullstack.cash";

pub const REST_URL_ENV: &str = "BCH_CONSUMER_REST_URL";
pub const TIMEOUT_ENV: &str = "BCH_CONSUMER_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerConfig {
    /// Gateway base URL. `None` or blank means `DEFAULT_REST_URL`.
    #[serde(default, alias = "restURL")]
    pub rest_url: Option<String>,

    /// Overall per-request timeout in milliseconds, applied by the default
    /// transport. `0` is treated as unset.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ConsumerConfig {
    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        // round sub-millisecond values up so they don't read back as unset
        self.timeout_ms = Some(if timeout.is_zero() { 0 } else { ms.max(1) });
        self
    }

    /// Read `BCH_CONSUMER_REST_URL` and `BCH_CONSUMER_TIMEOUT_MS`. Unset
    /// variables leave the field empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let rest_url = lookup(REST_URL_ENV).filter(|url| !url.trim().is_empty());
        let timeout_ms = match lookup(TIMEOUT_ENV) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                var: TIMEOUT_ENV,
                value: raw,
            })?),
            None => None,
        };
        Ok(Self {
            rest_url,
            timeout_ms,
        })
    }

    /// The configured URL with surrounding whitespace and trailing `/`
    /// removed, or the public gateway when nothing is left.
    pub fn rest_url(&self) -> &str {
        let url = self
            .rest_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .unwrap_or_default();
        if url.is_empty() {
            DEFAULT_REST_URL
        } else {
            url
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }
}
