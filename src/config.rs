//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::render::DEFAULT_FLOWER_SIZE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server origin without a trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
    /// Initial global flower size for rendering and hit-testing.
    pub flower_size: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), timeouts: Timeouts::default(), flower_size: DEFAULT_FLOWER_SIZE }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `GARDENS_BASE_URL`: default `http://localhost:8080`
    /// - `GARDENS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `GARDENS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `GARDENS_FLOWER_SIZE`: default 40
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or the flower size is
    /// not a finite positive number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            std::env::var("GARDENS_BASE_URL")
                .ok()
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL),
        )?;
        let timeouts = Timeouts {
            request_secs: env_parse("GARDENS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("GARDENS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let flower_size = match std::env::var("GARDENS_FLOWER_SIZE") {
            Ok(raw) => parse_flower_size(&raw)?,
            Err(_) => DEFAULT_FLOWER_SIZE,
        };
        Ok(Self { base_url, timeouts, flower_size })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Trim a trailing slash and require an http(s) scheme.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for any other scheme.
pub fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::Invalid { var: "GARDENS_BASE_URL", value: raw.to_owned(), reason: "expected http:// or https://" })
    }
}

fn parse_flower_size(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(size) if size.is_finite() && size > 0.0 => Ok(size),
        _ => Err(ConfigError::Invalid {
            var: "GARDENS_FLOWER_SIZE",
            value: raw.to_owned(),
            reason: "expected a positive number",
        }),
    }
}
