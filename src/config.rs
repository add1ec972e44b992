//! Configuration parsed from environment variables.
//!
//! Every setting has a typed default; only malformed values are errors.
//! Parsing goes through a lookup function so tests never touch the process
//! environment.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::messages::Lang;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_FILE: &str = "bubbles.json";
pub const DEFAULT_SEARCH_URL: &str = "https://api.duckduckgo.com/";
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("unsupported language {0:?} (expected 'en' or 'zh')")]
    UnknownLang(String),
}

/// Settings for the resource fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub data_file: PathBuf,
    pub search: SearchConfig,
    pub lang: Lang,
}

impl ServerConfig {
    /// Build server config from the process environment.
    ///
    /// - `BUBBLES_BIND`: listen address (default `0.0.0.0`)
    /// - `PORT`: listen port (default 5000)
    /// - `BUBBLES_DATA_FILE`: JSON store path (default `bubbles.json`)
    /// - `BUBBLES_SEARCH_URL`, `BUBBLES_SEARCH_TIMEOUT_SECS`, `BUBBLES_SEARCH_LIMIT`
    /// - `BUBBLES_LANG`: `en` (default) or `zh`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = parse_or(&lookup, "BUBBLES_BIND", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let data_file = lookup("BUBBLES_DATA_FILE").map_or_else(|| PathBuf::from(DEFAULT_DATA_FILE), PathBuf::from);

        let base_url = lookup("BUBBLES_SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());
        let timeout_secs = parse_or(&lookup, "BUBBLES_SEARCH_TIMEOUT_SECS", DEFAULT_SEARCH_TIMEOUT_SECS)?;
        let limit = parse_or(&lookup, "BUBBLES_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT)?;
        let search = SearchConfig { base_url, timeout: Duration::from_secs(timeout_secs), limit };

        let lang = lang_from_lookup(&lookup)?;

        Ok(Self { bind, port, data_file, search, lang })
    }
}

/// Language from `BUBBLES_LANG`, English when unset.
///
/// # Errors
///
/// Returns an error for an unrecognized language tag.
pub fn lang_from_env() -> Result<Lang, ConfigError> {
    lang_from_lookup(&|key: &str| std::env::var(key).ok())
}

fn lang_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Lang, ConfigError> {
    match lookup("BUBBLES_LANG") {
        None => Ok(Lang::default()),
        Some(raw) => Lang::from_tag(&raw).ok_or(ConfigError::UnknownLang(raw)),
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| invalid(key, &raw)),
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid { key, value: value.to_string() }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
