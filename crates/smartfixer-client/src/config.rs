//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the app starts with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use smartfixer_net::ClientSettings;
use smartfixer_shared::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_API_BASE_URL, REQUEST_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Diagnosis backend base URL.
    /// Env: `SMARTFIXER_API_URL`
    /// Default: `https://smartfixer-api.onrender.com/`
    pub api_base_url: String,

    /// Directory holding the database and preference file.
    /// Env: `SMARTFIXER_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Env: `SMARTFIXER_CONNECT_TIMEOUT_SECS`
    /// Default: 30
    pub connect_timeout: Duration,

    /// Env: `SMARTFIXER_REQUEST_TIMEOUT_SECS`
    /// Default: 60
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: None,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SMARTFIXER_API_URL") {
            if url.trim().is_empty() {
                tracing::warn!("Empty SMARTFIXER_API_URL, using default");
            } else {
                config.api_base_url = url;
            }
        }

        if let Some(dir) = lookup("SMARTFIXER_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(secs) = parse_secs(&lookup, "SMARTFIXER_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = secs;
        }

        if let Some(secs) = parse_secs(&lookup, "SMARTFIXER_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = secs;
        }

        config
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        }
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            tracing::warn!(key, value = %raw, "Invalid timeout, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "https://smartfixer-api.onrender.com/");
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SMARTFIXER_API_URL", "http://localhost:8000"),
            ("SMARTFIXER_DATA_DIR", "/tmp/smartfixer"),
            ("SMARTFIXER_REQUEST_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/smartfixer")));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SMARTFIXER_API_URL", "  "),
            ("SMARTFIXER_CONNECT_TIMEOUT_SECS", "soon"),
            ("SMARTFIXER_REQUEST_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_client_settings_carry_timeouts() {
        let settings = ClientConfig::default().client_settings();
        assert_eq!(settings.connect_timeout, Duration::from_secs(30));
        assert_eq!(settings.base_url, DEFAULT_API_BASE_URL);
    }
}
