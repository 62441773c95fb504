// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! Read once at startup. The only required value is the base URL of the
//! workout service.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the workout service, without a trailing slash
    pub api_url: String,
    /// Directory holding the persisted session token
    pub state_dir: PathBuf,
    /// Per-request timeout for remote calls
    pub http_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:4000".to_string(),
            state_dir: env::temp_dir().join("tracked-test"),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_overrides(None, None)
    }

    /// Like [`Config::from_env`], but explicit values (e.g. command line
    /// flags) take precedence over the environment.
    pub fn from_env_with_overrides(
        api_url: Option<String>,
        state_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_url = match api_url {
            Some(url) => url,
            None => env::var("TRACKED_API_URL")
                .map_err(|_| ConfigError::Missing("TRACKED_API_URL"))?,
        };

        let state_dir = match state_dir {
            Some(dir) => dir,
            None => match env::var("TRACKED_STATE_DIR") {
                Ok(dir) => PathBuf::from(dir),
                Err(_) => default_state_dir()?,
            },
        };

        let http_timeout = match env::var("TRACKED_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("TRACKED_HTTP_TIMEOUT_SECS", raw))?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Self::new(api_url, state_dir, Duration::from_secs(http_timeout))
    }

    /// Build a config from explicit values, normalizing the base URL.
    pub fn new(
        api_url: impl Into<String>,
        state_dir: PathBuf,
        http_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let raw = api_url.into();
        let api_url = raw.trim().trim_end_matches('/').to_string();

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid("TRACKED_API_URL", raw));
        }

        Ok(Self {
            api_url,
            state_dir,
            http_timeout,
        })
    }
}

/// `<config dir>/tracked`, e.g. `~/.config/tracked` on Linux.
fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("tracked"))
        .ok_or(ConfigError::Missing("TRACKED_STATE_DIR"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("TRACKED_API_URL", "https://api.example.com/");
        env::set_var("TRACKED_STATE_DIR", "/tmp/tracked-config-test");
        env::remove_var("TRACKED_HTTP_TIMEOUT_SECS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/tracked-config-test"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::from_env_with_overrides(
            Some("http://127.0.0.1:9000/".to_string()),
            Some(PathBuf::from("/tmp/override")),
        )
        .expect("Config should load");

        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/override"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = Config::new("ftp://example.com", PathBuf::from("/tmp"), Duration::ZERO);
        assert!(matches!(result, Err(ConfigError::Invalid(_, _))));
    }
}
