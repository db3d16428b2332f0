// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! The backend origin is fixed for the lifetime of the process; it is read
//! once at startup and never changed afterwards.

use std::env;
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TOKEN_FILE: &str = ".smartcard/tokens.json";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, without trailing slash
    pub api_base_url: String,
    /// Where the token pair is persisted between runs
    pub token_file: PathBuf,
    /// Login entry point users are sent to after a forced logout
    pub login_path: String,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_base_url = normalize_base_url(
            &env::var("SMARTCARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        )?;

        Ok(Self {
            api_base_url,
            token_file: env::var("SMARTCARD_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE)),
            login_path: env::var("SMARTCARD_LOGIN_PATH")
                .unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string()),
            user_agent: env::var("SMARTCARD_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
        })
    }

    /// Config pointing at a specific backend, everything else defaulted.
    pub fn for_base_url(url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(url)?,
            ..Self::default()
        })
    }
}

fn default_user_agent() -> String {
    format!("smartcard-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            name: "SMARTCARD_API_URL",
            reason: format!("expected an http(s) URL, got {:?}", raw),
        });
    }
    Ok(url.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
