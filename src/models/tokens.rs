// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token pair and the auth endpoint wire types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access + refresh bearer tokens, always stored and cleared together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub token: &'a str,
}

/// Successful refresh response. Extra fields from the backend are ignored.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<RefreshResponse> for TokenPair {
    fn from(resp: RefreshResponse) -> Self {
        TokenPair::new(resp.access_token, resp.refresh_token)
    }
}

/// Body of `POST /auth/logout`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest<'a> {
    pub access_token: &'a str,
    pub refresh_token: &'a str,
}
