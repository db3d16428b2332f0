// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session validity check.
//!
//! Answers "is the stored session usable right now?" from the access
//! token's `exp` claim alone, and only goes to the network when that claim
//! has already passed.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

use crate::services::auth_client::AuthClient;
use crate::time_utils::{is_in_future, unix_now};

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: f64,
}

/// Read the `exp` claim (seconds since epoch) from the payload segment of a
/// JWT. The header and signature are not inspected.
///
/// Returns `None` for anything that does not carry a base64url JSON payload
/// with a numeric `exp`.
pub fn decode_expiry(token: &str) -> Option<f64> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: ExpiryClaims = serde_json::from_slice(&decoded).ok()?;

    claims.exp.is_finite().then_some(claims.exp)
}

/// Proactive session check built on the shared [`AuthClient`].
#[derive(Debug, Clone)]
pub struct SessionGuard {
    client: AuthClient,
}

impl SessionGuard {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    /// Whether the current session can be used, refreshing it if the access
    /// token has expired. Never fails: every failure path yields `false`.
    pub async fn ensure_session(&self) -> bool {
        self.ensure_session_at(unix_now()).await
    }

    /// [`ensure_session`](Self::ensure_session) evaluated at `now` (Unix seconds).
    pub async fn ensure_session_at(&self, now: i64) -> bool {
        let tokens = self.client.tokens();

        let access_token = tokens.get_access_token().filter(|t| !t.is_empty());
        let refresh_token = tokens.get_refresh_token().filter(|t| !t.is_empty());
        let (Some(access_token), Some(refresh_token)) = (access_token, refresh_token) else {
            tracing::debug!("No stored session");
            return false;
        };

        let Some(expires_at) = decode_expiry(&access_token) else {
            tracing::warn!("Stored access token is not a valid JWT, clearing session");
            tokens.clear_tokens();
            return false;
        };

        if is_in_future(expires_at, now) {
            tracing::debug!(expires_at, "Session still valid");
            return true;
        }

        tracing::info!(expires_at, "Access token expired, refreshing");
        match self.client.refresh(&refresh_token).await {
            Ok(pair) => {
                tokens.store_pair(&pair);
                tracing::info!("Session refreshed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh failed, clearing session");
                tokens.clear_tokens();
                false
            }
        }
    }
}
