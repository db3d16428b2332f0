// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Authentication-layer failures are always raised as errors. Any other
//! HTTP status from the authenticated wrapper is handed back as a response
//! so the caller can branch on it; only the typed `api` layer turns those
//! into [`ClientError::Api`].

/// Errors surfaced by the smart-card client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No refresh token was available when the backend asked for one.
    #[error("unauthenticated: not logged in or the session has expired")]
    Unauthenticated,

    /// The refresh endpoint rejected the stored refresh token.
    #[error("refresh invalid: the refresh token was rejected")]
    RefreshInvalid,

    /// The retried request was still unauthorized with a fresh access token.
    #[error("could not authenticate after refresh")]
    PostRefreshAuthFailure,

    /// The session is valid but lacks permission for the resource.
    #[error("forbidden: no permission to access this resource")]
    Forbidden,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend returned a non-success status to a typed API call.
    #[error("backend error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode backend response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// True for the terminal authentication failures that require a new login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated
                | ClientError::RefreshInvalid
                | ClientError::PostRefreshAuthFailure
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Forbidden => Some(403),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type alias for client calls
pub type Result<T> = std::result::Result<T, ClientError>;
