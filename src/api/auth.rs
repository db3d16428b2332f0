// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::Result;
use crate::models::LogoutRequest;
use crate::services::AuthRequest;

use super::{check_status, SmartCardApi};

impl SmartCardApi {
    /// Revoke the stored session on the backend and forget it locally.
    ///
    /// Does nothing when no complete pair is stored. Tokens are only cleared
    /// once the backend accepted the logout.
    pub async fn logout(&self) -> Result<()> {
        let tokens = self.client.tokens();
        let Some(pair) = tokens.pair() else {
            tracing::debug!("Logout requested without a stored session");
            return Ok(());
        };

        let request = AuthRequest::post("/auth/logout").json(&LogoutRequest {
            access_token: &pair.access_token,
            refresh_token: &pair.refresh_token,
        })?;
        let response = self.client.public(&request).await?;
        check_status(response).await?;

        tokens.clear_tokens();
        tracing::info!("Logged out");
        Ok(())
    }
}
