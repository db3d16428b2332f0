// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed wrappers over the backend REST endpoints.
//!
//! Authenticated endpoints go through [`AuthClient::send`]; public catalog,
//! portfolio, registration and contact endpoints are plain unauthenticated
//! calls. Both decode the
//! backend's `{code, mess, result}` envelope and turn non-success statuses
//! into [`ClientError::Api`].

mod auth;
mod cards;
mod mail;
mod orders;
mod portfolio;
mod users;

pub use cards::CARDS_PER_PAGE;
pub use portfolio::Portfolio;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::models::{ApiErrorBody, ApiResponse};
use crate::services::{AuthClient, AuthRequest};

/// Smart-card backend API.
#[derive(Debug, Clone)]
pub struct SmartCardApi {
    client: AuthClient,
}

impl SmartCardApi {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    async fn authed<T: DeserializeOwned>(&self, request: AuthRequest) -> Result<T> {
        let response = self.client.send(&request).await?;
        decode_result(response).await
    }

    async fn authed_unit(&self, request: AuthRequest) -> Result<()> {
        let response = self.client.send(&request).await?;
        check_status(response).await?;
        Ok(())
    }

    async fn public<T: DeserializeOwned>(&self, request: AuthRequest) -> Result<T> {
        let response = self.client.public(&request).await?;
        decode_result(response).await
    }

    async fn public_unit(&self, request: AuthRequest) -> Result<()> {
        let response = self.client.public(&request).await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Fail with [`ClientError::Api`] unless the response is a success.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.to_string()
            } else {
                trimmed.to_string()
            }
        });

    tracing::debug!(status = status.as_u16(), message = %message, "Backend returned error");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Check status and unwrap the `result` field of the envelope.
pub(crate) async fn decode_result<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
    Ok(envelope.result)
}
