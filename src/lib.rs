// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Smart-card client: authenticated access to the smart-card backend
//!
//! This crate holds the client side of the smart-card storefront and
//! portfolio service: a durable token store, a proactive session check,
//! an HTTP wrapper that recovers once from an expired access token, and
//! typed calls for the catalog, orders, users and portfolio endpoints.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use api::SmartCardApi;
use config::Config;
use error::Result;
use services::{AuthClient, LoginRedirect, SessionGuard, TokenStore};

/// Shared client state.
///
/// All parts share one [`TokenStore`], so a refresh performed by any of
/// them is immediately visible to the others.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthClient,
    pub session: SessionGuard,
    pub api: SmartCardApi,
}

impl AppState {
    /// Build state on top of an existing token store.
    pub fn new(config: Config, tokens: TokenStore) -> Result<Self> {
        let auth = AuthClient::new(&config, tokens)?;
        Ok(Self::from_client(config, auth))
    }

    /// Build state with tokens persisted at `config.token_file`.
    pub fn from_config(config: Config) -> Result<Self> {
        let tokens = TokenStore::file(&config.token_file);
        Self::new(config, tokens)
    }

    /// Same state with a different forced-logout side effect.
    pub fn with_redirect(self, redirect: Arc<dyn LoginRedirect>) -> Self {
        let auth = self.auth.with_redirect(redirect);
        Self::from_client(self.config, auth)
    }

    fn from_client(config: Config, auth: AuthClient) -> Self {
        Self {
            config,
            session: SessionGuard::new(auth.clone()),
            api: SmartCardApi::new(auth.clone()),
            auth,
        }
    }
}
