// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - token storage, session check and authenticated HTTP.

pub mod auth_client;
pub mod session;
pub mod token_store;

pub use auth_client::{
    AuthClient, AuthRequest, FormPart, FormPayload, LogRedirect, LoginRedirect, RequestBody,
};
pub use session::{decode_expiry, SessionGuard};
pub use token_store::{FileStorage, KeyValueStorage, MemoryStorage, TokenStore};
