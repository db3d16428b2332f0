// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use smartcard_client::config::Config;
use smartcard_client::services::{LoginRedirect, TokenStore};
use smartcard_client::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

/// Create an access token expiring at `exp` (Unix seconds).
#[allow(dead_code)]
pub fn jwt_expiring_at(exp: i64) -> String {
    let claims = Claims {
        sub: "customer@example.com".to_string(),
        exp,
        iat: exp - 3600,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"backend_signing_key_not_known_to_client"),
    )
    .expect("Failed to create JWT")
}

/// Access token valid for another hour.
#[allow(dead_code)]
pub fn fresh_jwt() -> String {
    jwt_expiring_at(chrono::Utc::now().timestamp() + 3600)
}

/// Access token that expired an hour ago.
#[allow(dead_code)]
pub fn expired_jwt() -> String {
    jwt_expiring_at(chrono::Utc::now().timestamp() - 3600)
}

/// Records forced logouts instead of navigating anywhere.
#[derive(Default)]
pub struct CountingRedirect {
    count: AtomicUsize,
    last_path: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl CountingRedirect {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last_path(&self) -> Option<String> {
        self.last_path.lock().unwrap().clone()
    }
}

impl LoginRedirect for CountingRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last_path.lock().unwrap() = Some(login_path.to_string());
    }
}

pub struct TestClient {
    pub server: MockServer,
    pub state: AppState,
    pub tokens: TokenStore,
    pub redirect: Arc<CountingRedirect>,
}

#[allow(dead_code)]
impl TestClient {
    /// Number of requests the fake backend has seen so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }

    /// Number of requests seen for one path.
    pub async fn requests_to(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }
}

/// Client state wired to a fresh fake backend with an in-memory token store.
pub async fn setup() -> TestClient {
    let server = MockServer::start().await;
    let config = Config::for_base_url(&server.uri()).expect("mock server URI should be valid");
    let tokens = TokenStore::in_memory();
    let redirect = Arc::new(CountingRedirect::default());

    let state = AppState::new(config, tokens.clone())
        .expect("Failed to build client")
        .with_redirect(redirect.clone());

    TestClient {
        server,
        state,
        tokens,
        redirect,
    }
}
