// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated HTTP client for the smart-card backend.
//!
//! Handles:
//! - Bearer authentication from the shared [`TokenStore`]
//! - One refresh-and-retry cycle when the backend answers 401
//! - Forced logout when the session cannot be recovered
//! - JSON vs multipart content-type selection
//!
//! Every status other than 401/403 is returned to the caller untouched.
//! Concurrent calls that hit 401 at the same time each run their own refresh
//! cycle; whichever refresh lands last wins in the store.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{RefreshRequest, RefreshResponse, TokenPair};
use crate::services::token_store::TokenStore;

/// Backend endpoint that exchanges a refresh token for a new pair.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Side effect run when a session is forcibly ended.
///
/// In a browser this navigates to the login page; here it is whatever the
/// embedding application wants to happen.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self, login_path: &str);
}

/// Default redirect: records that the user must log in again.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::warn!(login_path, "Session ended, login required");
    }
}

/// One part of a multipart form.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

/// Binary form payload.
///
/// Kept as plain data so the same payload can be sent again on retry; a
/// fresh `reqwest::multipart::Form` is built for every attempt.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    parts: Vec<FormPart>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    fn to_multipart(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    let file = reqwest::multipart::Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime_type)
                        .map_err(|e| {
                            ClientError::InvalidRequest(format!(
                                "invalid MIME type {:?}: {}",
                                mime_type, e
                            ))
                        })?;
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

/// Request body: either JSON or a binary form.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(FormPayload),
}

/// The logical request being wrapped. Constructed per call, never persisted.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<RequestBody>,
}

impl AuthRequest {
    /// `path` is relative to the backend origin, e.g. `/users/me`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add an extra header. Caller headers win over the generated
    /// `Authorization` header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Attach a binary form body.
    pub fn form(mut self, form: FormPayload) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    fn is_form(&self) -> bool {
        matches!(self.body, Some(RequestBody::Form(_)))
    }

    /// Final outgoing headers for an attempt with `bearer` (if any).
    ///
    /// Form bodies never carry an explicit content-type so the transport can
    /// add its multipart boundary; everything else is sent as JSON.
    pub fn outgoing_headers(&self, bearer: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(token) = bearer {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ClientError::InvalidRequest("access token is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        headers.extend(self.headers.clone());

        if self.is_form() {
            headers.remove(CONTENT_TYPE);
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(headers)
    }
}

/// HTTP client that authenticates every call and recovers once from an
/// expired access token.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    tokens: TokenStore,
    redirect: Arc<dyn LoginRedirect>,
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Create a client for the configured backend origin.
    pub fn new(config: &Config, tokens: TokenStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            tokens,
            redirect: Arc::new(LogRedirect),
        })
    }

    /// Replace the forced-logout side effect.
    pub fn with_redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL for a backend-relative path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send an authenticated request.
    ///
    /// Returns the raw response for any status except 401 and 403. A 401
    /// triggers at most one refresh followed by one retry; a 403 is never
    /// retried.
    pub async fn send(&self, request: &AuthRequest) -> Result<Response> {
        // An absent token is still sent so the backend answers with 401.
        let access_token = self.tokens.get_access_token().unwrap_or_default();

        let mut response = self.attempt(request, Some(&access_token)).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                "Access token rejected, attempting refresh"
            );
            response = self.recover(request).await?;
        }

        if response.status() == StatusCode::FORBIDDEN {
            tracing::debug!(method = %request.method, path = %request.path, "Request forbidden");
            return Err(ClientError::Forbidden);
        }

        Ok(response)
    }

    /// Send a request without credentials and without recovery.
    ///
    /// Used for the public portfolio and catalog endpoints.
    pub async fn public(&self, request: &AuthRequest) -> Result<Response> {
        self.attempt(request, None).await
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// Talks to the backend directly; does not touch the token store.
    /// Non-success statuses yield [`ClientError::RefreshInvalid`], a body that
    /// does not carry both tokens yields [`ClientError::Decode`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest {
                token: refresh_token,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Token refresh rejected");
            return Err(ClientError::RefreshInvalid);
        }

        let body = response.bytes().await?;
        let refreshed: RefreshResponse = serde_json::from_slice(&body)
            .map_err(|e| ClientError::Decode(format!("refresh response: {}", e)))?;

        Ok(refreshed.into())
    }

    /// 401 recovery: refresh once, store the new pair, retry once.
    async fn recover(&self, request: &AuthRequest) -> Result<Response> {
        let Some(refresh_token) = self
            .tokens
            .get_refresh_token()
            .filter(|t| !t.is_empty())
        else {
            tracing::info!("No refresh token available, clearing session");
            self.tokens.clear_tokens();
            return Err(ClientError::Unauthenticated);
        };

        let pair = match self.refresh(&refresh_token).await {
            Ok(pair) => pair,
            // A network failure says nothing about the refresh token itself.
            Err(ClientError::Transport(e)) => return Err(ClientError::Transport(e)),
            Err(e) => {
                tracing::warn!(error = %e, "Refresh failed, ending session");
                self.force_logout();
                return Err(ClientError::RefreshInvalid);
            }
        };

        self.tokens.store_pair(&pair);
        tracing::info!(path = %request.path, "Access token refreshed, retrying request");

        let retry = self.attempt(request, Some(&pair.access_token)).await?;

        if retry.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %request.path, "Still unauthorized after refresh, ending session");
            self.force_logout();
            return Err(ClientError::PostRefreshAuthFailure);
        }

        Ok(retry)
    }

    async fn attempt(&self, request: &AuthRequest, bearer: Option<&str>) -> Result<Response> {
        let headers = request.outgoing_headers(bearer)?;

        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path))
            .headers(headers);

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.body(serde_json::to_vec(value)?),
            Some(RequestBody::Form(form)) => builder.multipart(form.to_multipart()?),
            None => builder,
        };

        let response = builder.send().await?;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = response.status().as_u16(),
            "Backend responded"
        );
        Ok(response)
    }

    /// Clear the pair and send the user back to the login entry point.
    fn force_logout(&self) {
        self.tokens.clear_tokens();
        self.redirect.redirect_to_login(&self.login_path);
    }
}
