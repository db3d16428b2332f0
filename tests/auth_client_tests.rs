// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated request policy tests.
//!
//! The fake backend distinguishes attempts by the bearer token they carry,
//! so call counts show exactly how many originals, retries and refreshes
//! were issued.

use serde_json::json;
use smartcard_client::error::ClientError;
use smartcard_client::models::TokenPair;
use smartcard_client::services::{AuthRequest, FormPayload};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::setup;

fn refresh_ok(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "accessToken": access,
        "refreshToken": refresh,
    }))
}

#[tokio::test]
async fn test_success_passes_through_without_refresh() {
    let t = setup().await;
    t.tokens.set_tokens("access-1", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer access-1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"id": 1}})))
        .expect(1)
        .mount(&t.server)
        .await;

    let response = t.state.auth.send(&AuthRequest::get("/users/me")).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(t.requests_to("/auth/refresh").await, 0);
}

#[tokio::test]
async fn test_single_retry_after_refresh() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-old");

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer access-old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"token": "refresh-old"})))
        .respond_with(refresh_ok("access-new", "refresh-new"))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer access-new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"result\":{}}"))
        .expect(1)
        .mount(&t.server)
        .await;

    let response = t.state.auth.send(&AuthRequest::get("/users/me")).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        t.tokens.pair(),
        Some(TokenPair::new("access-new", "refresh-new"))
    );
    assert_eq!(t.requests_to("/users/me").await, 2);
    assert_eq!(t.requests_to("/auth/refresh").await, 1);
    assert_eq!(t.redirect.count(), 0);
}

#[tokio::test]
async fn test_retry_resends_json_body() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-old");

    let order = json!({"cardId": 5, "address": "District 1"});

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer access-old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refresh_ok("access-new", "refresh-new"))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer access-new"))
        .and(body_json(order.clone()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&t.server)
        .await;

    let request = AuthRequest::post("/orders").json(&order).unwrap();
    let response = t.state.auth.send(&request).await.unwrap();

    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn test_double_401_fails_without_third_attempt() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-old");

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refresh_ok("access-new", "refresh-new"))
        .expect(1)
        .mount(&t.server)
        .await;

    let err = t
        .state
        .auth
        .send(&AuthRequest::get("/orders"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::PostRefreshAuthFailure));
    assert_eq!(err.to_string(), "could not authenticate after refresh");
    assert!(t.tokens.get_access_token().is_none());
    assert!(t.tokens.get_refresh_token().is_none());
    assert_eq!(t.requests_to("/orders").await, 2);
    assert_eq!(t.redirect.count(), 1);
    assert_eq!(t.redirect.last_path().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_forbidden_never_refreshes() {
    let t = setup().await;
    t.tokens.set_tokens("access-1", "refresh-1");

    Mock::given(method("DELETE"))
        .and(path("/cards/7"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refresh_ok("x", "y"))
        .expect(0)
        .mount(&t.server)
        .await;

    let err = t
        .state
        .auth
        .send(&AuthRequest::delete("/cards/7"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Forbidden));
    assert!(err.to_string().starts_with("forbidden"));
    // 403 leaves the session alone.
    assert_eq!(t.tokens.pair(), Some(TokenPair::new("access-1", "refresh-1")));
    assert_eq!(t.redirect.count(), 0);
}

#[tokio::test]
async fn test_missing_refresh_token_short_circuits() {
    let t = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refresh_ok("x", "y"))
        .expect(0)
        .mount(&t.server)
        .await;

    let err = t
        .state
        .auth
        .send(&AuthRequest::get("/users/me"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthenticated));
    assert!(err.to_string().starts_with("unauthenticated"));
    assert!(t.tokens.pair().is_none());
    assert_eq!(t.redirect.count(), 0);
}

#[tokio::test]
async fn test_rejected_refresh_forces_logout() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-revoked");

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"mess": "Token revoked"})))
        .expect(1)
        .mount(&t.server)
        .await;

    let err = t
        .state
        .auth
        .send(&AuthRequest::get("/users/me"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::RefreshInvalid));
    assert!(err.is_auth_failure());
    assert!(t.tokens.pair().is_none());
    assert_eq!(t.redirect.count(), 1);
}

#[tokio::test]
async fn test_malformed_refresh_response_forces_logout() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-old");

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "only"})))
        .expect(1)
        .mount(&t.server)
        .await;

    let err = t
        .state
        .auth
        .send(&AuthRequest::get("/users/me"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::RefreshInvalid));
    assert!(t.tokens.pair().is_none());
    assert_eq!(t.redirect.count(), 1);
}

#[tokio::test]
async fn test_other_statuses_are_returned_untouched() {
    let t = setup().await;
    t.tokens.set_tokens("access-1", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/cards/id/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"mess": "Card not found"})))
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&t.server)
        .await;

    let not_found = t
        .state
        .auth
        .send(&AuthRequest::get("/cards/id/404"))
        .await
        .unwrap();
    assert_eq!(not_found.status().as_u16(), 404);
    let body: serde_json::Value = not_found.json().await.unwrap();
    assert_eq!(body["mess"], "Card not found");

    let server_error = t.state.auth.send(&AuthRequest::get("/orders")).await.unwrap();
    assert_eq!(server_error.status().as_u16(), 500);
    assert_eq!(server_error.text().await.unwrap(), "boom");

    assert_eq!(t.requests_to("/auth/refresh").await, 0);
    assert_eq!(t.tokens.pair(), Some(TokenPair::new("access-1", "refresh-1")));
}

#[tokio::test]
async fn test_forbidden_after_refresh_is_reported_as_forbidden() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-old");

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-old"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refresh_ok("access-new", "refresh-new"))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-new"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&t.server)
        .await;

    let err = t
        .state
        .auth
        .send(&AuthRequest::get("/users"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Forbidden));
    // The refreshed pair is kept; the user is just not an admin.
    assert_eq!(
        t.tokens.pair(),
        Some(TokenPair::new("access-new", "refresh-new"))
    );
}

#[tokio::test]
async fn test_form_body_has_no_json_content_type() {
    let t = setup().await;
    t.tokens.set_tokens("access-1", "refresh-1");

    Mock::given(method("POST"))
        .and(path("/media"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&t.server)
        .await;

    let form = FormPayload::new()
        .text("entityType", "SKILL")
        .text("entityId", "3")
        .file("imageUrl", "badge.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
    t.state
        .auth
        .send(&AuthRequest::post("/media").form(form))
        .await
        .unwrap();

    let requests = t.server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/media")
        .expect("upload should reach the backend");

    let content_types: Vec<_> = upload
        .headers
        .get_all("content-type")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(content_types.len(), 1);
    assert!(content_types[0].starts_with("multipart/form-data; boundary="));
    assert!(!content_types[0].contains("application/json"));
    assert_eq!(upload.headers.get("authorization").unwrap(), "Bearer access-1");
}

#[tokio::test]
async fn test_form_retry_rebuilds_multipart_body() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-old");

    Mock::given(method("POST"))
        .and(path("/media"))
        .and(header("authorization", "Bearer access-old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refresh_ok("access-new", "refresh-new"))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/media"))
        .and(header("authorization", "Bearer access-new"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&t.server)
        .await;

    let form = FormPayload::new().file("imageUrl", "cv.pdf", "application/pdf", b"%PDF".to_vec());
    let response = t
        .state
        .auth
        .send(&AuthRequest::post("/media").form(form))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let requests = t.server.received_requests().await.unwrap();
    let uploads: Vec<_> = requests.iter().filter(|r| r.url.path() == "/media").collect();
    assert_eq!(uploads.len(), 2);
    for upload in uploads {
        let body = String::from_utf8_lossy(&upload.body);
        assert!(body.contains("filename=\"cv.pdf\""));
        assert!(body.contains("%PDF"));
    }
}

#[tokio::test]
async fn test_concurrent_401s_each_refresh_at_most_once() {
    let t = setup().await;
    t.tokens.set_tokens("access-old", "refresh-old");

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer access-old"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refresh_ok("access-new", "refresh-new"))
        .expect(1..=2)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer access-new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&t.server)
        .await;

    let skill_req = AuthRequest::get("/skill");
    let project_req = AuthRequest::get("/project");
    let (skills, projects) = tokio::join!(
        t.state.auth.send(&skill_req),
        t.state.auth.send(&project_req),
    );

    assert_eq!(skills.unwrap().status().as_u16(), 200);
    assert_eq!(projects.unwrap().status().as_u16(), 200);
    assert_eq!(
        t.tokens.pair(),
        Some(TokenPair::new("access-new", "refresh-new"))
    );
}
