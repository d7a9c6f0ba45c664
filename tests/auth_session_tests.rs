// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Sign-in with a Firebase ID token and session cookie handling.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use marathon_calendar::db::Store;
use marathon_calendar::middleware::auth::SESSION_COOKIE;
use marathon_calendar::models::User;

mod common;
use common::{create_test_app, firebase_id_token, json_body, session_token, TestApp};

fn session_request(id_token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", id_token))
        .body(Body::empty())
        .unwrap()
}

async fn sign_in(app: &TestApp, uid: &str) -> axum::http::Response<Body> {
    let id_token = firebase_id_token(&app.state.config, uid, Some("テスト ランナー"));
    app.request(session_request(&id_token)).await
}

fn session_cookie_value(response: &axum::http::Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap();
    let pair = set_cookie.split(';').next().unwrap();
    let (name, value) = pair.split_once('=').unwrap();
    assert_eq!(name, SESSION_COOKIE);
    value.to_string()
}

#[tokio::test]
async fn test_session_created_from_valid_id_token() {
    let app = create_test_app();

    let response = sign_in(&app, "firebase-uid-1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let body = json_body(response).await;
    assert_eq!(body["uid"], "firebase-uid-1");
    assert_eq!(body["displayName"], "テスト ランナー");
    assert_eq!(body["photoUrl"], "https://example.com/avatar.png");

    let user = app.store.get_user("firebase-uid-1").await.unwrap().unwrap();
    assert_eq!(user.display_name.as_deref(), Some("テスト ランナー"));
    assert!(!user.created_at.is_empty());
}

#[tokio::test]
async fn test_session_cookie_authenticates_me() {
    let app = create_test_app();

    let response = sign_in(&app, "firebase-uid-2").await;
    let cookie = session_cookie_value(&response);

    let response = app
        .request(
            Request::builder()
                .uri("/api/me")
                .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, cookie))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["uid"], "firebase-uid-2");
}

#[tokio::test]
async fn test_sign_in_keeps_created_at_and_device_token() {
    let app = create_test_app();
    app.store
        .upsert_user(&User {
            uid: "returning".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            ..User::default()
        })
        .await
        .unwrap();
    app.store.set_device_token("returning", "device-1").await.unwrap();

    let response = sign_in(&app, "returning").await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = app.store.get_user("returning").await.unwrap().unwrap();
    assert_eq!(user.created_at, "2025-01-01T00:00:00Z");
    assert_eq!(user.fcm_token.as_deref(), Some("device-1"));
    assert_ne!(user.last_active, "");
}

#[tokio::test]
async fn test_session_rejects_garbage_token() {
    let app = create_test_app();

    let response = app.request(session_request("not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "invalid_token");
}

#[tokio::test]
async fn test_session_rejects_token_for_other_project() {
    let app = create_test_app();
    let mut config = app.state.config.clone();
    config.firebase_project_id = "other-project".to_string();

    let id_token = firebase_id_token(&config, "uid", None);
    let response = app.request(session_request(&id_token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_rejects_scheduler_token() {
    let app = create_test_app();

    let token = common::scheduler_token(&app.state.config);
    let response = app.request(session_request(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_requires_bearer_header() {
    let app = create_test_app();

    let response = app
        .request(
            Request::builder()
                .method("POST")
                .uri("/auth/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_without_session_unauthorized() {
    let app = create_test_app();

    let response = app
        .request(Request::builder().uri("/api/me").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_session_signed_with_other_key() {
    let app = create_test_app();
    let mut config = app.state.config.clone();
    config.session_signing_key = b"a_completely_different_signing_key".to_vec();
    let token = session_token(&config, "intruder");

    let response = app
        .request(
            Request::builder()
                .uri("/api/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = create_test_app();

    let response = app
        .request(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(set_cookie.contains("Max-Age=0"));
}
