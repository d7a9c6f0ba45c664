// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Favorites, planning status and device-token endpoints.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use marathon_calendar::db::Store;
use serde_json::json;

mod common;
use common::{create_test_app, json_body, session_token, TestApp, TOKYO_ID};

const UID: &str = "runner-1";

fn authed(app: &TestApp, method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let token = session_token(&app.state.config, UID);
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_favorites_require_session() {
    let app = create_test_app();

    let response = app
        .request(
            Request::builder()
                .uri("/api/favorites")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_favorites_list() {
    let app = create_test_app();

    let response = app.request(authed(&app, "GET", "/api/favorites", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["favorites"], json!([]));
}

#[tokio::test]
async fn test_toggle_on_creates_default_favorite() {
    let app = create_test_app();

    let uri = format!("/api/favorites/{}/toggle", TOKYO_ID);
    let response = app.request(authed(&app, "POST", &uri, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["favorite"], true);

    let stored = app.store.get_favorite(UID, TOKYO_ID).await.unwrap().unwrap();
    assert_eq!(stored.marathon_name, "東京マラソン2026");
    assert_eq!(stored.entry_start, "2025-08-15");
    assert!(!stored.notification_sent.seven_days);
    assert!(!stored.notification_sent.one_day);

    let response = app.request(authed(&app, "GET", "/api/favorites", None)).await;
    let body = json_body(response).await;
    let favorite = &body["favorites"][0];
    assert_eq!(favorite["id"], TOKYO_ID);
    assert_eq!(favorite["marathonName"], "東京マラソン2026");
    assert_eq!(
        favorite["status"],
        json!({"application": "none", "accommodation": "none", "transportation": "none"})
    );
    // Registration opened in 2025, so the countdown is negative.
    assert_eq!(favorite["entryLabel"], "申込開始済み");
}

#[tokio::test]
async fn test_toggle_twice_removes_favorite() {
    let app = create_test_app();
    let uri = format!("/api/favorites/{}/toggle", TOKYO_ID);

    app.request(authed(&app, "POST", &uri, None)).await;
    let response = app.request(authed(&app, "POST", &uri, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["favorite"], false);
    assert!(app.store.get_favorite(UID, TOKYO_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_toggle_unknown_race_not_found() {
    let app = create_test_app();

    let response = app
        .request(authed(&app, "POST", "/api/favorites/marathon-ffffff/toggle", None))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_favorite() {
    let app = create_test_app();
    let toggle = format!("/api/favorites/{}/toggle", TOKYO_ID);
    app.request(authed(&app, "POST", &toggle, None)).await;

    let uri = format!("/api/favorites/{}", TOKYO_ID);
    let response = app.request(authed(&app, "DELETE", &uri, None)).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.store.list_favorites(UID).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_status_changes_one_field() {
    let app = create_test_app();
    let toggle = format!("/api/favorites/{}/toggle", TOKYO_ID);
    app.request(authed(&app, "POST", &toggle, None)).await;

    let uri = format!("/api/favorites/{}/status", TOKYO_ID);
    let response = app
        .request(authed(
            &app,
            "PUT",
            &uri,
            Some(json!({"field": "transportation", "value": "shinkansen"})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"]["transportation"], "shinkansen");
    assert_eq!(body["status"]["application"], "none");

    let stored = app.store.get_favorite(UID, TOKYO_ID).await.unwrap().unwrap();
    assert_eq!(
        serde_json::to_value(stored.status).unwrap()["transportation"],
        "shinkansen"
    );
}

#[tokio::test]
async fn test_update_status_rejects_value_from_other_field() {
    let app = create_test_app();
    let toggle = format!("/api/favorites/{}/toggle", TOKYO_ID);
    app.request(authed(&app, "POST", &toggle, None)).await;

    let uri = format!("/api/favorites/{}/status", TOKYO_ID);
    let response = app
        .request(authed(
            &app,
            "PUT",
            &uri,
            Some(json!({"field": "application", "value": "shinkansen"})),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_status_rejects_unknown_field() {
    let app = create_test_app();
    let toggle = format!("/api/favorites/{}/toggle", TOKYO_ID);
    app.request(authed(&app, "POST", &toggle, None)).await;

    let uri = format!("/api/favorites/{}/status", TOKYO_ID);
    let response = app
        .request(authed(
            &app,
            "PUT",
            &uri,
            Some(json!({"field": "budget", "value": "none"})),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_status_missing_favorite_not_found() {
    let app = create_test_app();

    let uri = format!("/api/favorites/{}/status", TOKYO_ID);
    let response = app
        .request(authed(
            &app,
            "PUT",
            &uri,
            Some(json!({"field": "application", "value": "applied"})),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_device_token() {
    let app = create_test_app();

    let response = app
        .request(authed(
            &app,
            "PUT",
            "/api/device-token",
            Some(json!({"token": "device-abc"})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let user = app.store.get_user(UID).await.unwrap().unwrap();
    assert_eq!(user.fcm_token.as_deref(), Some("device-abc"));
}

#[tokio::test]
async fn test_register_blank_device_token_rejected() {
    let app = create_test_app();

    let response = app
        .request(authed(
            &app,
            "PUT",
            "/api/device-token",
            Some(json!({"token": "   "})),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let app = create_test_app();
    let toggle = format!("/api/favorites/{}/toggle", TOKYO_ID);
    app.request(authed(&app, "POST", &toggle, None)).await;

    assert!(app
        .store
        .list_favorites("someone-else")
        .await
        .unwrap()
        .is_empty());
}
