// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Race listing, filters and response headers.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;

mod common;
use common::{create_test_app, json_body, session_token, TestApp, TOKYO_ID};

async fn list(app: &TestApp, query: &str, session: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(format!("/api/races{}", query));
    if let Some(uid) = session {
        let token = session_token(&app.state.config, uid);
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = app.request(builder.body(Body::empty()).unwrap()).await;
    let status = response.status();
    let body = if status == StatusCode::OK {
        json_body(response).await
    } else {
        Value::Null
    };
    (status, body)
}

fn names(body: &Value) -> Vec<String> {
    body["races"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

fn race<'a>(body: &'a Value, name: &str) -> &'a Value {
    body["races"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == name)
        .unwrap()
}

#[tokio::test]
async fn test_list_all_races_in_catalog_order() {
    let app = create_test_app();

    let (status, body) = list(&app, "", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body),
        vec!["東京マラソン2026", "ずっと受付中マラソン", "未来ウルトラ", "満員マラソン"]
    );
}

#[tokio::test]
async fn test_race_fields_and_status() {
    let app = create_test_app();
    let (_, body) = list(&app, "", None).await;

    let tokyo = race(&body, "東京マラソン2026");
    assert_eq!(tokyo["id"], TOKYO_ID);
    assert_eq!(tokyo["type"], "fullMarathon");
    assert_eq!(tokyo["method"], "lottery");
    assert_eq!(tokyo["status"], "closed");
    assert_eq!(tokyo["label"], "締切済");
    assert_eq!(tokyo["favorite"], false);

    let open = race(&body, "ずっと受付中マラソン");
    assert_eq!(open["status"], "open");

    let ultra = race(&body, "未来ウルトラ");
    assert_eq!(ultra["status"], "upcoming");
    assert_eq!(ultra["capacity"], 2000);

    let full = race(&body, "満員マラソン");
    assert_eq!(full["status"], "closed");
    assert_eq!(full["label"], "定員達成");
}

#[tokio::test]
async fn test_type_filter() {
    let app = create_test_app();

    let (_, body) = list(&app, "?type=ultra", None).await;
    assert_eq!(names(&body), vec!["未来ウルトラ"]);

    let (_, body) = list(&app, "?type=full", None).await;
    assert_eq!(names(&body).len(), 3);
}

#[tokio::test]
async fn test_open_only_filter() {
    let app = create_test_app();

    let (_, body) = list(&app, "?open_only=true", None).await;
    assert_eq!(names(&body), vec!["ずっと受付中マラソン"]);
}

#[tokio::test]
async fn test_unknown_type_filter_rejected() {
    let app = create_test_app();

    let (status, _) = list(&app, "?type=relay", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_only_requires_session() {
    let app = create_test_app();

    let (status, _) = list(&app, "?favorites_only=true", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorite_flag_and_favorites_only() {
    let app = create_test_app();
    let token = session_token(&app.state.config, "runner-1");

    app.request(
        Request::builder()
            .method("POST")
            .uri(format!("/api/favorites/{}/toggle", TOKYO_ID))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let (_, body) = list(&app, "", Some("runner-1")).await;
    assert_eq!(race(&body, "東京マラソン2026")["favorite"], true);
    assert_eq!(race(&body, "満員マラソン")["favorite"], false);

    let (_, body) = list(&app, "?favorites_only=true", Some("runner-1")).await;
    assert_eq!(names(&body), vec!["東京マラソン2026"]);

    // Another user sees no favorites.
    let (_, body) = list(&app, "?favorites_only=true", Some("runner-2")).await;
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = create_test_app();

    let response = app
        .request(Request::builder().uri("/api/races").body(Body::empty()).unwrap())
        .await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
}

#[tokio::test]
async fn test_health_reports_catalog_size() {
    let app = create_test_app();

    let response = app
        .request(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["races"], 4);
}
