// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use marathon_calendar::config::Config;
use marathon_calendar::db::{FirestoreDb, MemoryStore, Store};
use marathon_calendar::middleware::auth::{create_jwt, AuthUser};
use marathon_calendar::routes::create_router;
use marathon_calendar::services::{
    GoogleOidcVerifier, PushError, PushMessage, PushSender, RaceCatalog, TokenProfile,
};
use marathon_calendar::AppState;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const TEST_KID: &str = "test-kid";

const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/oidc_test_key.pem");
const PUBLIC_KEY_PEM: &[u8] = include_bytes!("../fixtures/oidc_test_key.pub.pem");

/// Catalog used by the HTTP tests. Statuses do not depend on the current
/// date: entry windows are either closed by marker or span decades.
#[allow(dead_code)]
pub const TEST_CATALOG: &str = r#"{"marathons": [
    {"name": "東京マラソン2026", "date": "2026-03-01", "type": "フルマラソン",
     "method": "抽選", "entryStart": "2025-08-15", "entryDeadline": "締切済",
     "url": "https://www.marathon.tokyo/", "capacity": 38000},
    {"name": "ずっと受付中マラソン", "date": "2099-11-01", "type": "フルマラソン",
     "method": "先着", "entryStart": "2020-01-01", "entryDeadline": "2099-10-01",
     "url": "https://example.com/open", "capacity": 5000},
    {"name": "未来ウルトラ", "date": "2099-06-01", "type": "ウルトラマラソン",
     "method": "抽選", "entryStart": "2099-01-01", "entryDeadline": "2099-01-31",
     "url": "https://example.com/ultra", "capacity": "2,000人"},
    {"name": "満員マラソン", "date": "2099-12-01", "type": "フルマラソン",
     "method": "先着", "entryStart": "2020-01-01", "entryDeadline": "定員達成",
     "url": "https://example.com/full", "capacity": 10000}
]}"#;

/// Id of 東京マラソン2026 / 2026-03-01.
#[allow(dead_code)]
pub const TOKYO_ID: &str = "marathon-1ae48f";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Push sender that records every message and can be told to reject
/// specific tokens.
#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<(String, PushMessage)>>,
    pub unregistered: Mutex<Vec<String>>,
    pub broken: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingPush {
    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn mark_unregistered(&self, token: &str) {
        self.unregistered.lock().unwrap().push(token.to_string());
    }

    pub fn mark_broken(&self, token: &str) {
        self.broken.lock().unwrap().push(token.to_string());
    }
}

#[async_trait]
impl PushSender for RecordingPush {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<(), PushError> {
        if self.unregistered.lock().unwrap().iter().any(|t| t == token) {
            return Err(PushError::Unregistered);
        }
        if self.broken.lock().unwrap().iter().any(|t| t == token) {
            return Err(PushError::Delivery("HTTP 503".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), message.clone()));
        Ok(())
    }
}

/// Handles to the collaborators behind a test app.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub push: Arc<RecordingPush>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn static_verifier(profile: TokenProfile) -> Arc<GoogleOidcVerifier> {
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY_PEM).expect("test public key");
    Arc::new(GoogleOidcVerifier::new_with_static_key(profile, TEST_KID, key).unwrap())
}

/// Create a test app over an in-memory store and a recording push sender.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let config = Config::test_default();
    let store = Arc::new(MemoryStore::new());
    let push = Arc::new(RecordingPush::default());
    let catalog = RaceCatalog::load_from_json(TEST_CATALOG).expect("test catalog");

    let firebase_verifier = static_verifier(TokenProfile::firebase(&config.firebase_project_id));
    let scheduler_verifier = static_verifier(TokenProfile::scheduler(
        &config.api_url,
        &config.scheduler_service_account,
    ));

    let state = Arc::new(AppState {
        config,
        store: store.clone() as Arc<dyn Store>,
        catalog,
        push: push.clone() as Arc<dyn PushSender>,
        firebase_verifier,
        scheduler_verifier,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        push,
    }
}

fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn sign_rs256<C: Serialize>(claims: &C) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM).expect("test private key");
    encode(&header, claims, &key).unwrap()
}

#[derive(Serialize)]
struct FirebaseClaims<'a> {
    iss: String,
    aud: &'a str,
    sub: &'a str,
    iat: usize,
    exp: usize,
    auth_time: usize,
    name: Option<&'a str>,
    picture: Option<&'a str>,
}

/// Firebase ID token for `uid`, signed by the test key.
#[allow(dead_code)]
pub fn firebase_id_token(config: &Config, uid: &str, name: Option<&str>) -> String {
    let now = now_secs();
    sign_rs256(&FirebaseClaims {
        iss: format!(
            "https://securetoken.google.com/{}",
            config.firebase_project_id
        ),
        aud: &config.firebase_project_id,
        sub: uid,
        iat: now,
        exp: now + 3600,
        auth_time: now,
        name,
        picture: Some("https://example.com/avatar.png"),
    })
}

#[derive(Serialize)]
struct SchedulerClaims<'a> {
    iss: &'a str,
    aud: &'a str,
    sub: &'a str,
    iat: usize,
    exp: usize,
    email: &'a str,
    email_verified: bool,
}

/// Scheduler OIDC token from `email`, signed by the test key.
#[allow(dead_code)]
pub fn scheduler_token_for(config: &Config, email: &str) -> String {
    let now = now_secs();
    sign_rs256(&SchedulerClaims {
        iss: "https://accounts.google.com",
        aud: &config.api_url,
        sub: "112233445566778899",
        iat: now,
        exp: now + 3600,
        email,
        email_verified: true,
    })
}

/// Scheduler OIDC token from the configured service account.
#[allow(dead_code)]
pub fn scheduler_token(config: &Config) -> String {
    scheduler_token_for(config, &config.scheduler_service_account)
}

/// Session JWT as issued by `/auth/session`.
#[allow(dead_code)]
pub fn session_token(config: &Config, uid: &str) -> String {
    let user = AuthUser {
        uid: uid.to_string(),
        display_name: Some("Test Runner".to_string()),
        photo_url: None,
    };
    create_jwt(&user, &config.session_signing_key).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
