// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Push delivery through Firebase Cloud Messaging (HTTP v1 API).
//!
//! Handles:
//! - Message construction (notification, data, web-push link)
//! - OAuth access tokens for the FCM API
//! - Telling "token no longer registered" apart from other failures

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

const FCM_BASE_URL: &str = "https://fcm.googleapis.com";
const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A notification to deliver to one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// String key/value pairs handed to the client on click.
    pub data: BTreeMap<String, String>,
    /// Page to open when the notification is clicked.
    pub link: Option<String>,
}

/// Delivery failure categories.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PushError {
    /// The device token is permanently invalid and should be deleted.
    #[error("device token is no longer registered")]
    Unregistered,

    /// Any other failure. Logged; the next run tries again.
    #[error("push delivery failed: {0}")]
    Delivery(String),
}

/// Push-delivery collaborator.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<(), PushError>;
}

enum FcmAuth {
    Google(Arc<gcloud_sdk::GoogleAuthTokenGenerator>),
    Static(String),
}

/// FCM HTTP v1 client.
pub struct FcmClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    auth: FcmAuth,
}

impl FcmClient {
    /// Create a client using application default credentials.
    pub async fn new(project_id: &str) -> anyhow::Result<Self> {
        let generator = gcloud_sdk::GoogleAuthTokenGenerator::new(
            gcloud_sdk::TokenSourceType::Default,
            vec![FCM_SCOPE.to_string()],
        )
        .await
        .map_err(|e| anyhow::anyhow!("FCM credentials error: {}", e))?;

        tracing::info!(project = project_id, "FCM client initialized");

        Ok(Self {
            http: build_http_client()?,
            base_url: FCM_BASE_URL.to_string(),
            project_id: project_id.to_string(),
            auth: FcmAuth::Google(Arc::new(generator)),
        })
    }

    /// Create a client with a fixed bearer token and endpoint.
    ///
    /// Intended for local fakes and integration tests.
    pub fn with_static_token(
        project_id: &str,
        base_url: &str,
        access_token: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            auth: FcmAuth::Static(access_token.to_string()),
        })
    }

    async fn access_token(&self) -> Result<String, PushError> {
        match &self.auth {
            FcmAuth::Static(token) => Ok(token.clone()),
            FcmAuth::Google(generator) => generator
                .create_token()
                .await
                .map(|t| t.token.as_sensitive_str().to_string())
                .map_err(|e| PushError::Delivery(format!("FCM token error: {}", e))),
        }
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<(), PushError> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        );
        let access_token = self.access_token().await?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&fcm_request_body(token, message))
            .send()
            .await
            .map_err(|e| PushError::Delivery(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(classify_fcm_error(status.as_u16(), &body))
    }
}

fn build_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| anyhow::anyhow!("failed building FCM HTTP client: {}", e))
}

/// Build the `messages:send` request body.
///
/// FCM rejects non-HTTPS web-push links, so relative links are only carried
/// in `data`.
fn fcm_request_body(token: &str, message: &PushMessage) -> serde_json::Value {
    let mut body = json!({
        "message": {
            "token": token,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
        }
    });

    if !message.data.is_empty() {
        body["message"]["data"] = json!(message.data);
    }

    if let Some(link) = message.link.as_deref().filter(|l| l.starts_with("https://")) {
        body["message"]["webpush"] = json!({ "fcm_options": { "link": link } });
    }

    body
}

#[derive(Debug, Deserialize)]
struct FcmErrorBody {
    error: FcmErrorStatus,
}

#[derive(Debug, Deserialize)]
struct FcmErrorStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<FcmErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FcmErrorDetail {
    #[serde(default)]
    error_code: Option<String>,
}

/// Map an FCM error response onto [`PushError`].
///
/// Only an FCM error body saying `UNREGISTERED` (or `NOT_FOUND`) means the
/// token is gone for good. A 404 without one comes from a proxy or a wrong
/// endpoint and must not cost anyone their token.
fn classify_fcm_error(status: u16, body: &str) -> PushError {
    let Ok(parsed) = serde_json::from_str::<FcmErrorBody>(body) else {
        return PushError::Delivery(format!("HTTP {}: {}", status, body));
    };

    let unregistered = parsed
        .error
        .details
        .iter()
        .any(|d| d.error_code.as_deref() == Some("UNREGISTERED"))
        || parsed.error.status == "NOT_FOUND";

    if unregistered {
        PushError::Unregistered
    } else {
        PushError::Delivery(format!(
            "HTTP {} {}: {}",
            status, parsed.error.status, parsed.error.message
        ))
    }
}
