// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PlanningStatus, StatusField};
use crate::services::notifier::test_message;
use crate::services::{FavoriteView, PushError};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// API routes (require authentication via session JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/favorites", get(list_favorites))
        .route("/api/favorites/{id}", delete(remove_favorite))
        .route("/api/favorites/{id}/toggle", post(toggle_favorite))
        .route("/api/favorites/{id}/status", put(update_status))
        .route("/api/device-token", put(register_device_token))
        .route("/api/notifications/test", post(send_test_notification))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Get the signed-in user.
async fn get_me(Extension(user): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse {
        uid: user.uid,
        display_name: user.display_name,
        photo_url: user.photo_url,
    })
}

// ─── Favorites ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoritesResponse {
    pub favorites: Vec<FavoriteView>,
}

/// List the user's favorites. Empty when there are none.
async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FavoritesResponse>> {
    let favorites = state.favorites().list(&user.uid, state.today()).await?;
    Ok(Json(FavoritesResponse { favorites }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleResponse {
    pub favorite: bool,
}

async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>> {
    let favorite = state.favorites().toggle(&user.uid, &id).await?;
    Ok(Json(ToggleResponse { favorite }))
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.favorites().remove(&user.uid, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdateRequest {
    #[validate(length(min = 1, max = 32))]
    pub field: String,
    #[validate(length(min = 1, max = 32))]
    pub value: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusResponse {
    pub status: PlanningStatus,
}

/// Update one planning-status field.
async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<StatusResponse>> {
    body.validate()?;
    let field: StatusField = serde_json::from_value(serde_json::Value::String(body.field))
        .map_err(|_| AppError::BadRequest("unknown status field".to_string()))?;

    let status = state
        .favorites()
        .update_status(&user.uid, &id, field, &body.value)
        .await?;
    Ok(Json(StatusResponse { status }))
}

// ─── Push ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct DeviceTokenRequest {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
}

/// Register (or replace) the device token for reminders.
async fn register_device_token(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<DeviceTokenRequest>,
) -> Result<StatusCode> {
    body.validate()?;

    state
        .favorites()
        .register_device_token(&user.uid, &body.token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TestNotificationRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub message: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TestNotificationResponse {
    pub sent: bool,
}

/// Send a test notification to the caller's registered device.
async fn send_test_notification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Option<Json<TestNotificationRequest>>,
) -> Result<Json<TestNotificationResponse>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    body.validate()?;

    let token = state
        .store
        .get_user(&user.uid)
        .await?
        .and_then(|u| u.fcm_token)
        .ok_or_else(|| AppError::NotFound("device token".to_string()))?;

    let message = test_message(body.message.as_deref());
    match state.push.send(&token, &message).await {
        Ok(()) => {
            tracing::info!(uid = %user.uid, "Test notification sent");
            Ok(Json(TestNotificationResponse { sent: true }))
        }
        Err(PushError::Unregistered) => {
            state.store.delete_device_token(&user.uid).await?;
            Err(AppError::NotFound(
                "device token is no longer registered".to_string(),
            ))
        }
        Err(PushError::Delivery(reason)) => Err(AppError::Push(reason)),
    }
}
