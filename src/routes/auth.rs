// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Sign-in routes.
//!
//! The browser signs in with Firebase Auth (Google provider) and trades the
//! resulting ID token for a session here.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_session_cookie, create_jwt, session_cookie, AuthUser};
use crate::models::User;
use crate::routes::api::UserResponse;
use crate::services::google_oidc::extract_bearer_token;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
}

/// Exchange a Firebase ID token for a session.
///
/// Upserts the profile (keeping `createdAt` and the device token), sets the
/// session cookie, and returns the signed-in user.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<UserResponse>)> {
    let id_token =
        extract_bearer_token(headers.get(header::AUTHORIZATION)).map_err(|_| AppError::Unauthorized)?;

    let identity = state
        .firebase_verifier
        .verify_firebase_token(id_token)
        .await?;

    let now = now_rfc3339();
    let created_at = state
        .store
        .get_user(&identity.uid)
        .await?
        .map(|u| u.created_at)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| now.clone());

    state
        .store
        .upsert_user(&User {
            uid: identity.uid.clone(),
            display_name: identity.display_name.clone(),
            photo_url: identity.photo_url.clone(),
            fcm_token: None,
            created_at,
            last_active: now,
        })
        .await?;

    let user = AuthUser {
        uid: identity.uid,
        display_name: identity.display_name,
        photo_url: identity.photo_url,
    };
    let token = create_jwt(&user, &state.config.session_signing_key)?;

    tracing::info!(uid = %user.uid, "Session created");

    Ok((
        jar.add(session_cookie(token, &state.config.frontend_url)),
        Json(UserResponse {
            uid: user.uid,
            display_name: user.display_name,
            photo_url: user.photo_url,
        }),
    ))
}

/// Logout - clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.add(clear_session_cookie()), StatusCode::NO_CONTENT)
}
