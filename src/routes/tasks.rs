// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Task handler routes for Cloud Scheduler callbacks.
//!
//! These endpoints are called by the scheduler, not directly by users. The
//! scheduler auth middleware is applied in routes/mod.rs.

use crate::error::{AppError, Result};
use crate::services::{RunSummary, VerifiedTaskPrincipal};
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

/// Task handler routes (called by Cloud Scheduler).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/send-notifications", post(send_notifications))
}

/// Optional body of the reminder trigger.
#[derive(Debug, Default, Deserialize)]
pub struct SendNotificationsPayload {
    /// Run as if today were this date (replaying a missed day).
    #[serde(default)]
    pub today: Option<String>,
}

/// Run the daily reminder job.
///
/// Responds 500 only when users cannot be listed, so the scheduler records
/// the run as failed and retries it.
async fn send_notifications(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<VerifiedTaskPrincipal>,
    payload: Option<Json<SendNotificationsPayload>>,
) -> Result<Json<RunSummary>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let today = match payload.today.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest(format!("invalid date: {}", raw)))?,
        None => state.today(),
    };

    tracing::info!(
        %today,
        replay = payload.today.is_some(),
        caller = %caller.email,
        "Reminder job triggered"
    );

    let summary = state.notifier().run(today).await?;
    Ok(Json(summary))
}
