// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Cloud Scheduler authentication middleware.

use crate::services::google_oidc::OidcError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header Cloud Scheduler sets on HTTP targets. Cloud Run strips it from
/// external requests.
pub const SCHEDULER_JOB_HEADER: &str = "x-cloudscheduler-jobname";

fn is_expected_job(headers: &HeaderMap, job_name: &str) -> bool {
    headers
        .get(SCHEDULER_JOB_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|name| name == job_name)
}

/// Require job header + valid scheduler OIDC token for `/tasks/*` routes.
///
/// The verified principal is added to the request extensions.
pub async fn require_scheduler_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !is_expected_job(request.headers(), &state.config.scheduler_job_name) {
        tracing::warn!(
            header = ?request.headers().get(SCHEDULER_JOB_HEADER),
            "Blocked tasks request with invalid scheduler job header"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    let auth_header = request.headers().get(header::AUTHORIZATION);

    let principal = state
        .scheduler_verifier
        .verify_scheduler_token(auth_header)
        .await
        .map_err(|err| match err {
            OidcError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Blocked tasks request: invalid OIDC token");
                StatusCode::FORBIDDEN
            }
            OidcError::Transient(reason) => {
                tracing::error!(reason = %reason, "Scheduler OIDC verification transient failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    tracing::debug!(
        email = %principal.email,
        subject = %principal.subject,
        audience = %principal.audience,
        "Scheduler OIDC verification succeeded"
    );

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
