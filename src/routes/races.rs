// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Race listing routes. Public; a session only adds favorite flags.

use crate::entry::EntryState;
use crate::error::{AppError, Result};
use crate::middleware::auth::authenticate;
use crate::models::{EntryMethod, RaceType};
use crate::services::races::{RaceFilter, TypeFilter};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/races", get(list_races))
}

#[derive(Debug, Default, Deserialize)]
pub struct RacesQuery {
    #[serde(rename = "type", default)]
    pub race_type: TypeFilter,
    #[serde(default)]
    pub open_only: bool,
    #[serde(default)]
    pub favorites_only: bool,
}

/// One race in the listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RaceResponse {
    pub id: String,
    pub name: String,
    pub date: String,
    #[serde(rename = "type")]
    pub race_type: RaceType,
    pub method: EntryMethod,
    pub entry_start: String,
    pub entry_deadline: String,
    pub url: String,
    pub capacity: u32,
    pub location: Option<String>,
    pub status: EntryState,
    pub label: String,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RacesResponse {
    pub races: Vec<RaceResponse>,
}

/// List catalog races classified as of today.
async fn list_races(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Query(query): Query<RacesQuery>,
) -> Result<Json<RacesResponse>> {
    let user = authenticate(&jar, &headers, &state.config.session_signing_key);

    if query.favorites_only && user.is_none() {
        return Err(AppError::Unauthorized);
    }

    let favorite_ids = match &user {
        Some(user) => state.favorites().favorite_ids(&user.uid).await?,
        None => HashSet::new(),
    };

    let filter = RaceFilter {
        race_type: query.race_type,
        open_only: query.open_only,
        favorites_only: query.favorites_only,
    };

    let races = state
        .catalog
        .list(filter, &favorite_ids, state.today())
        .into_iter()
        .map(|listed| RaceResponse {
            favorite: favorite_ids.contains(listed.id),
            id: listed.id.to_string(),
            name: listed.race.name.clone(),
            date: listed.race.date.clone(),
            race_type: listed.race.race_type,
            method: listed.race.method,
            entry_start: listed.race.entry_start_label.clone(),
            entry_deadline: listed.race.entry_deadline_label.clone(),
            url: listed.race.url.clone(),
            capacity: listed.race.capacity,
            location: listed.race.location.clone(),
            status: listed.status.status,
            label: listed.status.label,
        })
        .collect();

    Ok(Json(RacesResponse { races }))
}
