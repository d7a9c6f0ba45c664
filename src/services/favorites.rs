// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Favorites service.
//!
//! Handles the user-initiated side of favorites:
//! 1. Toggle a race on or off (create with defaults / delete)
//! 2. Update one planning-status field at a time
//! 3. List favorites with the "days until entry" label
//! 4. Register the push device token

use crate::db::Store;
use crate::entry::dates::find_iso_date;
use crate::entry::days_until;
use crate::error::{AppError, Result};
use crate::models::{Favorite, NotificationSent, PlanningStatus, RaceType, StatusField};
use crate::services::races::RaceCatalog;
use crate::time_utils::now_rfc3339;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A favorite as shown on the user's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoriteView {
    pub id: String,
    pub marathon_name: String,
    pub entry_start: String,
    pub date: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub race_type: Option<RaceType>,
    pub url: String,
    pub status: PlanningStatus,
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub notification_sent: NotificationSent,
    pub days_until_entry: Option<i64>,
    pub entry_label: Option<String>,
}

/// Label for the number of days until registration opens.
pub fn entry_countdown_label(days: i64) -> String {
    match days {
        d if d > 0 => format!("申込開始まで{}日", d),
        0 => "本日申込開始！".to_string(),
        _ => "申込開始済み".to_string(),
    }
}

pub struct FavoritesService {
    store: Arc<dyn Store>,
    catalog: RaceCatalog,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn Store>, catalog: RaceCatalog) -> Self {
        Self { store, catalog }
    }

    /// Ids of the user's favorites.
    pub async fn favorite_ids(&self, uid: &str) -> Result<HashSet<String>> {
        Ok(self
            .store
            .list_favorites(uid)
            .await?
            .into_iter()
            .map(|f| f.id)
            .collect())
    }

    /// The user's favorites with their countdown to registration.
    ///
    /// The countdown reads the first `YYYY-MM-DD` in the entry text, so
    /// `2026-04-01予定` still counts down. The catalog's current text is used
    /// when the race is still listed, and the stored snapshot otherwise.
    pub async fn list(&self, uid: &str, today: NaiveDate) -> Result<Vec<FavoriteView>> {
        let favorites = self.store.list_favorites(uid).await?;

        Ok(favorites
            .into_iter()
            .map(|fav| {
                let entry_text = match self.catalog.find(&fav.id) {
                    Some(race) => race.entry_start_label.as_str(),
                    None => fav.entry_start.as_str(),
                };
                let entry_start = find_iso_date(entry_text);
                let days = entry_start.map(|start| days_until(start, today));

                FavoriteView {
                    entry_label: days.map(entry_countdown_label),
                    days_until_entry: days,
                    id: fav.id,
                    marathon_name: fav.marathon_name,
                    entry_start: fav.entry_start,
                    date: fav.date,
                    race_type: fav.race_type,
                    url: fav.url,
                    status: fav.status,
                    notification_sent: fav.notification_sent,
                }
            })
            .collect())
    }

    /// Flip a race's favorite state. Returns whether it is now a favorite.
    pub async fn toggle(&self, uid: &str, race_id: &str) -> Result<bool> {
        if self.store.get_favorite(uid, race_id).await?.is_some() {
            self.remove(uid, race_id).await?;
            Ok(false)
        } else {
            self.add(uid, race_id).await?;
            Ok(true)
        }
    }

    /// Create a favorite for a catalog race with default planning state.
    pub async fn add(&self, uid: &str, race_id: &str) -> Result<Favorite> {
        let race = self
            .catalog
            .find(race_id)
            .ok_or_else(|| AppError::NotFound(format!("race {}", race_id)))?;

        let now = now_rfc3339();
        let favorite = Favorite::from_race(race, &now);
        self.store.set_favorite(uid, &favorite).await?;

        tracing::info!(uid, race_id, "Favorite added");
        Ok(favorite)
    }

    pub async fn remove(&self, uid: &str, race_id: &str) -> Result<()> {
        self.store.delete_favorite(uid, race_id).await?;
        tracing::info!(uid, race_id, "Favorite removed");
        Ok(())
    }

    /// Set one planning-status field.
    ///
    /// `value` must belong to the field's vocabulary. The other two fields
    /// are left untouched.
    pub async fn update_status(
        &self,
        uid: &str,
        race_id: &str,
        field: StatusField,
        value: &str,
    ) -> Result<PlanningStatus> {
        let favorite = self
            .store
            .get_favorite(uid, race_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("favorite {}", race_id)))?;

        let mut status = favorite.status;
        status.set(field, value).map_err(AppError::BadRequest)?;

        let now = now_rfc3339();
        self.store
            .update_favorite_status(uid, race_id, field, &status, &now)
            .await?;

        tracing::debug!(uid, race_id, ?field, value, "Planning status updated");
        Ok(status)
    }

    /// Store the device token, replacing any previous one.
    pub async fn register_device_token(&self, uid: &str, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::BadRequest("device token is empty".to_string()));
        }
        self.store.set_device_token(uid, token).await?;
        tracing::info!(uid, "Device token registered");
        Ok(())
    }
}

/// Entry start date of a stored favorite, as the notification job reads it.
///
/// Only the `YYYY-MM-DD` digits matter here; marker words are not checked.
pub fn favorite_entry_start(favorite: &Favorite) -> Option<NaiveDate> {
    find_iso_date(&favorite.entry_start)
}
