// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Favorite races and their planning state.

use crate::entry::Milestone;
use crate::models::race::{RaceRecord, RaceType};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A user's favorite race.
///
/// Stored at: `users/{uid}/favorites/{id}` where `id` is the derived race id.
/// Race fields are a snapshot taken when the favorite was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// Document id (never written as a field)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub marathon_name: String,
    /// Entry start text as published (parsed by the notification job)
    #[serde(default)]
    pub entry_start: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub race_type: Option<RaceType>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: PlanningStatus,
    #[serde(default)]
    pub notification_sent: NotificationSent,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Favorite {
    /// New favorite for a race: every status `none`, no reminders sent.
    pub fn from_race(race: &RaceRecord, now: &str) -> Self {
        Self {
            id: race.id(),
            marathon_name: race.name.clone(),
            entry_start: race.entry_start_label.clone(),
            date: race.date.clone(),
            race_type: Some(race.race_type),
            url: race.url.clone(),
            status: PlanningStatus::default(),
            notification_sent: NotificationSent::default(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

/// The three independent planning states tracked per favorite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanningStatus {
    #[serde(default)]
    pub application: ApplicationStatus,
    #[serde(default)]
    pub accommodation: AccommodationStatus,
    #[serde(default)]
    pub transportation: TransportationStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ApplicationStatus {
    #[default]
    None,
    Applied,
    Waiting,
    Rejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AccommodationStatus {
    #[default]
    None,
    Booked,
    NotNeeded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TransportationStatus {
    #[default]
    None,
    Plane,
    Shinkansen,
    Train,
    Car,
    Bus,
    NotNeeded,
}

/// Which planning state a status update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusField {
    Application,
    Accommodation,
    Transportation,
}

impl StatusField {
    /// Firestore field path for a partial update.
    pub const fn field_path(self) -> &'static str {
        match self {
            Self::Application => "status.application",
            Self::Accommodation => "status.accommodation",
            Self::Transportation => "status.transportation",
        }
    }
}

impl PlanningStatus {
    /// Set one field from its wire value, rejecting values outside that
    /// field's vocabulary.
    pub fn set(&mut self, field: StatusField, value: &str) -> Result<(), String> {
        let raw = serde_json::Value::String(value.to_string());
        let invalid = |_| format!("invalid {:?} status: {}", field, value);
        match field {
            StatusField::Application => {
                self.application = serde_json::from_value(raw).map_err(invalid)?
            }
            StatusField::Accommodation => {
                self.accommodation = serde_json::from_value(raw).map_err(invalid)?
            }
            StatusField::Transportation => {
                self.transportation = serde_json::from_value(raw).map_err(invalid)?
            }
        }
        Ok(())
    }
}

/// Which milestone reminders have gone out. Each is sent at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSent {
    #[serde(default)]
    pub seven_days: bool,
    #[serde(default)]
    pub one_day: bool,
}

impl NotificationSent {
    pub fn get(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::SevenDays => self.seven_days,
            Milestone::OneDay => self.one_day,
        }
    }

    pub fn set(&mut self, milestone: Milestone) {
        match milestone {
            Milestone::SevenDays => self.seven_days = true,
            Milestone::OneDay => self.one_day = true,
        }
    }
}
