// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Milestone notification eligibility.
//!
//! A favorite gets one reminder when its registration opens in exactly seven
//! days and one when it opens tomorrow. Matching is exact-day: if the daily
//! job does not run on the matching day, that milestone is never sent. There
//! is no catch-up window.

use crate::models::favorite::NotificationSent;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which reminder fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Milestone {
    SevenDays,
    OneDay,
}

impl Milestone {
    /// Days before registration opens at which this milestone fires.
    pub const fn lead_days(self) -> u64 {
        match self {
            Self::SevenDays => 7,
            Self::OneDay => 1,
        }
    }

    /// Firestore field path of this milestone's sent flag.
    pub const fn flag_field(self) -> &'static str {
        match self {
            Self::SevenDays => "notificationSent.sevenDays",
            Self::OneDay => "notificationSent.oneDay",
        }
    }
}

/// Result of evaluating one favorite for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub kind: Option<Milestone>,
    pub days_until: u64,
}

impl Eligibility {
    const NONE: Self = Self {
        kind: None,
        days_until: 0,
    };

    pub fn fires(&self) -> bool {
        self.kind.is_some()
    }
}

/// Decide whether a reminder is due for a favorite on `today`.
///
/// Both milestones are checked independently; if both ever matched on the
/// same day the one-day reminder wins.
pub fn evaluate(
    entry_start: Option<NaiveDate>,
    today: NaiveDate,
    already_sent: NotificationSent,
) -> Eligibility {
    let Some(start) = entry_start else {
        return Eligibility::NONE;
    };

    let mut result = Eligibility::NONE;
    for milestone in [Milestone::SevenDays, Milestone::OneDay] {
        if already_sent.get(milestone) {
            continue;
        }
        let target = today.checked_add_days(Days::new(milestone.lead_days()));
        if target == Some(start) {
            result = Eligibility {
                kind: Some(milestone),
                days_until: milestone.lead_days(),
            };
        }
    }
    result
}
