// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Entry-status classification for race cards.

use super::dates::days_until;
use crate::models::race::{ClosedReason, EntryMethod, RaceRecord};
use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Display status of a race's registration window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EntryState {
    Upcoming,
    Open,
    Lottery,
    Closed,
}

impl EntryState {
    /// Whether the race is currently accepting entries (first-come or lottery).
    pub fn is_accepting(self) -> bool {
        matches!(self, Self::Open | Self::Lottery)
    }
}

/// Status plus the human label shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStatus {
    pub status: EntryState,
    pub label: String,
}

impl EntryStatus {
    fn new(status: EntryState, label: impl Into<String>) -> Self {
        Self {
            status,
            label: label.into(),
        }
    }

    fn days_left(start: NaiveDate, today: NaiveDate) -> Self {
        Self::new(
            EntryState::Upcoming,
            format!("{}日後", days_until(start, today)),
        )
    }
}

/// Classify a race's registration window as of `today`. First match wins.
pub fn classify(race: &RaceRecord, today: NaiveDate) -> EntryStatus {
    match race.closed {
        Some(ClosedReason::DeadlinePassed) => {
            return EntryStatus::new(EntryState::Closed, "締切済")
        }
        Some(ClosedReason::CapacityReached) => {
            return EntryStatus::new(EntryState::Closed, "定員達成")
        }
        None => {}
    }

    let start = race.entry_start;
    let deadline = race.entry_deadline;

    match race.method {
        EntryMethod::Lottery => {
            if let Some(start) = start.filter(|s| today < *s) {
                return EntryStatus::days_left(start, today);
            }
            match deadline {
                Some(d) if today <= d => EntryStatus::new(EntryState::Lottery, "抽選中"),
                Some(_) => EntryStatus::new(EntryState::Closed, "抽選終了"),
                None => EntryStatus::new(EntryState::Upcoming, "抽選"),
            }
        }
        EntryMethod::FirstCome => {
            if let Some(start) = start {
                if today < start {
                    return EntryStatus::days_left(start, today);
                }
                if deadline.map_or(true, |d| today <= d) {
                    return EntryStatus::new(EntryState::Open, "受付中");
                }
            }
            match deadline {
                Some(d) if today > d => EntryStatus::new(EntryState::Closed, "締切済"),
                _ => EntryStatus::new(EntryState::Upcoming, "未定"),
            }
        }
    }
}
