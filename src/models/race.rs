// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Race catalog records.
//!
//! The catalog file overloads the entry date text with status sentinels
//! (`締切済`, `定員達成`, `未定`, ...). Those are decoded once, when a record is
//! loaded, into explicit date and closed-reason fields. The raw text is kept
//! only for display.

use crate::entry::dates::parse_entry_date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEADLINE_PASSED_MARKER: &str = "締切済";
const CAPACITY_REACHED_MARKER: &str = "定員達成";

/// Race distance category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RaceType {
    #[serde(rename = "fullMarathon", alias = "フルマラソン")]
    FullMarathon,
    #[serde(rename = "ultraMarathon", alias = "ウルトラマラソン")]
    UltraMarathon,
}

/// How entries are granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EntryMethod {
    #[serde(rename = "firstCome", alias = "先着")]
    FirstCome,
    #[serde(rename = "lottery", alias = "抽選")]
    Lottery,
}

/// Why registration is closed regardless of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClosedReason {
    DeadlinePassed,
    CapacityReached,
}

impl ClosedReason {
    /// Decode the closed sentinel from deadline text. "Deadline passed" is
    /// checked first.
    pub fn from_deadline_text(text: &str) -> Option<Self> {
        if text.contains(DEADLINE_PASSED_MARKER) {
            Some(Self::DeadlinePassed)
        } else if text.contains(CAPACITY_REACHED_MARKER) {
            Some(Self::CapacityReached)
        } else {
            None
        }
    }
}

/// Catalog entry as it appears in `marathons.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceRecordFile {
    pub name: String,
    pub date: String,
    #[serde(rename = "type")]
    pub race_type: RaceType,
    pub method: EntryMethod,
    #[serde(default)]
    pub entry_start: String,
    #[serde(default)]
    pub entry_deadline: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "deserialize_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CapacityText {
    Number(u32),
    Text(String),
}

/// Capacity is published either as a number or as text like `"38,000人"`.
fn deserialize_capacity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CapacityText::deserialize(deserializer)? {
        CapacityText::Number(n) => n,
        CapacityText::Text(text) => text
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0),
    })
}

/// A race with its entry window decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RaceRecordFile")]
pub struct RaceRecord {
    pub name: String,
    /// Event date, display text.
    pub date: String,
    pub race_type: RaceType,
    pub method: EntryMethod,
    pub entry_start: Option<NaiveDate>,
    pub entry_deadline: Option<NaiveDate>,
    pub closed: Option<ClosedReason>,
    /// Raw entry start text as published.
    pub entry_start_label: String,
    /// Raw entry deadline text as published.
    pub entry_deadline_label: String,
    pub url: String,
    pub capacity: u32,
    pub location: Option<String>,
}

impl From<RaceRecordFile> for RaceRecord {
    fn from(raw: RaceRecordFile) -> Self {
        Self {
            entry_start: parse_entry_date(&raw.entry_start),
            entry_deadline: parse_entry_date(&raw.entry_deadline),
            closed: ClosedReason::from_deadline_text(&raw.entry_deadline),
            name: raw.name,
            date: raw.date,
            race_type: raw.race_type,
            method: raw.method,
            entry_start_label: raw.entry_start,
            entry_deadline_label: raw.entry_deadline,
            url: raw.url,
            capacity: raw.capacity,
            location: raw.location,
        }
    }
}

impl RaceRecord {
    /// Derived favorite id for this race.
    pub fn id(&self) -> String {
        crate::entry::derive_id(&self.name, &self.date)
    }
}
