// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Shared helpers for calendar dates and timestamps.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current timestamp for `createdAt`/`updatedAt` fields.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Calendar date of `instant` in the given offset.
pub fn date_in_offset(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Today's calendar date in the given offset.
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    date_in_offset(Utc::now(), offset)
}
