// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Entry date parsing at day granularity.

use chrono::NaiveDate;

/// Substrings that mark an entry date as not yet fixed.
const UNDETERMINED_MARKERS: [&str; 3] = ["未定", "予定", "頃"];

/// Parse an entry date from catalog text.
///
/// Returns `None` for empty text, for text carrying one of the "undetermined"
/// markers, and for text without a valid `YYYY-MM-DD` run. Extra text around
/// the date (weekday suffixes, times) is ignored.
pub fn parse_entry_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() || UNDETERMINED_MARKERS.iter().any(|m| text.contains(m)) {
        return None;
    }
    find_iso_date(text)
}

/// Find the first `YYYY-MM-DD` run in `text` without any marker checks.
///
/// Favorites store the raw catalog text, and the notification job only
/// needs the date digits.
pub fn find_iso_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() < 10 {
        return None;
    }

    (0..=bytes.len() - 10).find_map(|start| {
        let window = &bytes[start..start + 10];
        let shape_ok = window.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
        if !shape_ok {
            return None;
        }

        // The window is pure ASCII, so slicing on these offsets is safe.
        let year: i32 = text[start..start + 4].parse().ok()?;
        let month: u32 = text[start + 5..start + 7].parse().ok()?;
        let day: u32 = text[start + 8..start + 10].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Whole calendar days from `today` until `target` (negative once passed).
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}
