// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Stable favorite identifiers derived from a race's name and date.
//!
//! The browser client and the notification job both derive this id, so the
//! fold below must match the JavaScript `hash = ((hash << 5) - hash) + code`
//! loop bit for bit: UTF-16 code units, wrapping 32-bit signed arithmetic.

/// Prefix shared by every derived id.
pub const ID_PREFIX: &str = "marathon-";

/// Derive the favorite document id for a race.
///
/// Two races whose `(name, date)` fold to the same value share an id. There
/// is no collision resolution.
pub fn derive_id(name: &str, date: &str) -> String {
    let hash = fold_hash(name, date);
    // i32::MIN has no positive i32 counterpart. Widen first so the result is
    // 2^31, which is what `Math.abs` yields in the browser.
    let magnitude = i64::from(hash).unsigned_abs();
    format!("{}{}", ID_PREFIX, to_base36(magnitude))
}

/// Fold `name + "-" + date` into a wrapping 32-bit signed hash.
pub fn fold_hash(name: &str, date: &str) -> i32 {
    name.encode_utf16()
        .chain("-".encode_utf16())
        .chain(date.encode_utf16())
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
