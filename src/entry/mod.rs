// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Entry-window logic shared by the API and the notification job.
//!
//! Everything here is pure: "today" is always passed in.

pub mod dates;
pub mod id;
pub mod reminder;
pub mod status;

pub use dates::{days_until, parse_entry_date};
pub use id::derive_id;
pub use reminder::{evaluate, Eligibility, Milestone};
pub use status::{classify, EntryState, EntryStatus};
