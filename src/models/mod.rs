// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Data models for the application.

pub mod favorite;
pub mod race;
pub mod user;

pub use favorite::{Favorite, NotificationSent, PlanningStatus, StatusField};
pub use race::{ClosedReason, EntryMethod, RaceRecord, RaceType};
pub use user::User;
