// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Middleware modules (authentication, security, etc.).

pub mod auth;
pub mod security;
pub mod tasks_auth;

pub use auth::{require_auth, AuthUser};
pub use tasks_auth::require_scheduler_auth;
