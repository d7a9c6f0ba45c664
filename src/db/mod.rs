// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Database layer.
//!
//! Handlers and the notification job talk to storage through [`Store`].
//! Production uses Firestore; tests and local runs use the in-memory store.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::entry::Milestone;
use crate::error::AppError;
use crate::models::{Favorite, PlanningStatus, StatusField, User};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Sub-collection under each user document.
    pub const FAVORITES: &str = "favorites";
}

/// Per-user document store for profiles, device tokens and favorites.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError>;

    /// Write profile fields. The device token is left untouched.
    async fn upsert_user(&self, user: &User) -> Result<(), AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Overwrite the user's device token.
    async fn set_device_token(&self, uid: &str, token: &str) -> Result<(), AppError>;

    /// Remove the device token field entirely.
    async fn delete_device_token(&self, uid: &str) -> Result<(), AppError>;

    async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>, AppError>;

    async fn get_favorite(&self, uid: &str, id: &str) -> Result<Option<Favorite>, AppError>;

    /// Create or replace a favorite document.
    async fn set_favorite(&self, uid: &str, favorite: &Favorite) -> Result<(), AppError>;

    /// Write one planning-status field (taken from `status`) and `updatedAt`.
    /// Fails if the favorite does not exist; it is never recreated.
    async fn update_favorite_status(
        &self,
        uid: &str,
        id: &str,
        field: StatusField,
        status: &PlanningStatus,
        updated_at: &str,
    ) -> Result<(), AppError>;

    /// Set one milestone's sent flag to true. Fails if the favorite does not
    /// exist; it is never recreated.
    async fn mark_notification_sent(
        &self,
        uid: &str,
        id: &str,
        milestone: Milestone,
    ) -> Result<(), AppError>;

    async fn delete_favorite(&self, uid: &str, id: &str) -> Result<(), AppError>;
}
