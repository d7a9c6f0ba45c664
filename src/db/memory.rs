// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! In-memory store for tests and local runs without Firestore.

use crate::db::Store;
use crate::entry::Milestone;
use crate::error::AppError;
use crate::models::{Favorite, PlanningStatus, StatusField, User};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Store backed by concurrent maps. Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, User>>,
    /// Favorites per uid, ordered by document id like a Firestore listing.
    favorites: Arc<DashMap<String, BTreeMap<String, Favorite>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn missing_favorite(uid: &str, id: &str) -> AppError {
        AppError::Database(format!("No document to update: users/{uid}/favorites/{id}"))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(uid).map(|u| u.clone()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let mut entry = self.users.entry(user.uid.clone()).or_default();
        let fcm_token = entry.fcm_token.take();
        *entry = User {
            fcm_token,
            ..user.clone()
        };
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by(|a, b| a.uid.cmp(&b.uid));
        Ok(users)
    }

    async fn set_device_token(&self, uid: &str, token: &str) -> Result<(), AppError> {
        let mut entry = self.users.entry(uid.to_string()).or_insert_with(|| User {
            uid: uid.to_string(),
            ..User::default()
        });
        entry.fcm_token = Some(token.to_string());
        Ok(())
    }

    async fn delete_device_token(&self, uid: &str) -> Result<(), AppError> {
        if let Some(mut user) = self.users.get_mut(uid) {
            user.fcm_token = None;
        }
        Ok(())
    }

    async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>, AppError> {
        Ok(self
            .favorites
            .get(uid)
            .map(|favs| favs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_favorite(&self, uid: &str, id: &str) -> Result<Option<Favorite>, AppError> {
        Ok(self
            .favorites
            .get(uid)
            .and_then(|favs| favs.get(id).cloned()))
    }

    async fn set_favorite(&self, uid: &str, favorite: &Favorite) -> Result<(), AppError> {
        self.favorites
            .entry(uid.to_string())
            .or_default()
            .insert(favorite.id.clone(), favorite.clone());
        Ok(())
    }

    async fn update_favorite_status(
        &self,
        uid: &str,
        id: &str,
        field: StatusField,
        status: &PlanningStatus,
        updated_at: &str,
    ) -> Result<(), AppError> {
        let mut favs = self
            .favorites
            .get_mut(uid)
            .ok_or_else(|| Self::missing_favorite(uid, id))?;
        let favorite = favs
            .get_mut(id)
            .ok_or_else(|| Self::missing_favorite(uid, id))?;

        match field {
            StatusField::Application => favorite.status.application = status.application,
            StatusField::Accommodation => favorite.status.accommodation = status.accommodation,
            StatusField::Transportation => {
                favorite.status.transportation = status.transportation
            }
        }
        favorite.updated_at = updated_at.to_string();
        Ok(())
    }

    async fn mark_notification_sent(
        &self,
        uid: &str,
        id: &str,
        milestone: Milestone,
    ) -> Result<(), AppError> {
        let mut favs = self
            .favorites
            .get_mut(uid)
            .ok_or_else(|| Self::missing_favorite(uid, id))?;
        let favorite = favs
            .get_mut(id)
            .ok_or_else(|| Self::missing_favorite(uid, id))?;
        favorite.notification_sent.set(milestone);
        Ok(())
    }

    async fn delete_favorite(&self, uid: &str, id: &str) -> Result<(), AppError> {
        if let Some(mut favs) = self.favorites.get_mut(uid) {
            favs.remove(id);
        }
        Ok(())
    }
}
