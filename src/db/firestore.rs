// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Firestore client wrapper with typed operations.
//!
//! Layout (shared with the browser client):
//! - `users/{uid}` (profile and `fcmToken`)
//! - `users/{uid}/favorites/{marathonId}`

use crate::db::{collections, Store};
use crate::entry::Milestone;
use crate::error::AppError;
use crate::models::{Favorite, NotificationSent, PlanningStatus, StatusField, User};
use async_trait::async_trait;
use firestore::FirestoreWritePrecondition;
use serde::{Deserialize, Serialize};

/// Profile fields written by `upsert_user`. `fcmToken` is not among them.
const PROFILE_FIELDS: [&str; 4] = ["displayName", "photoUrl", "createdAt", "lastActive"];
const TOKEN_FIELD: &str = "fcmToken";
const UPDATED_AT_FIELD: &str = "updatedAt";

/// Partial document for token writes. With the field in the update mask, a
/// `None` here deletes it.
///
/// Update objects must round-trip through serde, so patches own their data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fcm_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusPatch {
    status: PlanningStatus,
    updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPatch {
    notification_sent: NotificationSent,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client. Every operation returns a database error.
    pub fn new_offline() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Path of `users/{uid}`, parent of the favorites sub-collection.
    fn user_path(&self, uid: &str) -> Result<firestore::ParentPathBuilder, AppError> {
        self.get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn write_token(&self, uid: &str, token: Option<&str>) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields([TOKEN_FIELD])
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&TokenPatch {
                fcm_token: token.map(str::to_string),
            })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(PROFILE_FIELDS)
            .in_col(collections::USERS)
            .document_id(&user.uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Device Token Operations ─────────────────────────────────

    async fn set_device_token(&self, uid: &str, token: &str) -> Result<(), AppError> {
        self.write_token(uid, Some(token)).await
    }

    async fn delete_device_token(&self, uid: &str) -> Result<(), AppError> {
        self.write_token(uid, None).await
    }

    // ─── Favorite Operations ─────────────────────────────────────

    async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>, AppError> {
        let parent = self.user_path(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FAVORITES)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_favorite(&self, uid: &str, id: &str) -> Result<Option<Favorite>, AppError> {
        let parent = self.user_path(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FAVORITES)
            .parent(&parent)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_favorite(&self, uid: &str, favorite: &Favorite) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FAVORITES)
            .document_id(&favorite.id)
            .parent(&parent)
            .object(favorite)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
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
        let parent = self.user_path(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields([field.field_path(), UPDATED_AT_FIELD])
            .in_col(collections::FAVORITES)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(id)
            .parent(&parent)
            .object(&StatusPatch {
                status: *status,
                updated_at: updated_at.to_string(),
            })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn mark_notification_sent(
        &self,
        uid: &str,
        id: &str,
        milestone: Milestone,
    ) -> Result<(), AppError> {
        let mut notification_sent = NotificationSent::default();
        notification_sent.set(milestone);

        let parent = self.user_path(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields([milestone.flag_field()])
            .in_col(collections::FAVORITES)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(id)
            .parent(&parent)
            .object(&NotificationPatch { notification_sent })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_favorite(&self, uid: &str, id: &str) -> Result<(), AppError> {
        let parent = self.user_path(uid)?;
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FAVORITES)
            .document_id(id)
            .parent(&parent)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
