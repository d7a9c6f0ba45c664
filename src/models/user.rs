// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// Stored at: `users/{uid}`. Favorites live in the `favorites`
/// sub-collection underneath.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity provider user id (also used as document ID)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub uid: String,
    /// Display name from the identity provider
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Push device token. Deleted as a field when delivery reports it
    /// unregistered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
    /// When user first signed in
    #[serde(default)]
    pub created_at: String,
    /// Last sign-in timestamp
    #[serde(default)]
    pub last_active: String,
}
