// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Services module - business logic layer.

pub mod favorites;
pub mod google_oidc;
pub mod notifier;
pub mod push;
pub mod races;

pub use favorites::{FavoriteView, FavoritesService};
pub use google_oidc::{
    FirebaseIdentity, GoogleOidcVerifier, OidcError, TokenProfile, VerifiedTaskPrincipal,
};
pub use notifier::{Notifier, RunSummary};
pub use push::{FcmClient, PushError, PushMessage, PushSender};
pub use races::{RaceCatalog, RaceFilter, TypeFilter};
