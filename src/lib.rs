// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Marathon Calendar: favorites, planning status and entry reminders
//!
//! This crate provides the backend API for the marathon calendar: users
//! favorite races from the catalog, track their planning state per race,
//! and get a push reminder seven days and one day before registration opens.

pub mod config;
pub mod db;
pub mod entry;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use anyhow::Context;
use chrono::NaiveDate;
use config::{Config, StoreBackend};
use db::{FirestoreDb, MemoryStore, Store};
use services::{
    FavoritesService, FcmClient, GoogleOidcVerifier, Notifier, PushSender, RaceCatalog,
    TokenProfile,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub catalog: RaceCatalog,
    pub push: Arc<dyn PushSender>,
    /// Verifies Firebase ID tokens at sign-in.
    pub firebase_verifier: Arc<GoogleOidcVerifier>,
    /// Verifies Cloud Scheduler OIDC tokens on `/tasks/*`.
    pub scheduler_verifier: Arc<GoogleOidcVerifier>,
}

impl AppState {
    /// Connect every production collaborator described by `config`.
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.store_backend {
            StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        tracing::info!(path = %config.races_path, "Loading race catalog");
        let catalog = RaceCatalog::load_from_file(&config.races_path)
            .with_context(|| format!("failed loading race catalog {}", config.races_path))?;

        let push: Arc<dyn PushSender> = Arc::new(FcmClient::new(&config.gcp_project_id).await?);

        let firebase_verifier = Arc::new(GoogleOidcVerifier::new(TokenProfile::firebase(
            &config.firebase_project_id,
        ))?);
        let scheduler_verifier = Arc::new(GoogleOidcVerifier::new(TokenProfile::scheduler(
            &config.api_url,
            &config.scheduler_service_account,
        ))?);

        Ok(Self {
            config,
            store,
            catalog,
            push,
            firebase_verifier,
            scheduler_verifier,
        })
    }

    pub fn favorites(&self) -> FavoritesService {
        FavoritesService::new(self.store.clone(), self.catalog.clone())
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(
            self.store.clone(),
            self.push.clone(),
            &self.config.default_notification_url,
        )
    }

    /// Today's date on the reminder calendar.
    pub fn today(&self) -> NaiveDate {
        time_utils::today_in(self.config.notify_utc_offset)
    }
}

/// Initialize structured JSON logging (GCP-compliant).
pub fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("marathon_calendar=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
