// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects secrets (the session signing key) as environment
//! variables through secret bindings, so everything is read from the
//! environment once at startup. A `.env` file is honored for local runs.

use chrono::FixedOffset;
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// Process-local maps; data is lost on restart.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project hosting Firestore, FCM and the scheduler
    pub gcp_project_id: String,
    /// Firebase project whose ID tokens are accepted (usually the same)
    pub firebase_project_id: String,
    /// Browser origin allowed by CORS
    pub frontend_url: String,
    /// Public URL of this service; audience of scheduler OIDC tokens
    pub api_url: String,
    pub port: u16,
    /// HS256 key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// Race catalog JSON file
    pub races_path: String,
    /// Offset of the calendar used for "today" (Japan by default)
    pub notify_utc_offset: FixedOffset,
    /// Expected `x-cloudscheduler-jobname` header value
    pub scheduler_job_name: String,
    /// Service account the scheduler signs its OIDC tokens as
    pub scheduler_service_account: String,
    /// Link used when a favorite has no race URL
    pub default_notification_url: String,
    pub store_backend: StoreBackend,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let gcp_project_id = get("GCP_PROJECT_ID", "local-dev");
        let firebase_project_id = get("FIREBASE_PROJECT_ID", &gcp_project_id);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            None => DEFAULT_PORT,
        };

        let session_signing_key = lookup("SESSION_SIGNING_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("SESSION_SIGNING_KEY"))?
            .into_bytes();

        let offset_hours = match lookup("NOTIFY_UTC_OFFSET_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::Invalid("NOTIFY_UTC_OFFSET_HOURS", raw.clone()))?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let notify_utc_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
            ConfigError::Invalid("NOTIFY_UTC_OFFSET_HOURS", offset_hours.to_string())
        })?;

        let store_backend = match get("STORE_BACKEND", "firestore").as_str() {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        let scheduler_service_account = get(
            "SCHEDULER_SERVICE_ACCOUNT",
            &format!("marathon-scheduler@{}.iam.gserviceaccount.com", gcp_project_id),
        );

        Ok(Self {
            firebase_project_id,
            frontend_url: get("FRONTEND_URL", "http://localhost:5173"),
            api_url: get("API_URL", &format!("http://localhost:{}", port)),
            port,
            session_signing_key,
            races_path: get("RACES_PATH", "data/marathons.json"),
            notify_utc_offset,
            scheduler_job_name: get("SCHEDULER_JOB_NAME", "send-notifications"),
            scheduler_service_account,
            default_notification_url: get("DEFAULT_NOTIFICATION_URL", "/mypage.html"),
            store_backend,
            gcp_project_id,
        })
    }

    /// Config for tests: in-memory store, fixed key, Tokyo offset.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            firebase_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            api_url: "http://localhost:8080".to_string(),
            port: DEFAULT_PORT,
            session_signing_key: b"test_session_key_32_bytes_minimum".to_vec(),
            races_path: "data/marathons.json".to_string(),
            notify_utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600)
                .expect("UTC+9 is a valid offset"),
            scheduler_job_name: "send-notifications".to_string(),
            scheduler_service_account: "marathon-scheduler@test-project.iam.gserviceaccount.com"
                .to_string(),
            default_notification_url: "/mypage.html".to_string(),
            store_backend: StoreBackend::Memory,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[
            ("SESSION_SIGNING_KEY", "k"),
            ("GCP_PROJECT_ID", "marathon-cal"),
        ]))
        .unwrap();

        assert_eq!(config.firebase_project_id, "marathon-cal");
        assert_eq!(config.port, 8080);
        assert_eq!(config.notify_utc_offset.local_minus_utc(), 9 * 3600);
        assert_eq!(config.scheduler_job_name, "send-notifications");
        assert_eq!(
            config.scheduler_service_account,
            "marathon-scheduler@marathon-cal.iam.gserviceaccount.com"
        );
        assert_eq!(config.store_backend, StoreBackend::Firestore);
        assert_eq!(config.default_notification_url, "/mypage.html");
    }

    #[test]
    fn signing_key_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SESSION_SIGNING_KEY")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (key, value) in [
            ("PORT", "http"),
            ("NOTIFY_UTC_OFFSET_HOURS", "30"),
            ("STORE_BACKEND", "redis"),
        ] {
            let result = Config::from_lookup(lookup(&[("SESSION_SIGNING_KEY", "k"), (key, value)]));
            assert!(
                matches!(result, Err(ConfigError::Invalid(k, _)) if k == key),
                "{key}={value}"
            );
        }
    }
}
