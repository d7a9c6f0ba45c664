// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Daily reminder job.
//!
//! Handles the core workflow:
//! 1. List every user; skip those without a device token
//! 2. Evaluate each favorite against today's date
//! 3. Send the milestone reminder
//! 4. Set the milestone flag only after a confirmed send
//! 5. Delete the device token when delivery reports it unregistered
//!
//! Users are processed concurrently. Favorites of one user are processed in
//! order so each flag write follows its send, and a removed token is never
//! used again within the run. A failure on one favorite is logged and the
//! run continues; the next daily run is the retry.

use crate::db::Store;
use crate::entry::{evaluate, Milestone};
use crate::error::Result;
use crate::models::{Favorite, User};
use crate::services::favorites::favorite_entry_start;
use crate::services::push::{PushError, PushMessage, PushSender};
use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_CONCURRENT_USERS: usize = 16;

/// Counters for one run of the job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunSummary {
    pub users: usize,
    pub users_without_token: usize,
    pub favorites_checked: usize,
    pub sent: usize,
    pub failed: usize,
    pub tokens_removed: usize,
}

impl RunSummary {
    fn merge(mut self, other: Self) -> Self {
        self.users += other.users;
        self.users_without_token += other.users_without_token;
        self.favorites_checked += other.favorites_checked;
        self.sent += other.sent;
        self.failed += other.failed;
        self.tokens_removed += other.tokens_removed;
        self
    }
}

/// Reminder for a favorite whose registration opens in `days` days.
pub fn reminder_message(favorite: &Favorite, days: u64, default_url: &str) -> PushMessage {
    let url = if favorite.url.is_empty() {
        default_url.to_string()
    } else {
        favorite.url.clone()
    };

    PushMessage {
        title: format!("📅 申込開始まで{}日！", days),
        body: format!("{}の申込開始日が近づいています", favorite.marathon_name),
        data: BTreeMap::from([
            ("marathonId".to_string(), favorite.id.clone()),
            ("marathonName".to_string(), favorite.marathon_name.clone()),
            ("url".to_string(), url.clone()),
        ]),
        link: Some(url),
    }
}

/// Message for the manual delivery check.
pub fn test_message(body: Option<&str>) -> PushMessage {
    PushMessage {
        title: "🏃 通知テスト".to_string(),
        body: body
            .filter(|b| !b.is_empty())
            .unwrap_or("テスト通知が正常に送信されました")
            .to_string(),
        ..Default::default()
    }
}

pub struct Notifier {
    store: Arc<dyn Store>,
    push: Arc<dyn PushSender>,
    default_url: String,
}

impl Notifier {
    pub fn new(store: Arc<dyn Store>, push: Arc<dyn PushSender>, default_url: &str) -> Self {
        Self {
            store,
            push,
            default_url: default_url.to_string(),
        }
    }

    /// Run the job for `today`.
    ///
    /// Only a failure to list users fails the run.
    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary> {
        tracing::info!(%today, "Reminder run started");

        let users = self.store.list_users().await?;

        let summary = stream::iter(users)
            .map(|user| self.process_user(user, today))
            .buffer_unordered(MAX_CONCURRENT_USERS)
            .fold(RunSummary::default(), |acc, s| async move { acc.merge(s) })
            .await;

        tracing::info!(
            %today,
            users = summary.users,
            sent = summary.sent,
            failed = summary.failed,
            tokens_removed = summary.tokens_removed,
            "Reminder run finished"
        );
        Ok(summary)
    }

    async fn process_user(&self, user: User, today: NaiveDate) -> RunSummary {
        let mut summary = RunSummary {
            users: 1,
            ..Default::default()
        };

        let Some(token) = user.fcm_token.as_deref().filter(|t| !t.is_empty()) else {
            tracing::debug!(uid = %user.uid, "No device token, skipping user");
            summary.users_without_token = 1;
            return summary;
        };

        let favorites = match self.store.list_favorites(&user.uid).await {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(uid = %user.uid, error = %e, "Failed to list favorites");
                summary.failed += 1;
                return summary;
            }
        };

        for favorite in favorites {
            summary.favorites_checked += 1;

            let eligibility = evaluate(
                favorite_entry_start(&favorite),
                today,
                favorite.notification_sent,
            );
            let Some(milestone) = eligibility.kind else {
                continue;
            };

            match self
                .deliver(&user.uid, token, &favorite, milestone, eligibility.days_until)
                .await
            {
                Delivery::Sent => summary.sent += 1,
                Delivery::Failed => summary.failed += 1,
                Delivery::TokenRemoved => {
                    summary.failed += 1;
                    summary.tokens_removed += 1;
                    break;
                }
            }
        }

        summary
    }

    async fn deliver(
        &self,
        uid: &str,
        token: &str,
        favorite: &Favorite,
        milestone: Milestone,
        days: u64,
    ) -> Delivery {
        let message = reminder_message(favorite, days, &self.default_url);

        match self.push.send(token, &message).await {
            Ok(()) => {
                tracing::info!(
                    uid,
                    marathon_id = %favorite.id,
                    marathon = %favorite.marathon_name,
                    ?milestone,
                    "Reminder sent"
                );
                if let Err(e) = self
                    .store
                    .mark_notification_sent(uid, &favorite.id, milestone)
                    .await
                {
                    // The reminder may go out again on a later matching day.
                    tracing::error!(
                        uid,
                        marathon_id = %favorite.id,
                        error = %e,
                        "Failed to set notification flag"
                    );
                }
                Delivery::Sent
            }
            Err(PushError::Unregistered) => {
                tracing::warn!(uid, marathon_id = %favorite.id, "Device token unregistered, removing");
                if let Err(e) = self.store.delete_device_token(uid).await {
                    tracing::error!(uid, error = %e, "Failed to delete device token");
                }
                Delivery::TokenRemoved
            }
            Err(e) => {
                tracing::error!(
                    uid,
                    marathon_id = %favorite.id,
                    error = %e,
                    "Reminder delivery failed"
                );
                Delivery::Failed
            }
        }
    }
}

enum Delivery {
    Sent,
    Failed,
    TokenRemoved,
}
