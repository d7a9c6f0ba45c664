// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Run the reminder job once and exit.
//!
//! Usage: `send-notifications [YYYY-MM-DD]`
//!
//! Without an argument the job runs for today on the reminder calendar. A
//! date argument replays that day, e.g. after a missed scheduler run.

use chrono::NaiveDate;
use marathon_calendar::{config::Config, init_logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    let state = AppState::initialize(config).await?;

    let today = match std::env::args().nth(1) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("invalid date {:?}: {}", raw, e))?,
        None => state.today(),
    };

    let summary = state.notifier().run(today).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
