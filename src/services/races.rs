// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Race catalog loading and listing filters.

use crate::entry::{classify, EntryStatus};
use crate::models::race::{RaceRecord, RaceType};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Shape of the catalog file.
#[derive(Deserialize)]
struct CatalogFile {
    marathons: Vec<RaceRecord>,
}

/// Distance filter for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Full,
    Ultra,
}

impl TypeFilter {
    fn matches(self, race_type: RaceType) -> bool {
        match self {
            Self::All => true,
            Self::Full => race_type == RaceType::FullMarathon,
            Self::Ultra => race_type == RaceType::UltraMarathon,
        }
    }
}

/// Listing filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaceFilter {
    pub race_type: TypeFilter,
    /// Keep only races currently accepting entries (open or lottery).
    pub open_only: bool,
    /// Keep only races in the caller's favorites.
    pub favorites_only: bool,
}

/// A catalog race with its id and status as of a given day.
#[derive(Debug, Clone)]
pub struct ListedRace<'a> {
    pub id: &'a str,
    pub race: &'a RaceRecord,
    pub status: EntryStatus,
}

/// Read-only race catalog, loaded once at startup.
#[derive(Default, Clone)]
pub struct RaceCatalog {
    races: Arc<Vec<(String, RaceRecord)>>,
    index: Arc<HashMap<String, usize>>,
}

impl RaceCatalog {
    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json_data).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        Ok(Self::from_races(file.marathons))
    }

    /// Build a catalog from already-decoded records.
    pub fn from_races(races: Vec<RaceRecord>) -> Self {
        let mut entries = Vec::with_capacity(races.len());
        let mut index = HashMap::with_capacity(races.len());

        for race in races {
            let id = race.id();
            if index.contains_key(&id) {
                // Same (name, date) hash: the later record is unreachable by id.
                tracing::warn!(id = %id, name = %race.name, "Duplicate race id in catalog");
            } else {
                index.insert(id.clone(), entries.len());
            }
            entries.push((id, race));
        }

        tracing::info!(count = entries.len(), "Loaded race catalog");
        Self {
            races: Arc::new(entries),
            index: Arc::new(index),
        }
    }

    pub fn len(&self) -> usize {
        self.races.len()
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }

    /// Look up a race by derived id.
    pub fn find(&self, id: &str) -> Option<&RaceRecord> {
        self.index.get(id).map(|&i| &self.races[i].1)
    }

    /// List races in catalog order, classified as of `today`.
    pub fn list(
        &self,
        filter: RaceFilter,
        favorite_ids: &HashSet<String>,
        today: NaiveDate,
    ) -> Vec<ListedRace<'_>> {
        self.races
            .iter()
            .filter(|(_, race)| filter.race_type.matches(race.race_type))
            .filter(|(id, _)| !filter.favorites_only || favorite_ids.contains(id))
            .map(|(id, race)| ListedRace {
                id,
                race,
                status: classify(race, today),
            })
            .filter(|listed| !filter.open_only || listed.status.status.is_accepting())
            .collect()
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse race catalog: {0}")]
    ParseError(String),
}
