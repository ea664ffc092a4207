//! Payload shapes of the Bitmates mediator API.
//!
//! The API is external and loosely typed, so most fields are optional and
//! converted into the strict models in `crate::models`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::models::player::Player;
use crate::models::ranking::ItemId;
use crate::models::stats::{coerce_number, CountRecord, PlayerStats, StatCategory};

/// `GET /playerstats/?username=<name>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStatsPayload {
    #[serde(default)]
    pub items_gathered_counts: Option<HashMap<String, CountRecord>>,
    #[serde(default)]
    pub items_crafted_counts: Option<HashMap<String, CountRecord>>,
    #[serde(default)]
    pub items_rewarded_counts: Option<HashMap<String, CountRecord>>,
    #[serde(default)]
    pub killcounts: Option<HashMap<String, CountRecord>>,
}

impl PlayerStatsPayload {
    fn take(&mut self, category: StatCategory) -> Option<HashMap<String, CountRecord>> {
        match category {
            StatCategory::Gathered => self.items_gathered_counts.take(),
            StatCategory::Crafted => self.items_crafted_counts.take(),
            StatCategory::Rewarded => self.items_rewarded_counts.take(),
            StatCategory::Kills => self.killcounts.take(),
        }
    }
}

impl From<PlayerStatsPayload> for PlayerStats {
    fn from(mut payload: PlayerStatsPayload) -> Self {
        let mut stats = PlayerStats::default();
        for category in StatCategory::ALL {
            if let Some(counts) = payload.take(category) {
                *stats.category_mut(category) = counts
                    .into_iter()
                    .map(|(id, record)| (ItemId::from(id), record))
                    .collect();
            }
        }
        stats
    }
}

/// One row of `GET /killstats?valueid=2&time=<period>&page=<n>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillStatsRow {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl KillStatsRow {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Activity value of the row; non-numeric values count as no activity
    pub fn activity(&self) -> f64 {
        coerce_number(&self.value)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// `GET /player/<term>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSearchResponse {
    #[serde(default)]
    pub data: Option<PlayerSearchData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSearchData {
    #[serde(default)]
    pub name: Option<String>,
}

impl PlayerSearchResponse {
    /// The canonical player, when the response names one
    pub fn into_player(self) -> Option<Player> {
        self.data
            .and_then(|data| data.name)
            .filter(|name| !name.trim().is_empty())
            .map(Player::new)
    }
}

/// Entry of `GET /items`, which maps id -> `{ name }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemNameDto {
    #[serde(default)]
    pub name: Option<String>,
}

pub type ItemCatalogPayload = HashMap<String, ItemNameDto>;

/// `GET /enemies` maps id -> name directly
pub type EnemyCatalogPayload = HashMap<String, String>;

pub fn item_names(payload: ItemCatalogPayload) -> HashMap<ItemId, String> {
    payload
        .into_iter()
        .filter_map(|(id, item)| item.name.map(|name| (ItemId::from(id), name)))
        .collect()
}

pub fn enemy_names(payload: EnemyCatalogPayload) -> HashMap<ItemId, String> {
    payload
        .into_iter()
        .map(|(id, name)| (ItemId::from(id), name))
        .collect()
}
