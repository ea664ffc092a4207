use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use serde_json::Value;
use shared::{
    EnemyCatalogPayload, ItemCatalogPayload, KillStatsRow, PlayerSearchResponse, PlayerStatsPayload,
    Result, SharedError, TimePeriod,
};

use crate::stats::client::StatsApi;

/// In-memory mediator API for unit tests
#[derive(Default)]
pub(crate) struct MockStatsApi {
    /// `None` makes the catalog request fail
    pub items: Option<ItemCatalogPayload>,
    pub enemies: Option<EnemyCatalogPayload>,
    /// Raw stats payloads by player name; missing names fail with HTTP 404
    pub stats: HashMap<String, Value>,
    /// Search term -> canonical player name
    pub players: HashMap<String, String>,
    /// Kill-stats pages in order; pages past the end come back empty
    pub pages: Vec<Result<Vec<KillStatsRow>>>,
    /// Every page returns one fresh active player
    pub endless: bool,
    pub page_calls: AtomicU32,
    pub stats_calls: Mutex<Vec<String>>,
}

impl MockStatsApi {
    pub fn with_player(mut self, name: &str, stats: Value) -> Self {
        self.players.insert(name.to_string(), name.to_string());
        self.stats.insert(name.to_string(), stats);
        self
    }

    pub fn with_page(mut self, rows: Vec<KillStatsRow>) -> Self {
        self.pages.push(Ok(rows));
        self
    }

    pub fn with_failing_page(mut self) -> Self {
        self.pages.push(Err(SharedError::Fetch("HTTP error! status: 500".to_string())));
        self
    }

    pub fn page_calls(&self) -> u32 {
        self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StatsApi for MockStatsApi {
    async fn item_catalog(&self) -> Result<ItemCatalogPayload> {
        self.items
            .clone()
            .ok_or_else(|| SharedError::Fetch("items unavailable".to_string()))
    }

    async fn enemy_catalog(&self) -> Result<EnemyCatalogPayload> {
        self.enemies
            .clone()
            .ok_or_else(|| SharedError::Fetch("enemies unavailable".to_string()))
    }

    async fn player_stats(&self, name: &str) -> Result<PlayerStatsPayload> {
        self.stats_calls.lock().unwrap().push(name.to_string());
        let raw = self
            .stats
            .get(name)
            .cloned()
            .ok_or_else(|| SharedError::Fetch("HTTP error! status: 404".to_string()))?;
        Ok(serde_json::from_value(raw)?)
    }

    async fn search_player(&self, term: &str) -> Result<PlayerSearchResponse> {
        let name = self
            .players
            .get(term)
            .ok_or_else(|| SharedError::Fetch("HTTP error! status: 404".to_string()))?;
        Ok(serde_json::from_value(serde_json::json!({ "data": { "name": name } }))?)
    }

    async fn kill_stats_page(&self, _period: TimePeriod, page: u32) -> Result<Vec<KillStatsRow>> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.endless {
            return Ok(vec![KillStatsRow::new(format!("player{}", page), 3)]);
        }
        self.pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
