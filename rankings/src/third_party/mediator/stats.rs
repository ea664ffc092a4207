use serde::de::DeserializeOwned;
use shared::{
    EnemyCatalogPayload, ItemCatalogPayload, KillStatsRow, PlayerSearchResponse, PlayerStatsPayload,
    Result, SharedError, TimePeriod,
};

use crate::config::ApiConfig;
use crate::stats::client::StatsApi;

/// `valueid` of the kill-stats ranking used to list active players
const ROSTER_VALUE_ID: &str = "2";

/// HTTP client for the Bitmates mediator API
#[derive(Clone)]
pub struct MediatorService {
    game_api_url: String,
    highscore_api_url: String,
    client: reqwest::Client,
}

impl MediatorService {
    pub fn new_with_config(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SharedError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            game_api_url: trim_base(&config.game_api_url),
            highscore_api_url: trim_base(&config.highscore_api_url),
            client,
        })
    }

    pub fn new_with_urls(game_api_url: &str, highscore_api_url: &str) -> Self {
        Self {
            game_api_url: trim_base(game_api_url),
            highscore_api_url: trim_base(highscore_api_url),
            client: reqwest::Client::new(),
        }
    }

    fn items_url(&self) -> String {
        format!("{}/items", self.game_api_url)
    }

    fn enemies_url(&self) -> String {
        format!("{}/enemies", self.game_api_url)
    }

    fn player_stats_url(&self) -> String {
        format!("{}/playerstats/", self.game_api_url)
    }

    fn kill_stats_url(&self) -> String {
        format!("{}/killstats", self.game_api_url)
    }

    fn player_search_url(&self, term: &str) -> String {
        format!("{}/player/{}", self.highscore_api_url, urlencoding::encode(term))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        log::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| SharedError::Fetch(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SharedError::Fetch(format!("HTTP error! status: {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SharedError::Fetch(format!("Failed to read body from {}: {}", url, e)))?;

        serde_json::from_str(&body).map_err(|e| {
            SharedError::Parse(format!(
                "Unexpected response from {}: {} (body preview: {})",
                url,
                e,
                &body[..floor_char_boundary(&body, 200)]
            ))
        })
    }
}

#[async_trait::async_trait]
impl StatsApi for MediatorService {
    async fn item_catalog(&self) -> Result<ItemCatalogPayload> {
        self.get_json(&self.items_url(), &[]).await
    }

    async fn enemy_catalog(&self) -> Result<EnemyCatalogPayload> {
        self.get_json(&self.enemies_url(), &[]).await
    }

    async fn player_stats(&self, name: &str) -> Result<PlayerStatsPayload> {
        self.get_json(&self.player_stats_url(), &[("username", name.to_string())])
            .await
    }

    async fn search_player(&self, term: &str) -> Result<PlayerSearchResponse> {
        self.get_json(&self.player_search_url(term), &[]).await
    }

    async fn kill_stats_page(&self, period: TimePeriod, page: u32) -> Result<Vec<KillStatsRow>> {
        let params = [
            ("valueid", ROSTER_VALUE_ID.to_string()),
            ("time", period.to_string()),
            ("page", page.to_string()),
            // defeats intermediate caches, the ranking changes constantly
            ("_", chrono::Utc::now().timestamp_millis().to_string()),
        ];
        self.get_json(&self.kill_stats_url(), &params).await
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|i| s.is_char_boundary(*i)).unwrap_or(0)
}
