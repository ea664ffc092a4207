use std::sync::Arc;
use futures::future::join_all;
use log::{debug, error, info, warn};
use shared::dto::mediator::{enemy_names, item_names};
use shared::{
    is_wallet_address, Catalog, CatalogKind, EnemyCatalogPayload, ItemCatalogPayload, KillStatsRow,
    Player, PlayerSearchResponse, PlayerStats, PlayerStatsPayload, Result, SharedError, TimePeriod,
};

/// Endpoint-level access to the mediator API
#[async_trait::async_trait]
pub trait StatsApi: Send + Sync {
    async fn item_catalog(&self) -> Result<ItemCatalogPayload>;
    async fn enemy_catalog(&self) -> Result<EnemyCatalogPayload>;
    async fn player_stats(&self, name: &str) -> Result<PlayerStatsPayload>;
    /// Looks up a player by name or wallet
    async fn search_player(&self, term: &str) -> Result<PlayerSearchResponse>;
    async fn kill_stats_page(&self, period: TimePeriod, page: u32) -> Result<Vec<KillStatsRow>>;
}

/// Item and enemy catalogs used for labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogs {
    pub items: Catalog,
    pub enemies: Catalog,
}

pub struct StatsClient<A: StatsApi> {
    api: Arc<A>,
    item_image_template: String,
    enemy_image_template: String,
}

impl<A: StatsApi> Clone for StatsClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            item_image_template: self.item_image_template.clone(),
            enemy_image_template: self.enemy_image_template.clone(),
        }
    }
}

impl<A: StatsApi> StatsClient<A> {
    pub fn new(api: Arc<A>, item_image_template: String, enemy_image_template: String) -> Self {
        Self {
            api,
            item_image_template,
            enemy_image_template,
        }
    }

    /// Resolves a 42-character `0x` wallet to its player
    pub async fn resolve_player_by_wallet(&self, address: &str) -> Result<Player> {
        if !is_wallet_address(address) {
            return Err(SharedError::Validation(format!("'{}' is not a wallet address", address)));
        }
        self.lookup_player(address).await
    }

    /// Resolves a search term, wallet or name, to the canonical player
    pub async fn resolve_search_term(&self, term: &str) -> Result<Player> {
        let term = term.trim();
        if is_wallet_address(term) {
            debug!("Search term {} looks like a wallet", term);
            return self.resolve_player_by_wallet(term).await;
        }
        self.lookup_player(term).await
    }

    async fn lookup_player(&self, term: &str) -> Result<Player> {
        match self.api.search_player(term).await {
            Ok(response) => response
                .into_player()
                .ok_or_else(|| SharedError::player_not_found(term)),
            Err(e) => {
                debug!("Player search for {} failed: {}", term, e);
                Err(SharedError::player_not_found(term))
            }
        }
    }

    pub async fn fetch_stats(&self, name: &str) -> Result<PlayerStats> {
        let payload = self.api.player_stats(name).await?;
        Ok(PlayerStats::from(payload))
    }

    /// Fetches stats for every player at once and waits for all of them.
    /// Players whose fetch fails are logged and left out.
    pub async fn fetch_all_stats(&self, players: &[Player]) -> Vec<(Player, PlayerStats)> {
        let results = join_all(players.iter().map(|player| self.fetch_stats(&player.name))).await;

        let collected: Vec<(Player, PlayerStats)> = players
            .iter()
            .zip(results)
            .filter_map(|(player, result)| match result {
                Ok(stats) => Some((player.clone(), stats)),
                Err(e) => {
                    error!("Error fetching data for {}: {}", player.name, e);
                    None
                }
            })
            .collect();

        info!("Fetched stats for {}/{} players", collected.len(), players.len());
        collected
    }

    /// Never fails: an unreachable catalog yields an empty one so labels
    /// fall back to "{Kind} {id}".
    pub async fn fetch_catalog(&self, kind: CatalogKind) -> Catalog {
        let result = match kind {
            CatalogKind::Items => self.api.item_catalog().await.map(item_names),
            CatalogKind::Enemies => self.api.enemy_catalog().await.map(enemy_names),
        };

        let template = match kind {
            CatalogKind::Items => &self.item_image_template,
            CatalogKind::Enemies => &self.enemy_image_template,
        };
        let catalog = Catalog::new(kind, template.clone());

        match result {
            Ok(names) => {
                debug!("Loaded {} {}", names.len(), kind);
                catalog.with_names(names)
            }
            Err(e) => {
                warn!("Could not load {} catalog, using fallback labels: {}", kind, e);
                catalog
            }
        }
    }

    pub async fn fetch_catalogs(&self) -> Catalogs {
        let (items, enemies) = futures::join!(
            self.fetch_catalog(CatalogKind::Items),
            self.fetch_catalog(CatalogKind::Enemies)
        );
        Catalogs { items, enemies }
    }
}
