pub mod models {
    pub mod player;
    pub mod stats;
    pub mod ranking;
    pub mod catalog;
    pub mod leaderboard;
}

pub mod dto {
    pub mod mediator;
}

pub mod error;

// Re-export commonly used items
pub use error::{SharedError, Result};

// Re-export models
pub use models::{
    player::{Player, is_wallet_address},
    stats::{StatCategory, TimePeriod, CountRecord, PlayerStats},
    ranking::{ItemId, RankingEntry, RankLabel, RankingTable, assign_ranks, compare_names},
    catalog::{Catalog, CatalogKind, DisplayInfo},
    leaderboard::{ScoringCategory, CategoryTotals, LeaderboardScore, Standing},
};

// Re-export DTOs
pub use dto::mediator::{
    PlayerStatsPayload, KillStatsRow, PlayerSearchResponse, ItemCatalogPayload, EnemyCatalogPayload,
};
