pub mod config;
pub mod export;
pub mod third_party;

pub mod stats {
    pub mod client;
    pub mod roster;

    #[cfg(test)]
    pub(crate) mod mock_api;
    #[cfg(test)]
    mod client_tests;

    pub use client::{Catalogs, StatsApi, StatsClient};
    pub use roster::PlayerRoster;
}

pub mod ranking {
    pub mod aggregator;
    pub mod scoring;
    pub mod totals;
    pub mod usecase;
    pub mod view;

    #[cfg(test)]
    mod usecase_tests;

    pub use aggregator::RankingAggregator;
    pub use scoring::{LeaderboardScorer, PointTable};
    pub use totals::TotalsCalculator;
    pub use usecase::{RankingOutcome, RankingReport, RankingService, RankingUseCase};
}

// Unit test modules only
#[cfg(test)]
mod config_tests;
