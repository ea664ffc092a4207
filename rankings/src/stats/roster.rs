use std::collections::HashSet;
use std::sync::Arc;
use log::{debug, error, info, warn};
use shared::Player;

use crate::config::RosterConfig;
use crate::stats::client::StatsApi;

/// Pages through the kill-stats ranking to collect the active players
pub struct PlayerRoster<A: StatsApi> {
    api: Arc<A>,
    config: RosterConfig,
}

impl<A: StatsApi> PlayerRoster<A> {
    pub fn new(api: Arc<A>, config: RosterConfig) -> Self {
        Self { api, config }
    }

    /// Requests pages 1, 2, ... until a page is empty, a page has no active
    /// player, a request fails, or the page ceiling is hit. Players collected
    /// before the stop are kept.
    pub async fn fetch_active_roster(&self) -> Vec<Player> {
        let mut players = Vec::new();
        let mut seen = HashSet::new();
        let mut total_before_filter = 0usize;
        let mut page = 1u32;

        loop {
            if page > self.config.max_pages {
                warn!(
                    "Stopping roster paging at the {} page ceiling; the API kept returning players",
                    self.config.max_pages
                );
                break;
            }

            let rows = match self.api.kill_stats_page(self.config.period, page).await {
                Ok(rows) => rows,
                Err(e) => {
                    error!("Error fetching players on page {}: {}", page, e);
                    break;
                }
            };

            if rows.is_empty() {
                debug!("Page {} is empty, roster complete", page);
                break;
            }
            total_before_filter += rows.len();

            let active: Vec<_> = rows
                .into_iter()
                .filter(|row| row.activity() >= self.config.activity_threshold)
                .collect();
            debug!("Page {}: {} active players", page, active.len());

            if active.is_empty() {
                break;
            }

            for row in active {
                if seen.insert(row.name.clone()) {
                    players.push(Player::new(row.name));
                }
            }
            page += 1;
        }

        info!(
            "Total active players: {} ({} listed before filtering)",
            players.len(),
            total_before_filter
        );
        players
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::mock_api::MockStatsApi;
    use pretty_assertions::assert_eq;
    use shared::{KillStatsRow, TimePeriod};
    use test_log::test;

    fn config(max_pages: u32) -> RosterConfig {
        RosterConfig {
            period: TimePeriod::Monthly,
            activity_threshold: 1.0,
            max_pages,
        }
    }

    fn names(players: &[Player]) -> Vec<&str> {
        players.iter().map(|p| p.name.as_str()).collect()
    }

    #[test(tokio::test)]
    async fn test_stops_on_empty_page() {
        let page: Vec<KillStatsRow> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| KillStatsRow::new(*n, 5))
            .collect();
        let api = Arc::new(MockStatsApi::default().with_page(page));

        let roster = PlayerRoster::new(api.clone(), config(200)).fetch_active_roster().await;

        assert_eq!(roster.len(), 5);
        assert_eq!(api.page_calls(), 2);
    }

    #[test(tokio::test)]
    async fn test_filters_inactive_and_stops_on_inactive_page() {
        let api = Arc::new(
            MockStatsApi::default()
                .with_page(vec![KillStatsRow::new("Alice", 3), KillStatsRow::new("Bob", 0)])
                .with_page(vec![KillStatsRow::new("Carol", 0)])
                .with_page(vec![KillStatsRow::new("Dave", 9)]),
        );

        let roster = PlayerRoster::new(api.clone(), config(200)).fetch_active_roster().await;

        assert_eq!(names(&roster), vec!["Alice"]);
        assert_eq!(api.page_calls(), 2);
    }

    #[test(tokio::test)]
    async fn test_error_keeps_partial_roster() {
        let api = Arc::new(
            MockStatsApi::default()
                .with_page(vec![KillStatsRow::new("Alice", 3)])
                .with_failing_page()
                .with_page(vec![KillStatsRow::new("Bob", 3)]),
        );

        let roster = PlayerRoster::new(api.clone(), config(200)).fetch_active_roster().await;

        assert_eq!(names(&roster), vec!["Alice"]);
        assert_eq!(api.page_calls(), 2);
    }

    #[test(tokio::test)]
    async fn test_page_ceiling_bounds_misbehaving_api() {
        let api = Arc::new(MockStatsApi {
            endless: true,
            ..Default::default()
        });

        let roster = PlayerRoster::new(api.clone(), config(7)).fetch_active_roster().await;

        assert_eq!(roster.len(), 7);
        assert_eq!(api.page_calls(), 7);
    }

    #[test(tokio::test)]
    async fn test_duplicate_names_listed_once() {
        let api = Arc::new(
            MockStatsApi::default()
                .with_page(vec![KillStatsRow::new("Alice", 3), KillStatsRow::new("Bob", 2)])
                .with_page(vec![KillStatsRow::new("Bob", 2), KillStatsRow::new("Carol", 1)]),
        );

        let roster = PlayerRoster::new(api, config(200)).fetch_active_roster().await;

        assert_eq!(names(&roster), vec!["Alice", "Bob", "Carol"]);
    }
}
