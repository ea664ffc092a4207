use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use shared::{
    CategoryTotals, ItemId, LeaderboardScore, Player, RankingTable, Result, StatCategory, TimePeriod,
};
use tokio::sync::watch;

use crate::config::Config;
use crate::export::ExportFormatter;
use crate::ranking::aggregator::RankingAggregator;
use crate::ranking::scoring::LeaderboardScorer;
use crate::ranking::totals::TotalsCalculator;
use crate::ranking::view::{self, CategorySection, SearchScope, StandingRow, TotalsSection};
use crate::stats::client::{Catalogs, StatsApi, StatsClient};
use crate::stats::roster::PlayerRoster;

/// Everything one ranking request produced
#[derive(Debug, Clone)]
pub struct RankingReport {
    pub generation: u64,
    pub period: TimePeriod,
    pub generated_at: DateTime<Utc>,
    pub scope: SearchScope,
    pub boss_ids: BTreeSet<String>,
    pub catalogs: Catalogs,
    pub rankings: RankingTable,
    pub totals: CategoryTotals,
    pub leaderboard: LeaderboardScore,
}

impl RankingReport {
    pub fn ranking_sections(&self) -> Vec<CategorySection> {
        let calculator = TotalsCalculator::new(self.boss_ids.clone());
        view::ranking_sections(&self.rankings, &self.catalogs, &calculator, &self.scope)
    }

    pub fn totals_sections(&self) -> Vec<TotalsSection> {
        view::totals_sections(&self.totals, &self.scope)
    }

    pub fn leaderboard_rows(&self) -> Vec<StandingRow> {
        view::leaderboard_rows(&self.leaderboard, &self.scope)
    }

    /// Displayed rows of a single item as delimited text
    pub fn item_csv(
        &self,
        formatter: &ExportFormatter,
        category: StatCategory,
        item_id: &ItemId,
    ) -> Option<String> {
        let entries = self.rankings.get(&category)?.get(item_id)?;
        Some(formatter.item_export(&self.scope.apply(entries)))
    }

    /// Totals of every category, ignoring the search filter
    pub fn all_rankings_csv(&self, formatter: &ExportFormatter) -> String {
        formatter.all_rankings_export(&self.totals)
    }

    pub fn global_ranking_csv(&self, formatter: &ExportFormatter) -> String {
        formatter.global_ranking_export(&self.leaderboard_rows())
    }
}

#[derive(Debug, Clone)]
pub enum RankingOutcome {
    Current(Arc<RankingReport>),
    /// A newer request started before this one finished; its result was dropped
    Superseded { generation: u64 },
}

impl RankingOutcome {
    pub fn report(&self) -> Option<&Arc<RankingReport>> {
        match self {
            RankingOutcome::Current(report) => Some(report),
            RankingOutcome::Superseded { .. } => None,
        }
    }
}

#[async_trait::async_trait]
pub trait RankingUseCase: Send + Sync {
    /// Fails only when the search term does not resolve; the published
    /// report is then cleared to `None`
    async fn generate(&self, period: TimePeriod, search: Option<&str>) -> Result<RankingOutcome>;
    fn subscribe(&self) -> watch::Receiver<Option<Arc<RankingReport>>>;
}

pub struct RankingService<A: StatsApi> {
    client: StatsClient<A>,
    roster: PlayerRoster<A>,
    aggregator: RankingAggregator,
    totals: TotalsCalculator,
    scorer: LeaderboardScorer,
    boss_ids: BTreeSet<String>,
    latest_generation: AtomicU64,
    updates: watch::Sender<Option<Arc<RankingReport>>>,
}

impl<A: StatsApi> RankingService<A> {
    pub fn new(api: Arc<A>, config: &Config) -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            client: StatsClient::new(
                api.clone(),
                config.api.item_image_template.clone(),
                config.api.enemy_image_template.clone(),
            ),
            roster: PlayerRoster::new(api, config.roster.clone()),
            aggregator: RankingAggregator::new(),
            totals: TotalsCalculator::new(config.scoring.boss_ids.clone()),
            scorer: LeaderboardScorer::new(config.scoring.point_tables.clone()),
            boss_ids: config.scoring.boss_ids.clone(),
            latest_generation: AtomicU64::new(0),
            updates,
        }
    }

    pub fn scorer(&self) -> &LeaderboardScorer {
        &self.scorer
    }

    /// Most recently published report
    pub fn latest(&self) -> Option<Arc<RankingReport>> {
        self.updates.borrow().clone()
    }

    fn next_generation(&self) -> u64 {
        self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.latest_generation.load(Ordering::SeqCst) == generation
    }

    async fn run(
        &self,
        generation: u64,
        period: TimePeriod,
        search: Option<&str>,
    ) -> Result<RankingOutcome> {
        info!("Generating rankings #{} for period {}", generation, period);

        let searched = match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => match self.client.resolve_search_term(term).await {
                Ok(player) => Some(player),
                Err(e) => {
                    self.withdraw(generation);
                    return Err(e);
                }
            },
            None => None,
        };

        let (roster, catalogs) =
            futures::join!(self.roster.fetch_active_roster(), self.client.fetch_catalogs());

        let (scope, players) = match searched {
            None => (SearchScope::All, roster),
            Some(player) if roster.contains(&player) => {
                debug!("{} is in the roster", player);
                (SearchScope::Member(player.name), roster)
            }
            Some(player) => {
                debug!("{} is not in the roster, ranking them alone", player);
                (SearchScope::NonMember(player.name.clone()), vec![player])
            }
        };

        if players.is_empty() {
            warn!("No players to rank for period {}", period);
        }

        let report = self.build_report(generation, period, scope, catalogs, &players).await;
        Ok(self.publish(report))
    }

    async fn build_report(
        &self,
        generation: u64,
        period: TimePeriod,
        scope: SearchScope,
        catalogs: Catalogs,
        players: &[Player],
    ) -> RankingReport {
        let stats = self.client.fetch_all_stats(players).await;
        let rankings = self.aggregator.aggregate(&stats, period);
        let totals = self.totals.totals(&rankings);
        let leaderboard = self.scorer.score(&totals);

        RankingReport {
            generation,
            period,
            generated_at: Utc::now(),
            scope,
            boss_ids: self.boss_ids.clone(),
            catalogs,
            rankings,
            totals,
            leaderboard,
        }
    }

    /// Clears the published report when the latest request failed, so
    /// subscribers stop showing results for an earlier search
    fn withdraw(&self, generation: u64) {
        let cleared = self.updates.send_if_modified(|current| {
            if current.is_none() || !self.is_current(generation) {
                return false;
            }
            *current = None;
            true
        });
        if cleared {
            info!("Rankings #{} failed, withdrew the published report", generation);
        }
    }

    fn publish(&self, report: RankingReport) -> RankingOutcome {
        let generation = report.generation;
        let report = Arc::new(report);

        let published = self.updates.send_if_modified(|current| {
            let newer_shown = current.as_ref().is_some_and(|shown| shown.generation > generation);
            if newer_shown || !self.is_current(generation) {
                return false;
            }
            *current = Some(report.clone());
            true
        });

        if published {
            info!(
                "Rankings #{} ready: {} players on the leaderboard",
                generation,
                report.leaderboard.len()
            );
            RankingOutcome::Current(report)
        } else {
            info!("Discarding rankings #{}, a newer request superseded it", generation);
            RankingOutcome::Superseded { generation }
        }
    }
}

#[async_trait::async_trait]
impl<A: StatsApi> RankingUseCase for RankingService<A> {
    /// Runs the whole pipeline. Only an unresolvable search term fails the
    /// request; other failures degrade the report.
    async fn generate(&self, period: TimePeriod, search: Option<&str>) -> Result<RankingOutcome> {
        let generation = self.next_generation();
        self.run(generation, period, search).await
    }

    fn subscribe(&self) -> watch::Receiver<Option<Arc<RankingReport>>> {
        self.updates.subscribe()
    }
}

#[cfg(test)]
impl<A: StatsApi> RankingService<A> {
    /// Claims a generation number without running, to simulate a request in flight
    pub(crate) fn begin_for_test(&self) -> u64 {
        self.next_generation()
    }

    pub(crate) async fn finish_for_test(
        &self,
        generation: u64,
        period: TimePeriod,
        search: Option<&str>,
    ) -> Result<RankingOutcome> {
        self.run(generation, period, search).await
    }
}
