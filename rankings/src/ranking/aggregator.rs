use std::collections::{BTreeMap, HashSet};
use log::{debug, error};
use shared::{assign_ranks, ItemId, Player, PlayerStats, RankingTable, StatCategory, TimePeriod};

/// Merges per-player stat payloads into category -> item -> ranked entries
#[derive(Debug, Clone, Default)]
pub struct RankingAggregator;

impl RankingAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Builds the ranking table for a time period.
    ///
    /// Invalid counts are logged and skipped. A player appearing twice keeps
    /// the first entry per item. The result does not depend on input order
    /// beyond that.
    pub fn aggregate(&self, players: &[(Player, PlayerStats)], period: TimePeriod) -> RankingTable {
        let mut table = RankingTable::new();

        for category in StatCategory::ALL {
            let mut per_item: BTreeMap<ItemId, Vec<(String, u64)>> = BTreeMap::new();
            let mut seen: HashSet<(ItemId, String)> = HashSet::new();

            for (player, stats) in players {
                for (item_id, record) in stats.category(category) {
                    let count = match record.read(period) {
                        Ok(count) => count,
                        Err(e) => {
                            error!(
                                "Invalid value for {} in {} item {}: {}",
                                player.name, category, item_id, e
                            );
                            continue;
                        }
                    };

                    if !seen.insert((item_id.clone(), player.name.clone())) {
                        debug!("Duplicate entry for {} in {} item {}, keeping first", player.name, category, item_id);
                        continue;
                    }

                    per_item
                        .entry(item_id.clone())
                        .or_default()
                        .push((player.name.clone(), count));
                }
            }

            let ranked = per_item
                .into_iter()
                .map(|(item_id, counts)| (item_id, assign_ranks(counts)))
                .collect();
            table.insert(category, ranked);
        }

        debug!(
            "Aggregated {} players into {} ranked items",
            players.len(),
            table.values().map(|items| items.len()).sum::<usize>()
        );
        table
    }
}
