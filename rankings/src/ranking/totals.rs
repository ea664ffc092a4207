use std::collections::BTreeSet;
use shared::{CategoryTotals, RankingTable, ScoringCategory, StatCategory};

/// Collapses per-item rankings into per-player totals per scoring category
#[derive(Debug, Clone)]
pub struct TotalsCalculator {
    boss_ids: BTreeSet<String>,
}

impl TotalsCalculator {
    pub fn new(boss_ids: BTreeSet<String>) -> Self {
        Self { boss_ids }
    }

    /// Enemy ids are matched as strings, so "05" is not boss "5"
    pub fn is_boss(&self, enemy_id: &str) -> bool {
        self.boss_ids.contains(enemy_id)
    }

    pub fn totals(&self, table: &RankingTable) -> CategoryTotals {
        let mut totals = CategoryTotals::new();

        for (category, items) in table {
            match ScoringCategory::from_items(*category) {
                Some(scoring) => {
                    for entry in items.values().flatten() {
                        totals.add(scoring, &entry.name, entry.count);
                    }
                }
                None => {
                    debug_assert_eq!(*category, StatCategory::Kills);
                    for (enemy_id, entries) in items {
                        let target = ScoringCategory::for_kill(self.is_boss(enemy_id.as_str()));
                        for entry in entries {
                            // anyone with kills shows up in both kill tables
                            totals.ensure(ScoringCategory::KillsMobs, &entry.name);
                            totals.ensure(ScoringCategory::KillsBosses, &entry.name);
                            totals.add(target, &entry.name, entry.count);
                        }
                    }
                }
            }
        }

        totals
    }
}
