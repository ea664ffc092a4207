use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ranking::{assign_ranks, RankingEntry};
use crate::models::stats::StatCategory;

/// Categories that award leaderboard points. Kills are split by boss status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoringCategory {
    #[serde(rename = "gathered")]
    Gathered,
    #[serde(rename = "crafted")]
    Crafted,
    #[serde(rename = "rewarded")]
    Rewarded,
    #[serde(rename = "kills_mobs")]
    KillsMobs,
    #[serde(rename = "kills_bosses")]
    KillsBosses,
}

impl ScoringCategory {
    /// Display and export order
    pub const ALL: [ScoringCategory; 5] = [
        ScoringCategory::Gathered,
        ScoringCategory::Crafted,
        ScoringCategory::Rewarded,
        ScoringCategory::KillsMobs,
        ScoringCategory::KillsBosses,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ScoringCategory::Gathered => "gathered",
            ScoringCategory::Crafted => "crafted",
            ScoringCategory::Rewarded => "rewarded",
            ScoringCategory::KillsMobs => "kills_mobs",
            ScoringCategory::KillsBosses => "kills_bosses",
        }
    }

    /// Heading of the per-item ranking section
    pub fn title(&self) -> &'static str {
        match self {
            ScoringCategory::Gathered => "Gathered",
            ScoringCategory::Crafted => "Crafted",
            ScoringCategory::Rewarded => "Rewarded",
            ScoringCategory::KillsMobs => "Kills (Mobs)",
            ScoringCategory::KillsBosses => "Kills (Bosses)",
        }
    }

    /// Heading of the totals table and label in exports
    pub fn total_title(&self) -> &'static str {
        match self {
            ScoringCategory::Gathered => "Total Gathered",
            ScoringCategory::Crafted => "Total Crafted",
            ScoringCategory::Rewarded => "Total Rewarded",
            ScoringCategory::KillsMobs => "Total Kills (Mobs)",
            ScoringCategory::KillsBosses => "Total Kills (Bosses)",
        }
    }

    /// Maps a non-kill source category; kills need the boss split
    pub fn from_items(category: StatCategory) -> Option<Self> {
        match category {
            StatCategory::Gathered => Some(ScoringCategory::Gathered),
            StatCategory::Crafted => Some(ScoringCategory::Crafted),
            StatCategory::Rewarded => Some(ScoringCategory::Rewarded),
            StatCategory::Kills => None,
        }
    }

    pub fn for_kill(is_boss: bool) -> Self {
        if is_boss {
            ScoringCategory::KillsBosses
        } else {
            ScoringCategory::KillsMobs
        }
    }
}

impl std::fmt::Display for ScoringCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-category, per-player summed counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    totals: BTreeMap<ScoringCategory, BTreeMap<String, u64>>,
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTotals {
    /// Starts with all five categories present and empty
    pub fn new() -> Self {
        Self {
            totals: ScoringCategory::ALL
                .iter()
                .map(|category| (*category, BTreeMap::new()))
                .collect(),
        }
    }

    pub fn get(&self, category: ScoringCategory) -> &BTreeMap<String, u64> {
        // every category is inserted in new()
        &self.totals[&category]
    }

    pub fn total(&self, category: ScoringCategory, player: &str) -> Option<u64> {
        self.get(category).get(player).copied()
    }

    /// Registers a player in a category without changing their total
    pub fn ensure(&mut self, category: ScoringCategory, player: &str) {
        self.slot(category).entry(player.to_string()).or_insert(0);
    }

    /// Adds to a player's total, saturating at `u64::MAX`
    pub fn add(&mut self, category: ScoringCategory, player: &str, count: u64) {
        let total = self.slot(category).entry(player.to_string()).or_insert(0);
        *total = total.saturating_add(count);
    }

    /// Totals for a category, sorted descending with ranks assigned
    pub fn ranked(&self, category: ScoringCategory) -> Vec<RankingEntry> {
        assign_ranks(
            self.get(category)
                .iter()
                .map(|(name, total)| (name.clone(), *total)),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScoringCategory, &BTreeMap<String, u64>)> {
        self.totals.iter()
    }

    fn slot(&mut self, category: ScoringCategory) -> &mut BTreeMap<String, u64> {
        self.totals.entry(category).or_default()
    }
}

/// A player's place on the global leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: u32,
    pub name: String,
    pub points: u32,
}

/// Player -> accumulated leaderboard points
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardScore {
    pub points: BTreeMap<String, u32>,
}

impl LeaderboardScore {
    pub fn add(&mut self, player: &str, points: u32) {
        let total = self.points.entry(player.to_string()).or_insert(0);
        *total = total.saturating_add(points);
    }

    pub fn get(&self, player: &str) -> Option<u32> {
        self.points.get(player).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points descending, ties by name ascending
    pub fn standings(&self) -> Vec<Standing> {
        assign_ranks(
            self.points
                .iter()
                .map(|(name, points)| (name.clone(), u64::from(*points))),
        )
        .into_iter()
        .map(|entry| Standing {
            rank: entry.rank,
            name: entry.name,
            points: entry.count as u32,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_category_totals_start_with_all_categories() {
        let totals = CategoryTotals::new();
        assert_eq!(totals.iter().count(), 5);
        assert!(totals.get(ScoringCategory::KillsBosses).is_empty());
    }

    #[test]
    fn test_category_totals_saturate_instead_of_overflowing() {
        let mut totals = CategoryTotals::new();
        totals.add(ScoringCategory::Gathered, "Alice", 10_000_000_000_000_000_000);
        totals.add(ScoringCategory::Gathered, "Alice", 10_000_000_000_000_000_000);

        assert_eq!(totals.total(ScoringCategory::Gathered, "Alice"), Some(u64::MAX));
    }

    #[test]
    fn test_category_totals_add_and_rank() {
        let mut totals = CategoryTotals::new();
        totals.add(ScoringCategory::Gathered, "Bob", 40);
        totals.add(ScoringCategory::Gathered, "Alice", 30);
        totals.add(ScoringCategory::Gathered, "Alice", 20);
        totals.ensure(ScoringCategory::Gathered, "Carol");

        let ranked = totals.ranked(ScoringCategory::Gathered);
        let names: Vec<(&str, u64, u32)> = ranked.iter().map(|e| (e.name.as_str(), e.count, e.rank)).collect();
        assert_eq!(names, vec![("Alice", 50, 1), ("Bob", 40, 2), ("Carol", 0, 3)]);
    }

    #[test]
    fn test_standings_order() {
        let mut score = LeaderboardScore::default();
        score.add("Bob", 10);
        score.add("Alice", 10);
        score.add("Carol", 12);

        let standings = score.standings();
        assert_eq!(standings[0], Standing { rank: 1, name: "Carol".to_string(), points: 12 });
        assert_eq!(standings[1].name, "Alice");
        assert_eq!(standings[2], Standing { rank: 3, name: "Bob".to_string(), points: 10 });
    }

    #[test]
    fn test_titles() {
        assert_eq!(ScoringCategory::KillsBosses.title(), "Kills (Bosses)");
        assert_eq!(ScoringCategory::Crafted.total_title(), "Total Crafted");
        assert_eq!(ScoringCategory::for_kill(false), ScoringCategory::KillsMobs);
    }
}
