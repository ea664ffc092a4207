use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use shared::{CategoryTotals, LeaderboardScore, ScoringCategory};

/// Points awarded to every rank up to and including `up_to_rank`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTier {
    pub up_to_rank: u32,
    pub points: u32,
}

/// Rank tiers for one category, in ascending `up_to_rank` order.
/// Ranks past the last tier earn nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTable {
    pub tiers: Vec<PointTier>,
}

impl PointTable {
    /// Standard 1-3 / 4-10 / 11-20 tiers with the given point values
    pub fn tiered(top3: u32, top10: u32, top20: u32) -> Self {
        Self {
            tiers: vec![
                PointTier { up_to_rank: 3, points: top3 },
                PointTier { up_to_rank: 10, points: top10 },
                PointTier { up_to_rank: 20, points: top20 },
            ],
        }
    }

    pub fn default_for(category: ScoringCategory) -> Self {
        match category {
            ScoringCategory::Gathered | ScoringCategory::Rewarded => Self::tiered(5, 3, 1),
            ScoringCategory::Crafted | ScoringCategory::KillsMobs => Self::tiered(7, 5, 3),
            ScoringCategory::KillsBosses => Self::tiered(11, 7, 5),
        }
    }

    pub fn points_for_rank(&self, rank: u32) -> u32 {
        self.tiers
            .iter()
            .find(|tier| rank <= tier.up_to_rank)
            .map(|tier| tier.points)
            .unwrap_or(0)
    }

    /// Column headings such as "Rank 1-3", "Rank 4-10"
    pub fn tier_labels(&self) -> Vec<String> {
        let mut from = 1;
        self.tiers
            .iter()
            .map(|tier| {
                let label = format!("Rank {}-{}", from, tier.up_to_rank);
                from = tier.up_to_rank + 1;
                label
            })
            .collect()
    }
}

/// Converts category totals into leaderboard points
#[derive(Debug, Clone)]
pub struct LeaderboardScorer {
    point_tables: BTreeMap<ScoringCategory, PointTable>,
}

impl LeaderboardScorer {
    pub fn new(point_tables: BTreeMap<ScoringCategory, PointTable>) -> Self {
        Self { point_tables }
    }

    /// Ranks each category's totals (ties by name ascending) and sums the
    /// tier points per player. Every ranked player gets an entry, even at 0.
    pub fn score(&self, totals: &CategoryTotals) -> LeaderboardScore {
        let mut score = LeaderboardScore::default();

        for category in ScoringCategory::ALL {
            let Some(table) = self.point_tables.get(&category) else {
                log::warn!("No point table for {}, skipping category", category);
                continue;
            };

            for entry in totals.ranked(category) {
                score.add(&entry.name, table.points_for_rank(entry.rank));
            }
        }

        log::debug!("Scored {} players", score.len());
        score
    }

    /// Rows describing the point system: activity title, then points per tier
    pub fn points_explanation(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();

        let header_tiers = self
            .point_tables
            .values()
            .next()
            .map(|table| table.tier_labels())
            .unwrap_or_default();
        let mut header = vec!["Activity".to_string()];
        header.extend(header_tiers);
        rows.push(header);

        for category in ScoringCategory::ALL {
            if let Some(table) = self.point_tables.get(&category) {
                let mut row = vec![category.total_title().to_string()];
                row.extend(table.tiers.iter().map(|tier| match tier.points {
                    1 => "1 point".to_string(),
                    n => format!("{} points", n),
                }));
                rows.push(row);
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn default_scorer() -> LeaderboardScorer {
        LeaderboardScorer::new(
            ScoringCategory::ALL
                .iter()
                .map(|c| (*c, PointTable::default_for(*c)))
                .collect(),
        )
    }

    #[rstest]
    #[case(1, 11)]
    #[case(3, 11)]
    #[case(4, 7)]
    #[case(10, 7)]
    #[case(11, 5)]
    #[case(20, 5)]
    #[case(21, 0)]
    fn test_boss_tiers(#[case] rank: u32, #[case] points: u32) {
        let table = PointTable::default_for(ScoringCategory::KillsBosses);
        assert_eq!(table.points_for_rank(rank), points);
    }

    #[test]
    fn test_top_three_gathered_each_get_five() {
        let mut totals = CategoryTotals::new();
        totals.add(ScoringCategory::Gathered, "Alice", 50);
        totals.add(ScoringCategory::Gathered, "Bob", 40);
        totals.add(ScoringCategory::Gathered, "Carol", 30);

        let score = default_scorer().score(&totals);
        assert_eq!(score.get("Alice"), Some(5));
        assert_eq!(score.get("Bob"), Some(5));
        assert_eq!(score.get("Carol"), Some(5));
    }

    #[test]
    fn test_points_sum_across_categories() {
        let mut totals = CategoryTotals::new();
        totals.add(ScoringCategory::Crafted, "Alice", 3);
        totals.add(ScoringCategory::KillsBosses, "Alice", 1);
        totals.add(ScoringCategory::Rewarded, "Bob", 2);

        let score = default_scorer().score(&totals);
        assert_eq!(score.get("Alice"), Some(7 + 11));
        assert_eq!(score.get("Bob"), Some(5));
        assert_eq!(score.get("Carol"), None);
    }

    #[test]
    fn test_players_past_rank_twenty_score_zero() {
        let mut totals = CategoryTotals::new();
        for i in 0..25u64 {
            totals.add(ScoringCategory::Gathered, &format!("player{:02}", i), 100 - i);
        }

        let score = default_scorer().score(&totals);
        assert_eq!(score.len(), 25);
        assert_eq!(score.get("player00"), Some(5));
        assert_eq!(score.get("player05"), Some(3));
        assert_eq!(score.get("player15"), Some(1));
        assert_eq!(score.get("player24"), Some(0));
    }

    #[test]
    fn test_ties_break_by_name() {
        let mut totals = CategoryTotals::new();
        for name in ["Dave", "Carol", "Bob", "Alice"] {
            totals.add(ScoringCategory::Gathered, name, 10);
        }

        let score = default_scorer().score(&totals);
        assert_eq!(score.get("Alice"), Some(5));
        assert_eq!(score.get("Carol"), Some(5));
        assert_eq!(score.get("Dave"), Some(3));
    }

    #[test]
    fn test_points_explanation() {
        let rows = default_scorer().points_explanation();
        assert_eq!(rows[0], vec!["Activity", "Rank 1-3", "Rank 4-10", "Rank 11-20"]);
        assert_eq!(rows[1], vec!["Total Gathered", "5 points", "3 points", "1 point"]);
        assert_eq!(rows[5], vec!["Total Kills (Bosses)", "11 points", "7 points", "5 points"]);
    }
}
