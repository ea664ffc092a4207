//! Display-ready rows for a renderer: search filtering, rank labels and
//! catalog labels. Ranks always come from the full sorted lists.

use serde::Serialize;
use shared::{
    CategoryTotals, DisplayInfo, ItemId, LeaderboardScore, RankLabel, RankingEntry, RankingTable,
    ScoringCategory, StatCategory,
};

use crate::ranking::totals::TotalsCalculator;
use crate::stats::client::Catalogs;

/// How a search term narrows the displayed rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SearchScope {
    /// No search: every row, real ranks
    All,
    /// Searched player is in the roster: only their rows, real ranks
    Member(String),
    /// Searched player is outside the roster: ranks are not meaningful
    NonMember(String),
}

impl SearchScope {
    pub fn is_non_member(&self) -> bool {
        matches!(self, SearchScope::NonMember(_))
    }

    fn keeps(&self, name: &str) -> bool {
        match self {
            SearchScope::Member(member) => member == name,
            _ => true,
        }
    }

    fn label(&self, rank: u32) -> RankLabel {
        if self.is_non_member() {
            RankLabel::Placeholder
        } else {
            RankLabel::Rank(rank)
        }
    }

    /// Filters a fully ranked list, keeping the ranks assigned at sort time
    pub fn apply(&self, entries: &[RankingEntry]) -> Vec<DisplayRow> {
        entries
            .iter()
            .filter(|entry| self.keeps(&entry.name))
            .map(|entry| DisplayRow {
                rank: self.label(entry.rank),
                name: entry.name.clone(),
                count: entry.count,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub rank: RankLabel,
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSection {
    pub item_id: ItemId,
    pub label: DisplayInfo,
    pub rows: Vec<DisplayRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySection {
    pub category: ScoringCategory,
    pub title: &'static str,
    pub items: Vec<ItemSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsSection {
    pub category: ScoringCategory,
    pub title: &'static str,
    pub rows: Vec<DisplayRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    pub rank: RankLabel,
    pub name: String,
    pub points: u32,
}

/// Per-item ranking sections in display order, kills split into mobs and
/// bosses. Categories without items are left out.
pub fn ranking_sections(
    table: &RankingTable,
    catalogs: &Catalogs,
    totals: &TotalsCalculator,
    scope: &SearchScope,
) -> Vec<CategorySection> {
    let mut sections: Vec<CategorySection> = ScoringCategory::ALL
        .iter()
        .map(|category| CategorySection {
            category: *category,
            title: category.title(),
            items: Vec::new(),
        })
        .collect();

    for (category, items) in table {
        for (item_id, entries) in items {
            let (target, label) = match ScoringCategory::from_items(*category) {
                Some(scoring) => (scoring, catalogs.items.lookup(item_id)),
                None => {
                    debug_assert_eq!(*category, StatCategory::Kills);
                    (
                        ScoringCategory::for_kill(totals.is_boss(item_id.as_str())),
                        catalogs.enemies.lookup(item_id),
                    )
                }
            };

            if let Some(section) = sections.iter_mut().find(|s| s.category == target) {
                section.items.push(ItemSection {
                    item_id: item_id.clone(),
                    label,
                    rows: scope.apply(entries),
                });
            }
        }
    }

    sections.retain(|section| !section.items.is_empty());
    sections
}

/// Totals tables for all five categories in display order
pub fn totals_sections(totals: &CategoryTotals, scope: &SearchScope) -> Vec<TotalsSection> {
    ScoringCategory::ALL
        .iter()
        .map(|category| TotalsSection {
            category: *category,
            title: category.total_title(),
            rows: scope.apply(&totals.ranked(*category)),
        })
        .collect()
}

pub fn leaderboard_rows(score: &LeaderboardScore, scope: &SearchScope) -> Vec<StandingRow> {
    score
        .standings()
        .into_iter()
        .filter(|standing| scope.keeps(&standing.name))
        .map(|standing| StandingRow {
            rank: scope.label(standing.rank),
            name: standing.name,
            points: standing.points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared::{assign_ranks, Catalog, CatalogKind};
    use std::collections::{BTreeMap, HashMap};

    fn entries() -> Vec<RankingEntry> {
        assign_ranks(vec![
            ("Alice".to_string(), 30),
            ("Bob".to_string(), 20),
            ("Carol".to_string(), 10),
        ])
    }

    fn catalogs() -> Catalogs {
        let mut enemy_names = HashMap::new();
        enemy_names.insert(ItemId::from("5"), "Dragon".to_string());
        Catalogs {
            items: Catalog::new(CatalogKind::Items, "i/{id}"),
            enemies: Catalog::new(CatalogKind::Enemies, "e/{name}").with_names(enemy_names),
        }
    }

    #[test]
    fn test_member_search_keeps_full_list_rank() {
        let rows = SearchScope::Member("Carol".to_string()).apply(&entries());
        assert_eq!(
            rows,
            vec![DisplayRow { rank: RankLabel::Rank(3), name: "Carol".to_string(), count: 10 }]
        );
    }

    #[test]
    fn test_non_member_search_hides_rank() {
        let list = assign_ranks(vec![("Zed".to_string(), 4)]);
        let rows = SearchScope::NonMember("Zed".to_string()).apply(&list);
        assert_eq!(rows[0].rank, RankLabel::Placeholder);
        assert_eq!(rows[0].rank.to_string(), "-");
    }

    #[test]
    fn test_no_search_shows_all() {
        let rows = SearchScope::All.apply(&entries());
        let ranks: Vec<RankLabel> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![RankLabel::Rank(1), RankLabel::Rank(2), RankLabel::Rank(3)]);
    }

    #[test]
    fn test_ranking_sections_split_kills() {
        let mut kills = BTreeMap::new();
        kills.insert(ItemId::from("5"), assign_ranks(vec![("Alice".to_string(), 1)]));
        kills.insert(ItemId::from("6"), assign_ranks(vec![("Bob".to_string(), 9)]));
        let mut table = RankingTable::new();
        table.insert(StatCategory::Kills, kills);
        table.insert(StatCategory::Gathered, BTreeMap::new());

        let calc = TotalsCalculator::new(["5".to_string()].into_iter().collect());
        let sections = ranking_sections(&table, &catalogs(), &calc, &SearchScope::All);

        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Kills (Mobs)", "Kills (Bosses)"]);
        assert_eq!(sections[0].items[0].label.name, "Enemy 6");
        assert_eq!(sections[1].items[0].label.name, "Dragon");
        assert_eq!(sections[1].items[0].label.image_url, "e/Dragon");
    }

    #[test]
    fn test_leaderboard_rows_for_member() {
        let mut score = LeaderboardScore::default();
        score.add("Alice", 20);
        score.add("Bob", 11);

        let rows = leaderboard_rows(&score, &SearchScope::Member("Bob".to_string()));
        assert_eq!(rows, vec![StandingRow { rank: RankLabel::Rank(2), name: "Bob".to_string(), points: 11 }]);
    }

    #[test]
    fn test_totals_sections_cover_all_categories() {
        let mut totals = CategoryTotals::new();
        totals.add(ScoringCategory::Rewarded, "Alice", 3);

        let sections = totals_sections(&totals, &SearchScope::All);
        assert_eq!(sections.len(), 5);
        assert_eq!(sections[2].title, "Total Rewarded");
        assert_eq!(sections[2].rows.len(), 1);
    }
}
