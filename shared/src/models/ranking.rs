use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::stats::StatCategory;

/// Identifier of an item or enemy as delivered by the API.
///
/// Integer ids order numerically and sort before non-integer ids, which keep
/// plain string order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for ItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One player's position in a ranked list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position in the full sorted list
    pub rank: u32,
    pub name: String,
    pub count: u64,
}

/// Rank as shown to the user. Non-members get a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankLabel {
    Rank(u32),
    Placeholder,
}

impl std::fmt::Display for RankLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankLabel::Rank(rank) => write!(f, "{}", rank),
            RankLabel::Placeholder => f.write_str("-"),
        }
    }
}

/// Category -> item -> entries sorted by count desc, name asc
pub type RankingTable = BTreeMap<StatCategory, BTreeMap<ItemId, Vec<RankingEntry>>>;

/// Name ordering used to break count ties.
///
/// Case-insensitive first so "alice" sits next to "Alice", then exact bytes to
/// keep the order total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorts `(name, count)` pairs by count descending, name ascending, and
/// assigns each its 1-based rank.
pub fn assign_ranks<I>(counts: I) -> Vec<RankingEntry>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut sorted: Vec<(String, u64)> = counts.into_iter().collect();
    sorted.sort_by(|(name_a, count_a), (name_b, count_b)| {
        count_b.cmp(count_a).then_with(|| compare_names(name_a, name_b))
    });

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, (name, count))| RankingEntry {
            rank: (index + 1) as u32,
            name,
            count,
        })
        .collect()
}
