use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{Result, SharedError};
use crate::models::ranking::ItemId;

/// Source categories of a player stats payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatCategory {
    #[serde(rename = "gathered")]
    Gathered,
    #[serde(rename = "crafted")]
    Crafted,
    #[serde(rename = "rewarded")]
    Rewarded,
    #[serde(rename = "kills")]
    Kills,
}

impl StatCategory {
    pub const ALL: [StatCategory; 4] = [
        StatCategory::Gathered,
        StatCategory::Crafted,
        StatCategory::Rewarded,
        StatCategory::Kills,
    ];

    /// Field of the stats payload holding this category
    pub fn wire_field(&self) -> &'static str {
        match self {
            StatCategory::Gathered => "items_gathered_counts",
            StatCategory::Crafted => "items_crafted_counts",
            StatCategory::Rewarded => "items_rewarded_counts",
            StatCategory::Kills => "killcounts",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatCategory::Gathered => "gathered",
            StatCategory::Crafted => "crafted",
            StatCategory::Rewarded => "rewarded",
            StatCategory::Kills => "kills",
        }
    }
}

impl std::fmt::Display for StatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation window selecting which field of a count record is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimePeriod {
    #[default]
    #[serde(rename = "all_time")]
    AllTime,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "daily")]
    Daily,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::AllTime => "all_time",
            TimePeriod::Monthly => "monthly",
            TimePeriod::Weekly => "weekly",
            TimePeriod::Daily => "daily",
        }
    }

    /// Name of the count record field holding this period's value
    pub fn value_field(&self) -> String {
        match self {
            TimePeriod::AllTime => "value".to_string(),
            other => format!("value_{}", other.as_str()),
        }
    }
}

impl FromStr for TimePeriod {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all_time" | "alltime" | "all" => Ok(TimePeriod::AllTime),
            "monthly" => Ok(TimePeriod::Monthly),
            "weekly" => Ok(TimePeriod::Weekly),
            "daily" => Ok(TimePeriod::Daily),
            _ => Err(SharedError::Validation(format!("Unknown time period: {}", s))),
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interprets a JSON value as a number the way the mediator API delivers them:
/// numbers, numeric strings, booleans as 0/1, and empty or null values as zero.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Time-windowed counter for one item or enemy (`value`, `value_monthly`, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountRecord(pub HashMap<String, Value>);

impl CountRecord {
    /// Builds a record holding only the all-time value
    pub fn all_time(value: u64) -> Self {
        let mut fields = HashMap::new();
        fields.insert("value".to_string(), Value::from(value));
        Self(fields)
    }

    pub fn with(mut self, period: TimePeriod, value: impl Into<Value>) -> Self {
        self.0.insert(period.value_field(), value.into());
        self
    }

    /// Reads the count for a period. An absent field counts as 0 and
    /// fractional values are rounded to the nearest whole count.
    pub fn read(&self, period: TimePeriod) -> Result<u64> {
        let field = period.value_field();
        let raw = match self.0.get(&field) {
            Some(raw) => raw,
            None => return Ok(0),
        };

        let number = coerce_number(raw).ok_or_else(|| {
            SharedError::Validation(format!("{} is not numeric: {}", field, raw))
        })?;

        if !number.is_finite() || number < 0.0 {
            return Err(SharedError::Validation(format!(
                "{} must be a non-negative number, got {}",
                field, raw
            )));
        }
        // 2^64, the first value a u64 cannot hold
        if number >= 18_446_744_073_709_551_616.0 {
            return Err(SharedError::Validation(format!(
                "{} is out of range: {}",
                field, raw
            )));
        }

        let count = number.round();
        if count != number {
            debug!("Rounding fractional {} {} to {}", field, raw, count);
        }
        Ok(count as u64)
    }
}

/// Per-player statistics payload, one map of counters per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub gathered: HashMap<ItemId, CountRecord>,
    pub crafted: HashMap<ItemId, CountRecord>,
    pub rewarded: HashMap<ItemId, CountRecord>,
    pub kills: HashMap<ItemId, CountRecord>,
}

impl PlayerStats {
    pub fn category(&self, category: StatCategory) -> &HashMap<ItemId, CountRecord> {
        match category {
            StatCategory::Gathered => &self.gathered,
            StatCategory::Crafted => &self.crafted,
            StatCategory::Rewarded => &self.rewarded,
            StatCategory::Kills => &self.kills,
        }
    }

    pub fn category_mut(&mut self, category: StatCategory) -> &mut HashMap<ItemId, CountRecord> {
        match category {
            StatCategory::Gathered => &mut self.gathered,
            StatCategory::Crafted => &mut self.crafted,
            StatCategory::Rewarded => &mut self.rewarded,
            StatCategory::Kills => &mut self.kills,
        }
    }

    /// Chainable setter used when building payloads by hand
    pub fn with_count(mut self, category: StatCategory, id: impl Into<ItemId>, record: CountRecord) -> Self {
        self.category_mut(category).insert(id.into(), record);
        self
    }

    pub fn is_empty(&self) -> bool {
        StatCategory::ALL.iter().all(|c| self.category(*c).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> CountRecord {
        let mut fields = HashMap::new();
        fields.insert("value".to_string(), value);
        fields.insert("value_monthly".to_string(), json!(7));
        CountRecord(fields)
    }

    #[rstest]
    #[case(json!(100), 100)]
    #[case(json!("42"), 42)]
    #[case(json!(null), 0)]
    #[case(json!(""), 0)]
    #[case(json!(3.0), 3)]
    #[case(json!(2.5), 3)]
    #[case(json!("7.2"), 7)]
    #[case(json!(false), 0)]
    #[case(json!(true), 1)]
    fn test_read_accepts_numeric_values(#[case] raw: Value, #[case] expected: u64) {
        assert_eq!(record(raw).read(TimePeriod::AllTime).unwrap(), expected);
    }

    #[rstest]
    #[case(json!(-1))]
    #[case(json!("abc"))]
    #[case(json!({"nested": 1}))]
    #[case(json!([3]))]
    #[case(json!(1e20))]
    #[case(json!("NaN"))]
    fn test_read_rejects_invalid_values(#[case] raw: Value) {
        let result = record(raw).read(TimePeriod::AllTime);
        assert!(matches!(result, Err(SharedError::Validation(_))));
    }

    #[test]
    fn test_read_selects_period_field() {
        let rec = record(json!(100));
        assert_eq!(rec.read(TimePeriod::Monthly).unwrap(), 7);
        assert_eq!(rec.read(TimePeriod::Weekly).unwrap(), 0);
    }

    #[test]
    fn test_time_period_parsing() {
        assert_eq!("all_time".parse::<TimePeriod>().unwrap(), TimePeriod::AllTime);
        assert_eq!("Monthly".parse::<TimePeriod>().unwrap(), TimePeriod::Monthly);
        assert!("yearly".parse::<TimePeriod>().is_err());
        assert_eq!(TimePeriod::Daily.value_field(), "value_daily");
    }

    #[test]
    fn test_player_stats_builder() {
        let stats = PlayerStats::default()
            .with_count(StatCategory::Kills, "5", CountRecord::all_time(3));
        assert!(!stats.is_empty());
        assert_eq!(stats.category(StatCategory::Kills).len(), 1);
        assert!(stats.category(StatCategory::Gathered).is_empty());
    }
}
