use shared::{CategoryTotals, RankLabel, ScoringCategory, TimePeriod};

use crate::ranking::view::{DisplayRow, StandingRow};

/// One cell of an export row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportField {
    Text(String),
    Number(u64),
    Rank(RankLabel),
}

impl std::fmt::Display for ExportField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportField::Text(text) => f.write_str(text),
            ExportField::Number(n) => write!(f, "{}", n),
            ExportField::Rank(rank) => write!(f, "{}", rank),
        }
    }
}

impl From<&str> for ExportField {
    fn from(text: &str) -> Self {
        ExportField::Text(text.to_string())
    }
}

impl From<String> for ExportField {
    fn from(text: String) -> Self {
        ExportField::Text(text)
    }
}

impl From<u64> for ExportField {
    fn from(n: u64) -> Self {
        ExportField::Number(n)
    }
}

impl From<u32> for ExportField {
    fn from(n: u32) -> Self {
        ExportField::Number(u64::from(n))
    }
}

impl From<RankLabel> for ExportField {
    fn from(rank: RankLabel) -> Self {
        ExportField::Rank(rank)
    }
}

pub type ExportRow = Vec<ExportField>;

/// Renders ranking results as delimited text
#[derive(Debug, Clone)]
pub struct ExportFormatter {
    separator: char,
}

impl Default for ExportFormatter {
    fn default() -> Self {
        Self { separator: ',' }
    }
}

impl ExportFormatter {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Joins fields with the separator and rows with `\n`. The first row is
    /// the header. Fields holding the separator, a quote or a line break are
    /// quoted RFC 4180 style; everything else is written as is.
    pub fn to_delimited_text(&self, rows: &[ExportRow]) -> String {
        let separator = self.separator.to_string();
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|field| self.escape(&field.to_string()))
                    .collect::<Vec<_>>()
                    .join(&separator)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn escape(&self, field: &str) -> String {
        let needs_quotes = field.contains(self.separator)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r');

        if needs_quotes {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// `Rank, Player, Count` for one item's displayed rows
    pub fn item_export(&self, rows: &[DisplayRow]) -> String {
        let mut data: Vec<ExportRow> = vec![vec!["Rank".into(), "Player".into(), "Count".into()]];
        data.extend(
            rows.iter()
                .map(|row| -> ExportRow { vec![row.rank.into(), row.name.clone().into(), row.count.into()] }),
        );
        self.to_delimited_text(&data)
    }

    /// `Category, Rank, Player, Count` across all five categories, unfiltered
    pub fn all_rankings_export(&self, totals: &CategoryTotals) -> String {
        let mut data: Vec<ExportRow> = vec![vec![
            "Category".into(),
            "Rank".into(),
            "Player".into(),
            "Count".into(),
        ]];

        for category in ScoringCategory::ALL {
            for entry in totals.ranked(category) {
                data.push(vec![
                    category.total_title().into(),
                    entry.rank.into(),
                    entry.name.into(),
                    entry.count.into(),
                ]);
            }
        }

        self.to_delimited_text(&data)
    }

    /// `Rank, Player, Points` for the displayed leaderboard rows
    pub fn global_ranking_export(&self, rows: &[StandingRow]) -> String {
        let mut data: Vec<ExportRow> = vec![vec!["Rank".into(), "Player".into(), "Points".into()]];
        data.extend(
            rows.iter()
                .map(|row| -> ExportRow { vec![row.rank.into(), row.name.clone().into(), row.points.into()] }),
        );
        self.to_delimited_text(&data)
    }
}

pub fn all_rankings_file_name(period: TimePeriod) -> String {
    format!("bitmates_all_rankings_{}.csv", period)
}

pub fn global_ranking_file_name(period: TimePeriod) -> String {
    format!("bitmates_global_ranking_{}.csv", period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_delimited_text() {
        let rows: Vec<ExportRow> = vec![
            vec!["Rank".into(), "Player".into(), "Count".into()],
            vec![1u32.into(), "Alice".into(), 100u64.into()],
            vec![RankLabel::Placeholder.into(), "Zed".into(), 3u64.into()],
        ];

        let text = ExportFormatter::default().to_delimited_text(&rows);
        assert_eq!(text, "Rank,Player,Count\n1,Alice,100\n-,Zed,3");
    }

    #[test]
    fn test_fields_with_separator_are_quoted() {
        let rows: Vec<ExportRow> = vec![vec!["Smith, John".into(), "say \"hi\"".into(), "plain".into()]];

        let text = ExportFormatter::default().to_delimited_text(&rows);
        assert_eq!(text, "\"Smith, John\",\"say \"\"hi\"\"\",plain");
    }

    #[test]
    fn test_custom_separator() {
        let rows: Vec<ExportRow> = vec![vec!["a,b".into(), "c;d".into()]];

        let text = ExportFormatter::new(';').to_delimited_text(&rows);
        assert_eq!(text, "a,b;\"c;d\"");
    }

    #[test]
    fn test_all_rankings_export() {
        let mut totals = CategoryTotals::new();
        totals.add(ScoringCategory::Gathered, "Bob", 5);
        totals.add(ScoringCategory::Gathered, "Alice", 9);
        totals.add(ScoringCategory::KillsBosses, "Bob", 1);

        let text = ExportFormatter::default().all_rankings_export(&totals);
        assert_eq!(
            text,
            "Category,Rank,Player,Count\n\
             Total Gathered,1,Alice,9\n\
             Total Gathered,2,Bob,5\n\
             Total Kills (Bosses),1,Bob,1"
        );
    }

    #[test]
    fn test_global_ranking_export() {
        let rows = vec![StandingRow { rank: RankLabel::Rank(1), name: "Alice".to_string(), points: 18 }];

        let text = ExportFormatter::default().global_ranking_export(&rows);
        assert_eq!(text, "Rank,Player,Points\n1,Alice,18");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(all_rankings_file_name(TimePeriod::Monthly), "bitmates_all_rankings_monthly.csv");
        assert_eq!(global_ranking_file_name(TimePeriod::AllTime), "bitmates_global_ranking_all_time.csv");
    }
}
