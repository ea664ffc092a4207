#[cfg(test)]
mod config_tests {
    use crate::config::{Config, Environment, DEFAULT_GAME_API_URL};
    use pretty_assertions::assert_eq;
    use shared::{SharedError, TimePeriod};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn from_pairs(pairs: &[(&str, &str)]) -> shared::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = from_pairs(&[]).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api.game_api_url, DEFAULT_GAME_API_URL);
        assert_eq!(config.api.timeout, None);
        assert_eq!(config.roster.period, TimePeriod::Monthly);
        assert_eq!(config.roster.max_pages, 200);
        assert_eq!(config.export.separator, ',');
        assert_eq!(config.request.period, TimePeriod::AllTime);
        assert_eq!(config.request.search, None);
        assert!(config.scoring.boss_ids.contains("16"));
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides_are_read_and_trimmed() {
        let config = from_pairs(&[
            ("MEDIATOR_GAME_API_URL", " http://localhost:8080/game/v1 "),
            ("HTTP_TIMEOUT_SECS", "15"),
            ("ROSTER_PERIOD", "weekly"),
            ("ROSTER_ACTIVITY_THRESHOLD", "2.5"),
            ("ROSTER_MAX_PAGES", "3"),
            ("BOSS_IDS", "1, 2,,3"),
            ("EXPORT_DIR", "/tmp/out"),
            ("EXPORT_SEPARATOR", "\t"),
            ("RANKING_PERIOD", "daily"),
            ("RANKING_SEARCH", "  Alice "),
        ])
        .unwrap();

        assert_eq!(config.api.game_api_url, "http://localhost:8080/game/v1");
        assert_eq!(config.api.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.roster.period, TimePeriod::Weekly);
        assert_eq!(config.roster.activity_threshold, 2.5);
        assert_eq!(config.roster.max_pages, 3);
        let ids: Vec<&str> = config.scoring.boss_ids.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.export.separator, '\t');
        assert_eq!(config.request.period, TimePeriod::Daily);
        assert_eq!(config.request.search.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for pairs in [
            vec![("ROSTER_MAX_PAGES", "0")],
            vec![("ROSTER_MAX_PAGES", "many")],
            vec![("HTTP_TIMEOUT_SECS", "-1")],
            vec![("RANKING_PERIOD", "yearly")],
            vec![("EXPORT_SEPARATOR", ";;")],
            vec![("MEDIATOR_HIGHSCORE_API_URL", "not a url")],
            vec![("ROSTER_ACTIVITY_THRESHOLD", "NaN")],
        ] {
            let result = from_pairs(&pairs);
            assert!(
                matches!(result, Err(SharedError::Config(_))),
                "{:?} should be rejected",
                pairs
            );
        }
    }

    #[test]
    fn test_production_requires_https() {
        let result = from_pairs(&[
            ("RUST_ENV", "production"),
            ("MEDIATOR_GAME_API_URL", "http://bitmatemediator.net/game/v1"),
        ]);
        assert!(matches!(result, Err(SharedError::Config(_))));

        let config = from_pairs(&[("RUST_ENV", "prod")]).unwrap();
        assert!(config.is_production());
    }
}
