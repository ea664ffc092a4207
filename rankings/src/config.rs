use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use dotenv::dotenv;
use log::{info, warn};
use shared::{Result, ScoringCategory, SharedError, TimePeriod};

use crate::ranking::scoring::PointTable;

pub const DEFAULT_GAME_API_URL: &str = "https://bitmatemediator.net/game/v1";
pub const DEFAULT_HIGHSCORE_API_URL: &str = "https://bitmatemediator.net/highscore/v1";
pub const DEFAULT_ITEM_IMAGE_TEMPLATE: &str =
    "https://storage.googleapis.com/apes-f984d.appspot.com/s-images/s-{id}.png";
pub const DEFAULT_ENEMY_IMAGE_TEMPLATE: &str =
    "https://storage.googleapis.com/apes-f984d.appspot.com/Enemies/{name}.png";
pub const DEFAULT_BOSS_IDS: [&str; 6] = ["5", "16", "17", "18", "19", "50"];

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub api: ApiConfig,
    pub roster: RosterConfig,
    pub scoring: ScoringConfig,
    pub export: ExportConfig,
    pub request: RequestConfig,
}

/// Endpoints of the mediator API and presentation assets
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub game_api_url: String,
    pub highscore_api_url: String,
    pub item_image_template: String,
    pub enemy_image_template: String,
    /// Unset means the HTTP client's own defaults apply
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Period passed as `time` to the kill-stats endpoint
    pub period: TimePeriod,
    pub activity_threshold: f64,
    /// Safety ceiling on the number of pages requested
    pub max_pages: u32,
}

/// Scoring data injected into the pipeline rather than baked into it
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub boss_ids: BTreeSet<String>,
    pub point_tables: BTreeMap<ScoringCategory, PointTable>,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub separator: char,
}

/// What the runner binary asks for
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub period: TimePeriod,
    pub search: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            game_api_url: DEFAULT_GAME_API_URL.to_string(),
            highscore_api_url: DEFAULT_HIGHSCORE_API_URL.to_string(),
            item_image_template: DEFAULT_ITEM_IMAGE_TEMPLATE.to_string(),
            enemy_image_template: DEFAULT_ENEMY_IMAGE_TEMPLATE.to_string(),
            timeout: None,
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            period: TimePeriod::Monthly,
            activity_threshold: 1.0,
            max_pages: 200,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            boss_ids: DEFAULT_BOSS_IDS.iter().map(|id| id.to_string()).collect(),
            point_tables: ScoringCategory::ALL
                .iter()
                .map(|category| (*category, PointTable::default_for(*category)))
                .collect(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            separator: ',',
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig::default(),
            roster: RosterConfig::default(),
            scoring: ScoringConfig::default(),
            export: ExportConfig::default(),
            request: RequestConfig::default(),
        }
    }
}

impl Config {
    /// Loads `.env` files, then builds the configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_dotenv();

        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.log_configuration();
        Ok(config)
    }

    fn load_dotenv() {
        // ENV_FILE_PATH replaces the .env / .env.<environment> lookup entirely
        if let Ok(env_file_path) = env::var("ENV_FILE_PATH") {
            if !env_file_path.is_empty() {
                info!("Loading environment from ENV_FILE_PATH: {}", env_file_path);
                dotenv::from_filename(&env_file_path).ok();
                return;
            }
        }

        dotenv().ok();
        let environment_hint = env::var("RUST_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .parse()
            .unwrap_or(Environment::Development);
        let env_file = format!(".env.{:?}", environment_hint).to_lowercase();
        if env_file != ".env.development" {
            let _ = dotenv::from_filename(&env_file);
        }
    }

    /// Builds and validates a configuration from a key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = get("RUST_ENV")
            .and_then(|v| v.parse().ok())
            .unwrap_or(Environment::Development);

        let defaults = Config::default();

        let api = ApiConfig {
            game_api_url: get("MEDIATOR_GAME_API_URL").unwrap_or(defaults.api.game_api_url),
            highscore_api_url: get("MEDIATOR_HIGHSCORE_API_URL").unwrap_or(defaults.api.highscore_api_url),
            item_image_template: get("ITEM_IMAGE_URL_TEMPLATE").unwrap_or(defaults.api.item_image_template),
            enemy_image_template: get("ENEMY_IMAGE_URL_TEMPLATE").unwrap_or(defaults.api.enemy_image_template),
            timeout: parse_opt::<u64>(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS")?
                .map(Duration::from_secs),
        };

        let roster = RosterConfig {
            period: parse_opt::<TimePeriod>(get("ROSTER_PERIOD"), "ROSTER_PERIOD")?
                .unwrap_or(defaults.roster.period),
            activity_threshold: parse_opt::<f64>(get("ROSTER_ACTIVITY_THRESHOLD"), "ROSTER_ACTIVITY_THRESHOLD")?
                .unwrap_or(defaults.roster.activity_threshold),
            max_pages: parse_opt::<u32>(get("ROSTER_MAX_PAGES"), "ROSTER_MAX_PAGES")?
                .unwrap_or(defaults.roster.max_pages),
        };

        let mut scoring = defaults.scoring;
        if let Some(ids) = get("BOSS_IDS") {
            scoring.boss_ids = ids
                .split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect();
        }

        let export = ExportConfig {
            output_dir: get("EXPORT_DIR").map(PathBuf::from).unwrap_or(defaults.export.output_dir),
            // untrimmed so a tab separator survives
            separator: match lookup("EXPORT_SEPARATOR").filter(|v| !v.is_empty()) {
                Some(sep) => parse_separator(&sep)?,
                None => defaults.export.separator,
            },
        };

        let request = RequestConfig {
            period: parse_opt::<TimePeriod>(get("RANKING_PERIOD"), "RANKING_PERIOD")?
                .unwrap_or_default(),
            search: get("RANKING_SEARCH"),
        };

        let config = Config {
            environment,
            api,
            roster,
            scoring,
            export,
            request,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("MEDIATOR_GAME_API_URL", &self.api.game_api_url),
            ("MEDIATOR_HIGHSCORE_API_URL", &self.api.highscore_api_url),
        ] {
            let parsed = url::Url::parse(value)
                .map_err(|e| SharedError::Config(format!("{} is not a valid URL: {}", key, e)))?;
            if self.environment == Environment::Production && parsed.scheme() != "https" {
                return Err(SharedError::Config(format!("{} must use https in production", key)));
            }
        }

        if self.roster.max_pages == 0 {
            return Err(SharedError::Config("ROSTER_MAX_PAGES cannot be 0".to_string()));
        }
        if !self.roster.activity_threshold.is_finite() {
            return Err(SharedError::Config("ROSTER_ACTIVITY_THRESHOLD must be finite".to_string()));
        }
        for category in ScoringCategory::ALL {
            if !self.scoring.point_tables.contains_key(&category) {
                return Err(SharedError::Config(format!("Missing point table for {}", category)));
            }
        }

        Ok(())
    }

    fn log_configuration(&self) {
        info!("Configuration loaded successfully");
        info!("Environment: {:?}", self.environment);
        info!("Game API: {}", self.api.game_api_url);
        info!("Highscore API: {}", self.api.highscore_api_url);
        info!(
            "Roster: period={} threshold={} max_pages={}",
            self.roster.period, self.roster.activity_threshold, self.roster.max_pages
        );
        info!("Boss ids: {:?}", self.scoring.boss_ids);

        if self.api.timeout.is_none() {
            warn!("No HTTP timeout configured - relying on transport defaults");
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn parse_opt<T: std::str::FromStr>(value: Option<String>, key: &str) -> Result<Option<T>> {
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| SharedError::Config(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(None),
    }
}

fn parse_separator(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(sep), None) => Ok(sep),
        _ => Err(SharedError::Config(format!(
            "EXPORT_SEPARATOR must be a single character, got '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator(";").unwrap(), ';');
        assert!(parse_separator(";;").is_err());
    }
}
