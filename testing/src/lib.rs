//! Fake Bitmates mediator API for end-to-end tests
//!
//! `FakeMediator` serves a `MediatorFixture` over real HTTP on an ephemeral
//! port, so tests drive the production `MediatorService` and the whole
//! ranking pipeline without touching the network. The server is stopped
//! with `FakeMediator::stop`.

use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use rankings::config::{ApiConfig, Config};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory content of the mediator API
#[derive(Debug, Clone, Default)]
pub struct MediatorFixture {
    items: HashMap<String, String>,
    enemies: HashMap<String, String>,
    catalogs_down: bool,
    stats: HashMap<String, Value>,
    /// Search term -> canonical name
    search: HashMap<String, String>,
    pages: Vec<Vec<Value>>,
    failing_pages: HashSet<u32>,
}

impl MediatorFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, id: &str, name: &str) -> Self {
        self.items.insert(id.to_string(), name.to_string());
        self
    }

    pub fn with_enemy(mut self, id: &str, name: &str) -> Self {
        self.enemies.insert(id.to_string(), name.to_string());
        self
    }

    /// Both catalog endpoints answer 503
    pub fn with_catalogs_down(mut self) -> Self {
        self.catalogs_down = true;
        self
    }

    /// Registers a player's stats payload and makes the name searchable
    pub fn with_player(mut self, name: &str, stats: Value) -> Self {
        self.search.insert(name.to_string(), name.to_string());
        self.stats.insert(name.to_string(), stats);
        self
    }

    pub fn with_wallet(mut self, wallet: &str, name: &str) -> Self {
        self.search.insert(wallet.to_string(), name.to_string());
        self
    }

    /// Appends a kill-stats page of `(name, activity)` rows
    pub fn with_roster_page(mut self, rows: &[(&str, u64)]) -> Self {
        self.pages.push(
            rows.iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect(),
        );
        self
    }

    /// Makes a 1-based kill-stats page answer 500
    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }
}

/// Builds a stats payload from `(category field, item id, all-time count)`
pub fn stats_payload(counts: &[(&str, &str, u64)]) -> Value {
    let mut payload = serde_json::Map::new();
    for (field, id, count) in counts {
        let category = payload
            .entry(field.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(items) = category {
            items.insert(id.to_string(), json!({ "value": count }));
        }
    }
    Value::Object(payload)
}

#[derive(Debug, Default)]
struct RequestLog {
    page_requests: AtomicU32,
    roster_periods: Mutex<Vec<String>>,
    stats_requests: Mutex<Vec<String>>,
}

struct FakeState {
    fixture: MediatorFixture,
    log: Arc<RequestLog>,
}

#[derive(Debug, Deserialize)]
struct KillStatsQuery {
    valueid: Option<String>,
    time: Option<String>,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PlayerStatsQuery {
    username: String,
}

async fn items(state: web::Data<FakeState>) -> HttpResponse {
    if state.fixture.catalogs_down {
        return HttpResponse::ServiceUnavailable().finish();
    }
    let body: HashMap<&String, Value> = state
        .fixture
        .items
        .iter()
        .map(|(id, name)| (id, json!({ "name": name })))
        .collect();
    HttpResponse::Ok().json(body)
}

async fn enemies(state: web::Data<FakeState>) -> HttpResponse {
    if state.fixture.catalogs_down {
        return HttpResponse::ServiceUnavailable().finish();
    }
    HttpResponse::Ok().json(&state.fixture.enemies)
}

async fn player_stats(state: web::Data<FakeState>, query: web::Query<PlayerStatsQuery>) -> HttpResponse {
    if let Ok(mut requests) = state.log.stats_requests.lock() {
        requests.push(query.username.clone());
    }
    match state.fixture.stats.get(&query.username) {
        Some(stats) => HttpResponse::Ok().json(stats),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn search_player(state: web::Data<FakeState>, term: web::Path<String>) -> HttpResponse {
    match state.fixture.search.get(term.as_str()) {
        Some(name) => HttpResponse::Ok().json(json!({ "data": { "name": name } })),
        None => HttpResponse::Ok().json(json!({ "data": null })),
    }
}

async fn kill_stats(state: web::Data<FakeState>, query: web::Query<KillStatsQuery>) -> HttpResponse {
    state.log.page_requests.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut periods) = state.log.roster_periods.lock() {
        periods.push(query.time.clone().unwrap_or_default());
    }

    if query.valueid.as_deref() != Some("2") {
        return HttpResponse::BadRequest().finish();
    }
    let page = query.page.unwrap_or(1);
    if state.fixture.failing_pages.contains(&page) {
        return HttpResponse::InternalServerError().finish();
    }

    let rows = page
        .checked_sub(1)
        .and_then(|index| state.fixture.pages.get(index as usize))
        .cloned()
        .unwrap_or_default();
    HttpResponse::Ok().json(rows)
}

/// A running fake mediator API
pub struct FakeMediator {
    base_url: String,
    log: Arc<RequestLog>,
    handle: ServerHandle,
}

impl FakeMediator {
    /// Binds an ephemeral port and starts serving. Must run inside an actix
    /// runtime, e.g. `#[actix_web::test]`.
    pub async fn start(fixture: MediatorFixture) -> Result<Self> {
        let log = Arc::new(RequestLog::default());
        let state = web::Data::new(FakeState {
            fixture,
            log: log.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .route("/game/v1/items", web::get().to(items))
                .route("/game/v1/enemies", web::get().to(enemies))
                .route("/game/v1/playerstats/", web::get().to(player_stats))
                .route("/game/v1/killstats", web::get().to(kill_stats))
                .route("/highscore/v1/player/{term}", web::get().to(search_player))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .context("Failed to bind fake mediator")?;

        let addr = *server
            .addrs()
            .first()
            .context("Fake mediator has no bound address")?;
        let server = server.run();
        let handle = server.handle();
        actix_rt::spawn(server);

        log::info!("Fake mediator listening on {}", addr);
        Ok(Self {
            base_url: format!("http://{}", addr),
            log,
            handle,
        })
    }

    pub fn game_api_url(&self) -> String {
        format!("{}/game/v1", self.base_url)
    }

    pub fn highscore_api_url(&self) -> String {
        format!("{}/highscore/v1", self.base_url)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            game_api_url: self.game_api_url(),
            highscore_api_url: self.highscore_api_url(),
            item_image_template: format!("{}/img/items/{{id}}.png", self.base_url),
            enemy_image_template: format!("{}/img/enemies/{{name}}.png", self.base_url),
            timeout: Some(std::time::Duration::from_secs(10)),
        }
    }

    /// Default configuration pointed at this server
    pub fn config(&self) -> Config {
        Config {
            api: self.api_config(),
            ..Config::default()
        }
    }

    pub fn page_requests(&self) -> u32 {
        self.log.page_requests.load(Ordering::SeqCst)
    }

    /// `time` parameter of every kill-stats request so far
    pub fn roster_periods(&self) -> Vec<String> {
        self.log
            .roster_periods
            .lock()
            .map(|periods| periods.clone())
            .unwrap_or_default()
    }

    pub fn stats_requests(&self) -> Vec<String> {
        self.log
            .stats_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
