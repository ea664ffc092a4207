use std::path::Path;
use std::sync::Arc;
use anyhow::Context;
use log::{debug, error, info};
use rankings::config::Config;
use rankings::export::{all_rankings_file_name, global_ranking_file_name, ExportFormatter};
use rankings::ranking::{RankingOutcome, RankingService, RankingUseCase};
use rankings::third_party::MediatorService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    let api = MediatorService::new_with_config(&config.api)?;
    let service = RankingService::new(Arc::new(api), &config);
    for row in service.scorer().points_explanation() {
        debug!("{}", row.join(" | "));
    }

    let outcome = service
        .generate(config.request.period, config.request.search.as_deref())
        .await
        .context("Ranking request failed")?;

    let report = match outcome {
        RankingOutcome::Current(report) => report,
        RankingOutcome::Superseded { generation } => {
            info!("Rankings #{} were superseded, nothing to export", generation);
            return Ok(());
        }
    };

    for row in report.leaderboard_rows().iter().take(20) {
        info!("{:>3}  {:<24} {:>4} pts", row.rank.to_string(), row.name, row.points);
    }

    let formatter = ExportFormatter::new(config.export.separator);
    let out_dir = &config.export.output_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create export directory {}", out_dir.display()))?;

    write_export(
        &out_dir.join(all_rankings_file_name(report.period)),
        &report.all_rankings_csv(&formatter),
    )?;
    write_export(
        &out_dir.join(global_ranking_file_name(report.period)),
        &report.global_ranking_csv(&formatter),
    )?;

    Ok(())
}

fn write_export(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
