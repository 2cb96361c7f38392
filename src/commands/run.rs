use crate::analysis::{build_charts, ChartOptions};
use crate::config::AppConfig;
use crate::error::Result;
use crate::ingest::{load_store, source_for_path};
use crate::report::{write_csv, write_json, RunSummary};
use crate::store::BallotStore;
use log::info;
use std::path::PathBuf;

pub const ALL_BALLOTS_FILE: &str = "all_ballots";
pub const CLEAN_BALLOTS_FILE: &str = "clean_ballots";
pub const CHARTS_FILE: &str = "charts.json";

// Load the configured data file and score it once
pub async fn load_and_score(config: &AppConfig) -> Result<BallotStore> {
    info!("Loading ballots from {}", config.data_file.display());
    let source = source_for_path(&config.data_file, config.default_offset, config.skip_first_row);
    let mut store = BallotStore::with_default_pipeline(&config.risk);
    load_store(source.as_ref(), &mut store).await?;
    store.score_all();
    Ok(store)
}

async fn write_report(config: &AppConfig, store: &BallotStore, name: &str, cutoff: Option<u32>) -> Result<PathBuf> {
    let retained = store.filter(cutoff);
    let summary = RunSummary::new(store.all(), cutoff, retained.len());
    let path = write_csv(&config.out_dir, &format!("{}.csv", name), retained).await?;
    write_json(&config.out_dir, &format!("{}.summary.json", name), &summary).await?;
    info!(
        "Run {}: kept {} of {} ballots",
        summary.run_id, summary.retained, summary.total
    );
    Ok(path)
}

/// Every ballot with its score and explanation.
pub async fn write_all_ballots(config: &AppConfig) -> Result<PathBuf> {
    let store = load_and_score(config).await?;
    write_report(config, &store, ALL_BALLOTS_FILE, None).await
}

/// Only ballots scoring under the clean cutoff.
pub async fn write_clean_ballots(config: &AppConfig) -> Result<PathBuf> {
    let store = load_and_score(config).await?;
    write_report(config, &store, CLEAN_BALLOTS_FILE, Some(config.clean_cutoff)).await
}

pub async fn load_chart_options(config: &AppConfig) -> Result<ChartOptions> {
    match &config.chart_options_file {
        Some(path) => {
            let contents = tokio::fs::read_to_string(path).await?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(ChartOptions::default()),
    }
}

/// Chart inputs built from the clean ballots.
pub async fn write_chart_data(config: &AppConfig) -> Result<PathBuf> {
    let options = load_chart_options(config).await?;
    let store = load_and_score(config).await?;
    let clean = store.filter(Some(config.clean_cutoff));
    let charts = build_charts(&clean, &options);
    write_json(&config.out_dir, CHARTS_FILE, &charts).await
}
