use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use wc26_analytics::batch;
use wc26_analytics::cli::CliArgs;
use wc26_analytics::config::AnalyticsConfig;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let cli = CliArgs::from_env();
    let mut cfg = AnalyticsConfig::from_env();
    // `--out` names the rankings directory itself here, not the report root.
    let out_dir = cli
        .flag("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.output_dir.join("rankings"));
    cli.apply_overrides(&mut cfg);
    let registry = cfg.load_registry().context("unable to load registry")?;

    let export = batch::export_rankings(&registry, cfg.rankings_seed, &out_dir)?;

    let months = export
        .history
        .iter()
        .map(|r| r.date.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    println!("Ranking history generated");
    println!("Teams: {}, months: {months}", export.info.len());
    println!("History: {}", export.history_path.display());
    println!("Team info: {}", export.info_path.display());
    for row in export.info.iter().take(5) {
        println!(" - #{} {} ({:?})", row.latest_rank, row.name, row.status);
    }

    Ok(())
}
