use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

use wc26_analytics::batch;
use wc26_analytics::cli::CliArgs;
use wc26_analytics::config::AnalyticsConfig;
use wc26_analytics::export;
use wc26_analytics::match_analysis;
use wc26_analytics::player_analysis;
use wc26_analytics::qualification::{self, EstimatorConfig};
use wc26_analytics::registry::{Confederation, Registry};
use wc26_analytics::team_analysis;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::init();

    let cli = CliArgs::from_env();
    let mut cfg = AnalyticsConfig::from_env();
    cli.apply_overrides(&mut cfg);

    let registry = cfg.load_registry().context("unable to load registry")?;
    let out = cfg.output_dir.as_path();
    let est = &cfg.estimator;
    let positional = &cli.positional;

    let command = positional.first().map(String::as_str).unwrap_or("all");
    match command {
        "all" => run_all(&registry, &cfg),
        "qualification" => {
            let scope = match positional.get(1) {
                Some(raw) => Some(
                    Confederation::parse(raw).ok_or_else(|| anyhow!("unknown confederation {raw}"))?,
                ),
                None => None,
            };
            run_qualification(&registry, scope, est, out)
        }
        "match" => run_match(&registry, required(positional, 1, "match id")?, out),
        "team" => run_team(&registry, required(positional, 1, "team code")?, out),
        "player" => run_player(&registry, required(positional, 1, "player id")?, out),
        "predict" => {
            let t1 = required(positional, 1, "first team code")?;
            let t2 = required(positional, 2, "second team code")?;
            let p = match_analysis::predict_match_outcome(&registry, t1, t2)?;
            println!("Match Prediction - {t1} vs {t2}:");
            println!(
                "{t1} win: {:.2}, {t2} win: {:.2}, Draw: {:.2}",
                p.team1_win, p.team2_win, p.draw
            );
            Ok(())
        }
        "group" => {
            let group: Vec<&str> = positional.iter().skip(1).map(String::as_str).collect();
            let standings = team_analysis::predict_group_standings(&registry, &group)?;
            println!("Predicted Group Standings:");
            for (idx, row) in standings.iter().enumerate() {
                println!("{}. {} ({:.3})", idx + 1, row.name, row.score);
            }
            Ok(())
        }
        other => Err(anyhow!(
            "unknown command {other}; expected all|qualification|match|team|player|predict|group"
        )),
    }
}

fn run_all(registry: &Registry, cfg: &AnalyticsConfig) -> Result<()> {
    let summary = batch::export_all(registry, cfg);
    println!(
        "Exported {} files to {}",
        summary.written.len(),
        cfg.output_dir.display()
    );
    if summary.errors.is_empty() {
        return Ok(());
    }
    println!("Errors: {}", summary.errors.len());
    for err in summary.errors.iter().take(8) {
        println!(" - {err}");
    }
    bail!("{} export steps failed", summary.errors.len())
}

fn run_qualification(
    registry: &Registry,
    scope: Option<Confederation>,
    est: &EstimatorConfig,
    out: &Path,
) -> Result<()> {
    let analysis = qualification::qualification_analysis(registry, scope, est)?;
    let label = scope.map(Confederation::label).unwrap_or("All");
    println!("{label} qualification: {} teams", analysis.teams.len());
    for (code, entry) in &analysis.teams {
        println!(
            "  {code} {:<16} {:>5.2} pts/match  {:>6.1}%",
            entry.name,
            entry.efficiency,
            entry.qualification_probability * 100.0
        );
    }
    for (confed, stats) in &analysis.confederation_stats {
        println!(
            "  {confed}: avg points {:.2}, qualified {}/{}",
            stats.avg_points, stats.qualified_teams, stats.total_slots
        );
    }
    let path = export::export_qualification_analysis(&out.join("qualification_analysis"), scope, &analysis)?;
    println!("Exported to: {}", path.display());
    Ok(())
}

fn run_match(registry: &Registry, match_id: &str, out: &Path) -> Result<()> {
    let analysis = match_analysis::match_analysis(registry, match_id)?;
    println!(
        "Match {}: {} {}-{} {}",
        analysis.match_id,
        analysis.team1.code,
        analysis.team1.score,
        analysis.team2.score,
        analysis.team2.code
    );
    for (phase, summary) in &analysis.phase_analysis {
        println!(
            "  {} mins: {} goals, {} cards",
            phase.label(),
            summary.goals,
            summary.cards
        );
    }
    println!("  Momentum shifts at minutes: {:?}", analysis.momentum_data.minutes);
    println!("  Momentum values: {:?}", analysis.momentum_data.values);
    print_written(&batch::export_match(registry, match_id, out)?);
    Ok(())
}

fn run_team(registry: &Registry, team_code: &str, out: &Path) -> Result<()> {
    let report = team_analysis::team_analysis(registry, team_code)?;
    println!(
        "{} (FIFA #{}): {:.1}% wins over {} matches",
        report.team_name, report.fifa_ranking, report.win_percentage, report.matches_analyzed
    );
    print_written(&batch::export_team(registry, team_code, out)?);
    Ok(())
}

fn run_player(registry: &Registry, player_id: &str, out: &Path) -> Result<()> {
    let report = player_analysis::player_analysis(registry, player_id)?;
    println!(
        "{} ({}): {} goals in {} caps, {:.3} goals/match from events",
        report.name, report.team, report.goals, report.caps, report.goals_per_match
    );
    print_written(&batch::export_player(registry, player_id, out)?);
    Ok(())
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("Exported to: {}", path.display());
    }
}

fn required<'a>(positional: &'a [String], idx: usize, what: &str) -> Result<&'a str> {
    positional
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing {what}"))
}
