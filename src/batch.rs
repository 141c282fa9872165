//! Export runs over the whole registry. Each step writes its own files; a
//! failing step is recorded and the run moves on to the next one.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::charts;
use crate::config::AnalyticsConfig;
use crate::export;
use crate::match_analysis;
use crate::player_analysis;
use crate::qualification::{self, EstimatorConfig};
use crate::rankings_history::{self, HistoryConfig, RankingSample, TeamInfo};
use crate::registry::{Confederation, Registry};
use crate::team_analysis;

pub const PROBABILITY_CHART_TEAMS: [&str; 6] = ["BRA", "URU", "COL", "ENG", "FRA", "ESP"];

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl BatchSummary {
    fn record(&mut self, step: impl Into<String>, outcome: Result<Vec<PathBuf>>) {
        match outcome {
            Ok(paths) => self.written.extend(paths),
            Err(err) => {
                let step = step.into();
                log::warn!("{step} failed: {err:#}");
                self.errors.push(format!("{step}: {err:#}"));
            }
        }
    }
}

pub fn export_all(registry: &Registry, cfg: &AnalyticsConfig) -> BatchSummary {
    let out = cfg.output_dir.as_path();
    let est = &cfg.estimator;
    let mut summary = BatchSummary::default();

    summary.record(
        "qualification All",
        export_qualification(registry, None, est, out).map(|p| vec![p]),
    );
    for confed in Confederation::ALL {
        if registry.confederation_teams(confed).is_empty() {
            continue;
        }
        summary.record(
            format!("qualification {}", confed.label()),
            export_qualification(registry, Some(confed), est, out).map(|p| vec![p]),
        );
    }
    summary.record("workbook", export_workbook(registry, est, out).map(|p| vec![p]));
    summary.record("overview charts", export_overview_charts(registry, est, out));

    for m in registry.matches() {
        summary.record(format!("match {}", m.id), export_match(registry, &m.id, out));
    }
    for team in registry.teams() {
        if registry.team_matches(&team.code).is_empty() {
            continue;
        }
        summary.record(format!("team {}", team.code), export_team(registry, &team.code, out));
    }
    for player in registry.players() {
        summary.record(
            format!("player {}", player.id),
            export_player(registry, &player.id, out),
        );
    }

    let rankings = export_rankings(registry, cfg.rankings_seed, &out.join("rankings"))
        .map(|r| vec![r.history_path, r.info_path]);
    summary.record("rankings", rankings);

    log::info!(
        "batch export: {} files written, {} failures",
        summary.written.len(),
        summary.errors.len()
    );
    summary
}

pub fn export_qualification(
    registry: &Registry,
    scope: Option<Confederation>,
    est: &EstimatorConfig,
    out: &Path,
) -> Result<PathBuf> {
    let analysis = qualification::qualification_analysis(registry, scope, est)?;
    export::export_qualification_analysis(&out.join("qualification_analysis"), scope, &analysis)
}

pub fn export_workbook(registry: &Registry, est: &EstimatorConfig, out: &Path) -> Result<PathBuf> {
    let path = out.join("qualification_analysis.xlsx");
    let analysis = qualification::qualification_analysis(registry, None, est)?;
    export::export_qualification_workbook(&path, &analysis)?;
    Ok(path)
}

pub fn export_overview_charts(
    registry: &Registry,
    est: &EstimatorConfig,
    out: &Path,
) -> Result<Vec<PathBuf>> {
    let dir = out.join("charts");
    Ok(vec![
        export::export_chart(
            &dir,
            "confederation_comparison",
            &charts::confederation_comparison(registry),
        )?,
        export::export_chart(
            &dir,
            "qualification_probabilities",
            &charts::qualification_probabilities(registry, &PROBABILITY_CHART_TEAMS, est)?,
        )?,
    ])
}

pub fn export_match(registry: &Registry, match_id: &str, out: &Path) -> Result<Vec<PathBuf>> {
    let dir = out.join("match_analysis");
    let charts_dir = dir.join("charts");
    let analysis = match_analysis::match_analysis(registry, match_id)?;
    Ok(vec![
        export::export_match_analysis(&dir, &analysis)?,
        export::export_chart(
            &charts_dir,
            &format!("{match_id}_phases"),
            &charts::goals_by_phase(registry, match_id)?,
        )?,
        export::export_chart(
            &charts_dir,
            &format!("{match_id}_momentum"),
            &charts::momentum(registry, match_id)?,
        )?,
    ])
}

pub fn export_team(registry: &Registry, team_code: &str, out: &Path) -> Result<Vec<PathBuf>> {
    let dir = out.join("team_analysis");
    let report = team_analysis::team_analysis(registry, team_code)?;
    Ok(vec![
        export::export_team_analysis(&dir, &report)?,
        export::export_chart(
            &dir.join("charts"),
            &format!("{team_code}_results"),
            &charts::team_results(registry, team_code)?,
        )?,
    ])
}

pub fn export_player(registry: &Registry, player_id: &str, out: &Path) -> Result<Vec<PathBuf>> {
    let dir = out.join("player_analysis");
    let report = player_analysis::player_analysis(registry, player_id)?;
    Ok(vec![
        export::export_player_analysis(&dir, &report)?,
        export::export_chart(
            &dir.join("charts"),
            &format!("{player_id}_profile"),
            &charts::player_profile(registry, player_id)?,
        )?,
    ])
}

pub struct RankingsExport {
    pub history: Vec<RankingSample>,
    pub info: Vec<TeamInfo>,
    pub history_path: PathBuf,
    pub info_path: PathBuf,
}

/// Generate the seeded ranking history and write it with the team summary into `dir`.
pub fn export_rankings(registry: &Registry, seed: u64, dir: &Path) -> Result<RankingsExport> {
    let history =
        rankings_history::generate_rankings_history(registry, &HistoryConfig::with_seed(seed))?;
    let info = rankings_history::team_info(registry, &history)?;
    let (history_path, info_path) = export::export_rankings(dir, &history, &info)?;
    Ok(RankingsExport {
        history,
        info,
        history_path,
        info_path,
    })
}
