use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::charts::Chart;
use crate::match_analysis::MatchAnalysis;
use crate::player_analysis::PlayerAnalysisReport;
use crate::qualification::QualificationAnalysis;
use crate::rankings_history::{RankingSample, TeamInfo};
use crate::registry::Confederation;
use crate::team_analysis::TeamAnalysisReport;

/// Pretty-print `value` to `dir/file_name`, creating `dir` as needed. The file
/// is written next to its final name and swapped in, so readers never see a
/// partial document.
pub fn write_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;
    let path = dir.join(file_name);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {file_name}"))?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

pub fn qualification_file_name(scope: Option<Confederation>) -> String {
    match scope {
        Some(confed) => format!("{}_qualification_analysis.json", confed.label()),
        None => "all_qualification_analysis.json".to_string(),
    }
}

pub fn export_qualification_analysis(
    dir: &Path,
    scope: Option<Confederation>,
    analysis: &QualificationAnalysis,
) -> Result<PathBuf> {
    write_json(dir, &qualification_file_name(scope), analysis)
}

pub fn export_match_analysis(dir: &Path, analysis: &MatchAnalysis) -> Result<PathBuf> {
    write_json(dir, &format!("{}_analysis.json", analysis.match_id), analysis)
}

pub fn export_team_analysis(dir: &Path, report: &TeamAnalysisReport) -> Result<PathBuf> {
    write_json(dir, &format!("{}_analysis.json", report.team_code), report)
}

pub fn export_player_analysis(dir: &Path, report: &PlayerAnalysisReport) -> Result<PathBuf> {
    write_json(dir, &format!("{}_analysis.json", report.player_id), report)
}

pub fn export_rankings(
    dir: &Path,
    history: &[RankingSample],
    info: &[TeamInfo],
) -> Result<(PathBuf, PathBuf)> {
    let history_path = write_json(dir, "fifa_rankings_history.json", &history)?;
    let info_path = write_json(dir, "team_info.json", &info)?;
    Ok((history_path, info_path))
}

pub fn export_chart(dir: &Path, slug: &str, chart: &Chart) -> Result<PathBuf> {
    write_json(dir, &format!("{slug}_chart.json"), chart)
}

/// One sheet with the per-team qualification table, one with confederation
/// roll-ups.
pub fn export_qualification_workbook(path: &Path, analysis: &QualificationAnalysis) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir {}", parent.display()))?;
        }
    }

    let mut team_rows = vec![vec![
        "Team".to_string(),
        "Name".to_string(),
        "Confed".to_string(),
        "FIFA Rank".to_string(),
        "Played".to_string(),
        "W".to_string(),
        "D".to_string(),
        "L".to_string(),
        "GF".to_string(),
        "GA".to_string(),
        "Points".to_string(),
        "Pts/Match".to_string(),
        "Qualification %".to_string(),
    ]];
    for (code, entry) in &analysis.teams {
        let rec = &entry.qualification_data;
        team_rows.push(vec![
            code.clone(),
            entry.name.clone(),
            entry.confederation.label().to_string(),
            entry.ranking.to_string(),
            rec.matches_played.to_string(),
            rec.wins.to_string(),
            rec.draws.to_string(),
            rec.losses.to_string(),
            rec.goals_for.to_string(),
            rec.goals_against.to_string(),
            rec.points.to_string(),
            format!("{:.3}", entry.efficiency),
            format!("{:.1}", entry.qualification_probability * 100.0),
        ]);
    }

    let mut confed_rows = vec![vec![
        "Confed".to_string(),
        "Teams".to_string(),
        "Qualified".to_string(),
        "Slots".to_string(),
        "Avg Matches".to_string(),
        "Avg Points".to_string(),
        "Avg GF".to_string(),
        "Avg GA".to_string(),
    ]];
    for (label, stats) in &analysis.confederation_stats {
        confed_rows.push(vec![
            label.clone(),
            stats.team_count.to_string(),
            stats.qualified_teams.to_string(),
            stats.total_slots.to_string(),
            format!("{:.2}", stats.avg_matches),
            format!("{:.2}", stats.avg_points),
            format!("{:.2}", stats.avg_goals_for),
            format!("{:.2}", stats.avg_goals_against),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &team_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Confederations")?;
        write_rows(sheet, &confed_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
