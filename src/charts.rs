//! Label/value series for chart renderers. Nothing here draws; a plotting
//! front-end consumes the series as-is.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsResult;
use crate::match_analysis;
use crate::player_analysis::PlayerMetric;
use crate::qualification::{self, EstimatorConfig};
use crate::registry::{Confederation, MatchPhase, Registry};
use crate::team_analysis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub series: Vec<ChartSeries>,
}

/// Four grouped bars per confederation: avg points, avg goals for/against and
/// qualified teams. Confederations without teams are left out.
pub fn confederation_comparison(registry: &Registry) -> Chart {
    let mut points = ChartSeries::new("Avg. Points");
    let mut goals_for = ChartSeries::new("Avg. Goals For");
    let mut goals_against = ChartSeries::new("Avg. Goals Against");
    let mut qualified = ChartSeries::new("Qualified Teams");

    for confed in Confederation::ALL {
        let Some(stats) = qualification::confederation_stats(registry, confed) else {
            continue;
        };
        let label = confed.label();
        points.push(label, stats.avg_points);
        goals_for.push(label, stats.avg_goals_for);
        goals_against.push(label, stats.avg_goals_against);
        qualified.push(label, stats.qualified_teams as f64);
    }

    Chart {
        title: "Qualification Performance by Confederation".to_string(),
        series: vec![points, goals_for, goals_against, qualified],
    }
}

/// Qualification probability per team, labelled by team name. Unknown codes
/// and unresolved teams without a qualification record are skipped.
pub fn qualification_probabilities(
    registry: &Registry,
    team_codes: &[&str],
    cfg: &EstimatorConfig,
) -> AnalyticsResult<Chart> {
    let mut series = ChartSeries::new("Qualification Probability");
    for &code in team_codes {
        let p = match qualification::qualification_probability(registry, code, cfg) {
            Ok(p) => p,
            Err(err) if err.is_not_found() => {
                log::warn!("skipping {code} in probability chart: {err}");
                continue;
            }
            Err(err) => return Err(err),
        };
        let team = registry.team(code)?;
        series.push(team.name.clone(), p);
    }
    Ok(Chart {
        title: "World Cup 2026 Qualification Probabilities".to_string(),
        series: vec![series],
    })
}

pub fn goals_by_phase(registry: &Registry, match_id: &str) -> AnalyticsResult<Chart> {
    let analysis = match_analysis::match_analysis(registry, match_id)?;
    let mut home = ChartSeries::new(analysis.team1.name.clone());
    let mut away = ChartSeries::new(analysis.team2.name.clone());
    for phase in MatchPhase::ALL {
        let Some(summary) = analysis.phase_analysis.get(&phase) else {
            continue;
        };
        home.push(phase.label(), summary.team1_goals as f64);
        away.push(phase.label(), summary.team2_goals as f64);
    }
    Ok(Chart {
        title: format!(
            "Goals by Match Phase: {} vs {}",
            analysis.team1.name, analysis.team2.name
        ),
        series: vec![home, away],
    })
}

pub fn momentum(registry: &Registry, match_id: &str) -> AnalyticsResult<Chart> {
    let analysis = match_analysis::match_analysis(registry, match_id)?;
    let mut series = ChartSeries::new("Momentum");
    for (minute, value) in analysis
        .momentum_data
        .minutes
        .iter()
        .zip(&analysis.momentum_data.values)
    {
        series.push(minute.to_string(), *value);
    }
    Ok(Chart {
        title: format!(
            "Momentum Shifts: {} vs {}",
            analysis.team1.name, analysis.team2.name
        ),
        series: vec![series],
    })
}

pub fn team_results(registry: &Registry, team_code: &str) -> AnalyticsResult<Chart> {
    let team = registry.team(team_code)?;
    let counts = team_analysis::result_counts(registry, team_code)?;
    let mut series = ChartSeries::new("Results");
    series.push("Wins", counts.wins as f64);
    series.push("Draws", counts.draws as f64);
    series.push("Losses", counts.losses as f64);
    Ok(Chart {
        title: format!("{} Performance Analysis", team.name),
        series: vec![series],
    })
}

/// Radar-style profile. Per-match rates are scaled by 100 so they sit on the
/// same axis as the raw counts.
pub fn player_profile(registry: &Registry, player_id: &str) -> AnalyticsResult<Chart> {
    let player = registry.player(player_id)?;
    let rows = crate::player_analysis::player_comparison(
        registry,
        &[player_id],
        &[
            PlayerMetric::Goals,
            PlayerMetric::Caps,
            PlayerMetric::Age,
            PlayerMetric::GoalsPerMatch,
            PlayerMetric::AssistsPerMatch,
        ],
    )?;

    let mut series = ChartSeries::new(player.name.clone());
    if let Some(row) = rows.get(&player.id) {
        for (metric, value) in &row.metrics {
            let (label, scaled) = match metric {
                PlayerMetric::Goals => ("goals", *value),
                PlayerMetric::Caps => ("caps", *value),
                PlayerMetric::Age => ("age", *value),
                PlayerMetric::GoalsPerMatch => ("goals_per_match", value * 100.0),
                PlayerMetric::AssistsPerMatch => ("assists_per_match", value * 100.0),
            };
            series.push(label, scaled);
        }
    }
    Ok(Chart {
        title: format!("{} Performance Profile", player.name),
        series: vec![series],
    })
}
