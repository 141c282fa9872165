use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsResult;
use crate::metrics;
use crate::registry::{Confederation, QualificationRecord, QualificationStatus, Registry};

/// Weights and normalisation constants of the qualification heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub points_weight: f64,
    pub ranking_weight: f64,
    pub goal_diff_weight: f64,
    // Points available per match.
    pub max_points_per_match: f64,
    pub goal_diff_offset: f64,
    pub goal_diff_span: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            points_weight: 0.5,
            ranking_weight: 0.3,
            goal_diff_weight: 0.2,
            max_points_per_match: 3.0,
            goal_diff_offset: 10.0,
            goal_diff_span: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfederationStats {
    pub confederation: Confederation,
    pub team_count: usize,
    pub qualified_teams: usize,
    pub avg_matches: f64,
    pub avg_points: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub total_slots: u32,
}

impl ConfederationStats {
    /// Fraction of the confederation's slots already taken.
    pub fn slots_factor(&self) -> f64 {
        if self.total_slots == 0 {
            return 0.0;
        }
        self.qualified_teams as f64 / f64::from(self.total_slots)
    }
}

/// Roll up the qualification records of every team registered to `confed`.
///
/// Returns `None` when the confederation has no registered teams. Teams without
/// a record still count towards `team_count`.
pub fn confederation_stats(registry: &Registry, confed: Confederation) -> Option<ConfederationStats> {
    let teams = registry.confederation_teams(confed);
    if teams.is_empty() {
        return None;
    }

    let mut total_matches = 0u64;
    let mut total_points = 0u64;
    let mut total_goals_for = 0u64;
    let mut total_goals_against = 0u64;
    let mut qualified_teams = 0usize;

    for team in &teams {
        if team.is_qualified() {
            qualified_teams += 1;
        }
        let Ok(rec) = registry.qualification_record(&team.code) else {
            continue;
        };
        total_matches += u64::from(rec.matches_played);
        total_points += u64::from(rec.points);
        total_goals_for += u64::from(rec.goals_for);
        total_goals_against += u64::from(rec.goals_against);
    }

    let team_count = teams.len();
    let n = team_count as f64;
    let per_team = |total: u64| {
        if total_matches > 0 {
            total as f64 / n
        } else {
            0.0
        }
    };

    let total_slots = registry
        .confederation_format(confed)
        .map(|f| f.total_slots)
        .unwrap_or(0);

    Some(ConfederationStats {
        confederation: confed,
        team_count,
        qualified_teams,
        avg_matches: total_matches as f64 / n,
        avg_points: per_team(total_points),
        avg_goals_for: per_team(total_goals_for),
        avg_goals_against: per_team(total_goals_against),
        total_slots,
    })
}

/// Heuristic chance that a team reaches the finals, in `[0, 1]`.
///
/// Resolved teams short-circuit (qualified 1.0, eliminated 0.0). Otherwise form,
/// ranking and goal difference are blended and then scaled down by how many of
/// the confederation's slots are already filled.
pub fn qualification_probability(
    registry: &Registry,
    team_code: &str,
    cfg: &EstimatorConfig,
) -> AnalyticsResult<f64> {
    let team = registry.team(team_code)?;
    match team.status {
        QualificationStatus::Qualified => return Ok(1.0),
        QualificationStatus::Eliminated => return Ok(0.0),
        QualificationStatus::InProgress | QualificationStatus::Unknown => {}
    }

    let record = registry.qualification_record(team_code)?;
    let slots_factor = confederation_stats(registry, team.confederation)
        .map(|s| s.slots_factor())
        .unwrap_or(0.0);

    let p = blend_probability(record, team.ranking, slots_factor, cfg);
    log::debug!(
        "qualification probability {team_code}: {p:.4} (slots factor {slots_factor:.3})"
    );
    Ok(p)
}

fn blend_probability(
    record: &QualificationRecord,
    ranking: u32,
    slots_factor: f64,
    cfg: &EstimatorConfig,
) -> f64 {
    let points_per_match = metrics::points_per_match(record);
    let ranking_factor = 1.0 / (f64::from(ranking) + 1.0);
    let goal_diff_factor =
        (record.goal_difference() as f64 + cfg.goal_diff_offset) / cfg.goal_diff_span;

    let mut p = cfg.points_weight * points_per_match / cfg.max_points_per_match
        + cfg.ranking_weight * ranking_factor
        + cfg.goal_diff_weight * goal_diff_factor;
    p *= 1.0 - slots_factor;

    if p.is_nan() {
        return 0.0;
    }
    p.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamQualificationEntry {
    pub name: String,
    pub confederation: Confederation,
    pub ranking: u32,
    pub qualification_data: QualificationRecord,
    pub efficiency: f64,
    pub qualification_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationAnalysis {
    pub teams: BTreeMap<String, TeamQualificationEntry>,
    pub confederation_stats: BTreeMap<String, ConfederationStats>,
}

/// Assemble the qualification report for one confederation, or all of them.
///
/// Teams without a qualification record are left out rather than failing the
/// whole report.
pub fn qualification_analysis(
    registry: &Registry,
    scope: Option<Confederation>,
    cfg: &EstimatorConfig,
) -> AnalyticsResult<QualificationAnalysis> {
    let teams = match scope {
        Some(confed) => registry.confederation_teams(confed),
        None => registry.teams().iter().collect(),
    };

    let mut entries = BTreeMap::new();
    for team in teams {
        let Ok(record) = registry.qualification_record(&team.code) else {
            log::debug!("no qualification record for {}, skipping", team.code);
            continue;
        };
        entries.insert(
            team.code.clone(),
            TeamQualificationEntry {
                name: team.name.clone(),
                confederation: team.confederation,
                ranking: team.ranking,
                qualification_data: record.clone(),
                efficiency: metrics::points_per_match(record),
                qualification_probability: qualification_probability(registry, &team.code, cfg)?,
            },
        );
    }

    let confeds: Vec<Confederation> = match scope {
        Some(confed) => vec![confed],
        None => Confederation::ALL.to_vec(),
    };
    let confederation_stats = confeds
        .into_iter()
        .filter_map(|c| confederation_stats(registry, c))
        .map(|s| (s.confederation.label().to_string(), s))
        .collect();

    Ok(QualificationAnalysis {
        teams: entries,
        confederation_stats,
    })
}
