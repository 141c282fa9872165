use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsResult;
use crate::metrics;
use crate::registry::{Confederation, MatchEvent, Player, Registry};

pub const DEFAULT_COMPARISON_METRICS: [PlayerMetric; 3] = [
    PlayerMetric::Goals,
    PlayerMetric::Caps,
    PlayerMetric::GoalsPerMatch,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMetric {
    Goals,
    Caps,
    Age,
    GoalsPerMatch,
    AssistsPerMatch,
}

impl PlayerMetric {
    pub fn parse(raw: &str) -> Option<PlayerMetric> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "goals" => Some(PlayerMetric::Goals),
            "caps" => Some(PlayerMetric::Caps),
            "age" => Some(PlayerMetric::Age),
            "goals_per_match" => Some(PlayerMetric::GoalsPerMatch),
            "assists_per_match" => Some(PlayerMetric::AssistsPerMatch),
            _ => None,
        }
    }

    fn value(self, registry: &Registry, player: &Player) -> AnalyticsResult<f64> {
        Ok(match self {
            PlayerMetric::Goals => f64::from(player.goals),
            PlayerMetric::Caps => f64::from(player.caps),
            PlayerMetric::Age => f64::from(player.age),
            PlayerMetric::GoalsPerMatch => metrics::player_goals_per_match(registry, &player.id)?,
            PlayerMetric::AssistsPerMatch => {
                metrics::player_assists_per_match(registry, &player.id)?
            }
        })
    }
}

/// Players ordered by career goals, highest first. Ties keep registry order.
pub fn top_scorers(registry: &Registry, limit: usize) -> Vec<&Player> {
    rank_by_goals(registry.players().iter().collect(), limit)
}

pub fn top_scorers_by_confederation(
    registry: &Registry,
    confed: Confederation,
    limit: usize,
) -> Vec<&Player> {
    let pool = registry
        .players()
        .iter()
        .filter(|p| {
            registry
                .team(&p.team)
                .is_ok_and(|t| t.confederation == confed)
        })
        .collect();
    rank_by_goals(pool, limit)
}

fn rank_by_goals(mut players: Vec<&Player>, limit: usize) -> Vec<&Player> {
    players.sort_by(|a, b| b.goals.cmp(&a.goals));
    players.truncate(limit);
    players
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComparisonRow {
    pub name: String,
    pub team: String,
    pub position: String,
    pub metrics: BTreeMap<PlayerMetric, f64>,
}

/// Side-by-side metrics for the requested players. Unknown ids are skipped.
pub fn player_comparison(
    registry: &Registry,
    player_ids: &[&str],
    metrics: &[PlayerMetric],
) -> AnalyticsResult<BTreeMap<String, PlayerComparisonRow>> {
    let metrics = if metrics.is_empty() {
        &DEFAULT_COMPARISON_METRICS[..]
    } else {
        metrics
    };

    let mut out = BTreeMap::new();
    for &pid in player_ids {
        let Ok(player) = registry.player(pid) else {
            log::warn!("player {pid} not in registry, skipping comparison row");
            continue;
        };
        let mut values = BTreeMap::new();
        for &metric in metrics {
            values.insert(metric, metric.value(registry, player)?);
        }
        out.insert(
            player.id.clone(),
            PlayerComparisonRow {
                name: player.name.clone(),
                team: player.team.clone(),
                position: player.position.clone(),
                metrics: values,
            },
        );
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAnalysisReport {
    pub player_id: String,
    pub name: String,
    pub team: String,
    pub team_name: Option<String>,
    pub position: String,
    pub age: u32,
    pub caps: u32,
    pub goals: u32,
    pub goals_per_match: f64,
    pub assists_per_match: f64,
    pub events: Vec<MatchEvent>,
}

pub fn player_analysis(registry: &Registry, player_id: &str) -> AnalyticsResult<PlayerAnalysisReport> {
    let player = registry.player(player_id)?;
    Ok(PlayerAnalysisReport {
        player_id: player.id.clone(),
        name: player.name.clone(),
        team: player.team.clone(),
        team_name: registry.team(&player.team).ok().map(|t| t.name.clone()),
        position: player.position.clone(),
        age: player.age,
        caps: player.caps,
        goals: player.goals,
        goals_per_match: metrics::player_goals_per_match(registry, player_id)?,
        assists_per_match: metrics::player_assists_per_match(registry, player_id)?,
        events: registry
            .player_events(player_id)
            .into_iter()
            .cloned()
            .collect(),
    })
}
