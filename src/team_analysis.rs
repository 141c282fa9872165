use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::metrics;
use crate::registry::{Confederation, MatchRecord, Registry};

const GROUP_SIZE: usize = 4;
const RANKING_WEIGHT: f64 = 0.7;
const FORM_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub total_matches: usize,
    pub team1_wins: usize,
    pub team2_wins: usize,
    pub draws: usize,
    pub matches: Vec<MatchRecord>,
}

pub fn head_to_head(
    registry: &Registry,
    team1_code: &str,
    team2_code: &str,
) -> AnalyticsResult<HeadToHead> {
    registry.team(team1_code)?;
    registry.team(team2_code)?;
    if team1_code == team2_code {
        return Err(AnalyticsError::invalid(format!(
            "head-to-head needs two different teams, got {team1_code} twice"
        )));
    }

    let matches: Vec<MatchRecord> = registry
        .matches()
        .iter()
        .filter(|m| m.involves(team1_code) && m.involves(team2_code))
        .cloned()
        .collect();
    let team1_wins = matches
        .iter()
        .filter(|m| m.winner() == Some(team1_code))
        .count();
    let team2_wins = matches
        .iter()
        .filter(|m| m.winner() == Some(team2_code))
        .count();

    Ok(HeadToHead {
        total_matches: matches.len(),
        team1_wins,
        team2_wins,
        draws: matches.len() - team1_wins - team2_wins,
        matches,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStanding {
    pub team: String,
    pub name: String,
    pub score: f64,
}

/// Order a four-team group by 0.7 × inverse ranking + 0.3 × historical win rate.
/// Ties keep the order the teams were given in.
pub fn predict_group_standings(
    registry: &Registry,
    group: &[&str],
) -> AnalyticsResult<Vec<GroupStanding>> {
    if group.len() != GROUP_SIZE {
        return Err(AnalyticsError::invalid(format!(
            "group must contain exactly {GROUP_SIZE} teams, got {}",
            group.len()
        )));
    }

    let mut standings = Vec::with_capacity(GROUP_SIZE);
    for &code in group {
        let team = registry.team(code)?;
        let ranking_score = 1.0 / f64::from(team.ranking);
        let win_rate = metrics::win_percentage(registry, code) / 100.0;
        standings.push(GroupStanding {
            team: team.code.clone(),
            name: team.name.clone(),
            score: RANKING_WEIGHT * ranking_score + FORM_WEIGHT * win_rate,
        });
    }

    standings.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(standings)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultCounts {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

pub fn result_counts(registry: &Registry, team_code: &str) -> AnalyticsResult<ResultCounts> {
    registry.team(team_code)?;
    let mut out = ResultCounts::default();
    for m in registry.team_matches(team_code) {
        match m.winner() {
            Some(w) if w == team_code => out.wins += 1,
            Some(_) => out.losses += 1,
            None => out.draws += 1,
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAnalysisReport {
    pub team_code: String,
    pub team_name: String,
    pub confederation: Confederation,
    pub fifa_ranking: u32,
    pub qualified: bool,
    pub matches_analyzed: usize,
    pub win_percentage: f64,
    pub matches: Vec<MatchRecord>,
}

pub fn team_analysis(registry: &Registry, team_code: &str) -> AnalyticsResult<TeamAnalysisReport> {
    let team = registry.team(team_code)?;
    let matches: Vec<MatchRecord> = registry
        .team_matches(team_code)
        .into_iter()
        .cloned()
        .collect();

    Ok(TeamAnalysisReport {
        team_code: team.code.clone(),
        team_name: team.name.clone(),
        confederation: team.confederation,
        fifa_ranking: team.ranking,
        qualified: team.is_qualified(),
        matches_analyzed: matches.len(),
        win_percentage: metrics::win_percentage(registry, team_code),
        matches,
    })
}
