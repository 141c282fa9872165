use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::registry::{EventKind, MatchEvent, MatchPhase, MatchRecord, Registry};

const GOAL_SWING: f64 = 2.0;
const CARD_SWING: f64 = 0.5;
const FULL_TIME_MINUTE: u32 = 90;
const DRAW_PROB: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub events_count: usize,
    pub goals: usize,
    pub cards: usize,
    pub team1_goals: usize,
    pub team2_goals: usize,
    pub team1_cards: usize,
    pub team2_cards: usize,
    pub events: Vec<MatchEvent>,
}

/// Goals and cards per 15-minute window. Every phase is present, even when empty.
pub fn phase_analysis(
    registry: &Registry,
    match_id: &str,
) -> AnalyticsResult<BTreeMap<MatchPhase, PhaseSummary>> {
    let m = registry.match_record(match_id)?;
    let events = registry.match_events(match_id);
    Ok(summarize_phases(m, &events))
}

fn summarize_phases(m: &MatchRecord, events: &[&MatchEvent]) -> BTreeMap<MatchPhase, PhaseSummary> {
    let mut out = BTreeMap::new();
    for phase in MatchPhase::ALL {
        let in_phase: Vec<&MatchEvent> = events
            .iter()
            .copied()
            .filter(|e| e.phase() == phase)
            .collect();
        let is_goal = |k: EventKind| k == EventKind::Goal;
        let team1_goals = count_team_events(&in_phase, &m.team1, is_goal);
        let team2_goals = count_team_events(&in_phase, &m.team2, is_goal);
        let team1_cards = count_team_events(&in_phase, &m.team1, EventKind::is_card);
        let team2_cards = count_team_events(&in_phase, &m.team2, EventKind::is_card);
        out.insert(
            phase,
            PhaseSummary {
                events_count: in_phase.len(),
                goals: team1_goals + team2_goals,
                cards: team1_cards + team2_cards,
                team1_goals,
                team2_goals,
                team1_cards,
                team2_cards,
                events: in_phase.into_iter().cloned().collect(),
            },
        );
    }
    out
}

fn count_team_events(events: &[&MatchEvent], team: &str, pred: impl Fn(EventKind) -> bool) -> usize {
    events
        .iter()
        .filter(|e| e.team == team && pred(e.kind))
        .count()
}

/// Momentum samples; positive values favour team1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSeries {
    pub minutes: Vec<u32>,
    pub values: Vec<f64>,
}

impl MomentumSeries {
    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

pub fn match_momentum(registry: &Registry, match_id: &str) -> AnalyticsResult<MomentumSeries> {
    let m = registry.match_record(match_id)?;
    let events = registry.match_events(match_id);
    Ok(momentum_from_events(&m.team1, &events))
}

/// Running momentum over `events`, starting at (0, 0) and closing with a
/// full-time sample that repeats the final value.
///
/// Events are ordered by minute with a stable sort, so same-minute events keep
/// their input order. Any team other than `team1` is treated as team2.
pub fn momentum_from_events(team1: &str, events: &[&MatchEvent]) -> MomentumSeries {
    let mut ordered: Vec<&MatchEvent> = events.to_vec();
    ordered.sort_by_key(|e| e.minute);

    let mut minutes = Vec::with_capacity(ordered.len() + 2);
    let mut values = Vec::with_capacity(ordered.len() + 2);
    minutes.push(0);
    values.push(0.0);

    let mut current = 0.0;
    for e in ordered {
        current += event_swing(team1, e);
        minutes.push(e.minute);
        values.push(current);
    }

    minutes.push(FULL_TIME_MINUTE);
    values.push(current);
    MomentumSeries { minutes, values }
}

fn event_swing(team1: &str, e: &MatchEvent) -> f64 {
    let sign = if e.team == team1 { 1.0 } else { -1.0 };
    match e.kind {
        EventKind::Goal => sign * GOAL_SWING,
        EventKind::YellowCard | EventKind::RedCard => -sign * CARD_SWING,
        EventKind::Assist => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomePrediction {
    pub team1_win: f64,
    pub team2_win: f64,
    pub draw: f64,
}

/// Ranking-only outcome split with a fixed draw share.
pub fn predict_match_outcome(
    registry: &Registry,
    team1_code: &str,
    team2_code: &str,
) -> AnalyticsResult<OutcomePrediction> {
    let t1 = registry.team(team1_code)?;
    let t2 = registry.team(team2_code)?;
    if t1.code == t2.code {
        return Err(AnalyticsError::invalid(format!(
            "cannot predict {} against itself",
            t1.code
        )));
    }

    let s1 = 1.0 / f64::from(t1.ranking);
    let s2 = 1.0 / f64::from(t2.ranking);
    let total = s1 + s2;

    Ok(OutcomePrediction {
        team1_win: s1 / total * (1.0 - DRAW_PROB),
        team2_win: s2 / total * (1.0 - DRAW_PROB),
        draw: DRAW_PROB,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSide {
    pub code: String,
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub match_id: String,
    pub team1: MatchSide,
    pub team2: MatchSide,
    pub date: String,
    pub tournament: String,
    pub stage: String,
    pub events_count: usize,
    pub phase_analysis: BTreeMap<MatchPhase, PhaseSummary>,
    pub momentum_data: MomentumSeries,
}

pub fn match_analysis(registry: &Registry, match_id: &str) -> AnalyticsResult<MatchAnalysis> {
    let m = registry.match_record(match_id)?;
    let events = registry.match_events(match_id);

    let side = |code: &str, score: u32| MatchSide {
        code: code.to_string(),
        name: registry
            .team(code)
            .map(|t| t.name.clone())
            .unwrap_or_else(|_| code.to_string()),
        score,
    };

    Ok(MatchAnalysis {
        match_id: m.id.clone(),
        team1: side(&m.team1, m.score1),
        team2: side(&m.team2, m.score2),
        date: m.date.clone(),
        tournament: m.tournament.clone(),
        stage: m.stage.clone(),
        events_count: events.len(),
        phase_analysis: summarize_phases(m, &events),
        momentum_data: momentum_from_events(&m.team1, &events),
    })
}
