use crate::error::AnalyticsResult;
use crate::registry::{EventKind, Player, QualificationRecord, Registry};

// Rate calculators return 0.0 for an empty denominator instead of failing so
// aggregate reports never lose a row.

fn rate(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    f64::from(numerator) / f64::from(denominator)
}

pub fn points_per_match(record: &QualificationRecord) -> f64 {
    rate(record.points, record.matches_played)
}

pub fn goals_per_match(record: &QualificationRecord) -> f64 {
    rate(record.goals_for, record.matches_played)
}

pub fn goals_against_per_match(record: &QualificationRecord) -> f64 {
    rate(record.goals_against, record.matches_played)
}

/// Points per match for a registered team; fails when the team has no record.
pub fn qualification_efficiency(registry: &Registry, team_code: &str) -> AnalyticsResult<f64> {
    let record = registry.qualification_record(team_code)?;
    Ok(points_per_match(record))
}

/// Share of the team's recorded matches that it won, in percent.
pub fn win_percentage(registry: &Registry, team_code: &str) -> f64 {
    let matches = registry.team_matches(team_code);
    if matches.is_empty() {
        return 0.0;
    }
    let wins = matches
        .iter()
        .filter(|m| m.winner() == Some(team_code))
        .count();
    (wins as f64 / matches.len() as f64) * 100.0
}

fn player_event_count(registry: &Registry, player: &Player, kind: EventKind) -> u32 {
    let n = registry
        .player_events(&player.id)
        .into_iter()
        .filter(|e| e.kind == kind)
        .count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

// Caps stand in for matches played; the event feed only covers a handful of fixtures.
pub fn player_goals_per_match(registry: &Registry, player_id: &str) -> AnalyticsResult<f64> {
    let player = registry.player(player_id)?;
    Ok(rate(player_event_count(registry, player, EventKind::Goal), player.caps))
}

pub fn player_assists_per_match(registry: &Registry, player_id: &str) -> AnalyticsResult<f64> {
    let player = registry.player(player_id)?;
    Ok(rate(player_event_count(registry, player, EventKind::Assist), player.caps))
}

#[cfg(test)]
mod tests {
    use super::{goals_per_match, points_per_match};
    use crate::registry::QualificationRecord;

    fn record(played: u32, points: u32, goals_for: u32) -> QualificationRecord {
        QualificationRecord {
            team: "TST".to_string(),
            matches_played: played,
            wins: played,
            draws: 0,
            losses: 0,
            goals_for,
            goals_against: 0,
            points,
        }
    }

    #[test]
    fn zero_matches_yield_zero_rates() {
        let r = record(0, 0, 0);
        assert_eq!(points_per_match(&r), 0.0);
        assert_eq!(goals_per_match(&r), 0.0);
    }

    #[test]
    fn points_per_match_divides_by_played() {
        let r = record(8, 19, 16);
        assert!((points_per_match(&r) - 2.375).abs() < 1e-12);
        assert!((goals_per_match(&r) - 2.0).abs() < 1e-12);
    }
}
