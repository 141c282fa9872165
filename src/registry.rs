use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult, EntityKind};

const SAMPLE_REGISTRY_JSON: &str = include_str!("../data/sample_registry.json");

static SAMPLE: OnceCell<Registry> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confederation {
    AFC,
    CAF,
    CONCACAF,
    CONMEBOL,
    UEFA,
    OFC,
}

impl Confederation {
    /// Display order used by the cross-confederation reports.
    pub const ALL: [Confederation; 6] = [
        Confederation::UEFA,
        Confederation::CONMEBOL,
        Confederation::CONCACAF,
        Confederation::AFC,
        Confederation::CAF,
        Confederation::OFC,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Confederation::AFC => "AFC",
            Confederation::CAF => "CAF",
            Confederation::CONCACAF => "CONCACAF",
            Confederation::CONMEBOL => "CONMEBOL",
            Confederation::UEFA => "UEFA",
            Confederation::OFC => "OFC",
        }
    }

    pub fn parse(raw: &str) -> Option<Confederation> {
        let key = raw.trim();
        Confederation::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualificationStatus {
    Qualified,
    InProgress,
    Eliminated,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub code: String,
    pub name: String,
    pub confederation: Confederation,
    pub ranking: u32,
    #[serde(default)]
    pub status: QualificationStatus,
    #[serde(default)]
    pub host: bool,
    // Known to the rankings history and player data only; not part of any
    // qualification pool.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ranking_only: bool,
}

impl Team {
    pub fn is_qualified(&self) -> bool {
        self.status == QualificationStatus::Qualified
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationRecord {
    pub team: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl QualificationRecord {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfederationFormat {
    pub confederation: Confederation,
    pub total_slots: u32,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub team1: String,
    pub team2: String,
    pub score1: u32,
    pub score2: u32,
    pub date: String,
    pub tournament: String,
    pub stage: String,
    // Set when a drawn match was settled on penalties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl MatchRecord {
    pub fn involves(&self, team_code: &str) -> bool {
        self.team1 == team_code || self.team2 == team_code
    }

    pub fn winner(&self) -> Option<&str> {
        if let Some(w) = self.winner.as_deref() {
            return Some(w);
        }
        if self.score1 > self.score2 {
            Some(&self.team1)
        } else if self.score2 > self.score1 {
            Some(&self.team2)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Goal,
    Assist,
    YellowCard,
    RedCard,
}

impl EventKind {
    pub fn is_card(self) -> bool {
        matches!(self, EventKind::YellowCard | EventKind::RedCard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchPhase {
    #[serde(rename = "0-15")]
    Opening,
    #[serde(rename = "16-30")]
    FirstQuarter,
    #[serde(rename = "31-45")]
    FirstHalfClose,
    #[serde(rename = "46-60")]
    SecondHalfOpen,
    #[serde(rename = "61-90")]
    Closing,
}

impl MatchPhase {
    pub const ALL: [MatchPhase; 5] = [
        MatchPhase::Opening,
        MatchPhase::FirstQuarter,
        MatchPhase::FirstHalfClose,
        MatchPhase::SecondHalfOpen,
        MatchPhase::Closing,
    ];

    pub fn from_minute(minute: u32) -> MatchPhase {
        match minute {
            0..=15 => MatchPhase::Opening,
            16..=30 => MatchPhase::FirstQuarter,
            31..=45 => MatchPhase::FirstHalfClose,
            46..=60 => MatchPhase::SecondHalfOpen,
            _ => MatchPhase::Closing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchPhase::Opening => "0-15",
            MatchPhase::FirstQuarter => "16-30",
            MatchPhase::FirstHalfClose => "31-45",
            MatchPhase::SecondHalfOpen => "46-60",
            MatchPhase::Closing => "61-90",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub match_id: String,
    pub team: String,
    pub kind: EventKind,
    pub minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

impl MatchEvent {
    pub fn phase(&self) -> MatchPhase {
        MatchPhase::from_minute(self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team: String,
    pub position: String,
    pub age: u32,
    pub caps: u32,
    pub goals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingTrack {
    pub team: String,
    pub base_rank: u32,
}

/// On-disk shape of a registry snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryData {
    pub teams: Vec<Team>,
    #[serde(default)]
    pub qualification_records: Vec<QualificationRecord>,
    #[serde(default)]
    pub confederation_formats: Vec<ConfederationFormat>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub events: Vec<MatchEvent>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub ranking_tracks: Vec<RankingTrack>,
}

/// Immutable, validated reference data for one analysis run.
///
/// Every calculator takes a `&Registry`; nothing mutates it after construction,
/// so a single instance can be shared freely.
#[derive(Debug, Clone)]
pub struct Registry {
    teams: Vec<Team>,
    team_index: HashMap<String, usize>,
    records: HashMap<String, QualificationRecord>,
    formats: HashMap<Confederation, ConfederationFormat>,
    matches: Vec<MatchRecord>,
    match_index: HashMap<String, usize>,
    events: Vec<MatchEvent>,
    players: Vec<Player>,
    player_index: HashMap<String, usize>,
    ranking_tracks: Vec<RankingTrack>,
}

impl Registry {
    pub fn new(data: RegistryData) -> AnalyticsResult<Self> {
        let RegistryData {
            teams,
            qualification_records,
            confederation_formats,
            matches,
            events,
            players,
            ranking_tracks,
        } = data;

        let mut team_index = HashMap::with_capacity(teams.len());
        for (idx, team) in teams.iter().enumerate() {
            if team.code.trim().is_empty() {
                return Err(AnalyticsError::invalid("team code must not be empty"));
            }
            if team.ranking == 0 {
                return Err(AnalyticsError::invalid(format!(
                    "team {} has non-positive ranking",
                    team.code
                )));
            }
            if team_index.insert(team.code.clone(), idx).is_some() {
                return Err(AnalyticsError::invalid(format!(
                    "duplicate team code {}",
                    team.code
                )));
            }
        }

        let mut records = HashMap::with_capacity(qualification_records.len());
        for rec in qualification_records {
            let Some(&team_idx) = team_index.get(&rec.team) else {
                return Err(AnalyticsError::invalid(format!(
                    "qualification record references unknown team {}",
                    rec.team
                )));
            };
            if teams[team_idx].ranking_only {
                return Err(AnalyticsError::invalid(format!(
                    "ranking-only team {} cannot carry a qualification record",
                    rec.team
                )));
            }
            let decided = rec
                .wins
                .checked_add(rec.draws)
                .and_then(|n| n.checked_add(rec.losses));
            if decided != Some(rec.matches_played) {
                return Err(AnalyticsError::invalid(format!(
                    "qualification record for {}: {}W+{}D+{}L does not add up to {} played",
                    rec.team, rec.wins, rec.draws, rec.losses, rec.matches_played
                )));
            }
            let code = rec.team.clone();
            if records.insert(code.clone(), rec).is_some() {
                return Err(AnalyticsError::invalid(format!(
                    "duplicate qualification record for {code}"
                )));
            }
        }

        let mut formats = HashMap::with_capacity(confederation_formats.len());
        for fmt in confederation_formats {
            if fmt.total_slots == 0 {
                return Err(AnalyticsError::invalid(format!(
                    "{} format has no qualification slots",
                    fmt.confederation.label()
                )));
            }
            let confed = fmt.confederation;
            if formats.insert(confed, fmt).is_some() {
                return Err(AnalyticsError::invalid(format!(
                    "duplicate format for {}",
                    confed.label()
                )));
            }
        }

        let mut match_index = HashMap::with_capacity(matches.len());
        for (idx, m) in matches.iter().enumerate() {
            if m.team1 == m.team2 {
                return Err(AnalyticsError::invalid(format!(
                    "match {} pairs {} with itself",
                    m.id, m.team1
                )));
            }
            for code in [&m.team1, &m.team2] {
                if !team_index.contains_key(code) {
                    return Err(AnalyticsError::invalid(format!(
                        "match {} references unknown team {code}",
                        m.id
                    )));
                }
            }
            if let Some(w) = m.winner.as_deref() {
                if !m.involves(w) {
                    return Err(AnalyticsError::invalid(format!(
                        "match {} winner {w} did not play",
                        m.id
                    )));
                }
            }
            if match_index.insert(m.id.clone(), idx).is_some() {
                return Err(AnalyticsError::invalid(format!("duplicate match id {}", m.id)));
            }
        }

        let mut player_index = HashMap::with_capacity(players.len());
        for (idx, p) in players.iter().enumerate() {
            if !team_index.contains_key(&p.team) {
                return Err(AnalyticsError::invalid(format!(
                    "player {} references unknown team {}",
                    p.id, p.team
                )));
            }
            if player_index.insert(p.id.clone(), idx).is_some() {
                return Err(AnalyticsError::invalid(format!("duplicate player id {}", p.id)));
            }
        }

        for ev in &events {
            let Some(&m_idx) = match_index.get(&ev.match_id) else {
                return Err(AnalyticsError::invalid(format!(
                    "event references unknown match {}",
                    ev.match_id
                )));
            };
            if !matches[m_idx].involves(&ev.team) {
                return Err(AnalyticsError::invalid(format!(
                    "event team {} did not play in {}",
                    ev.team, ev.match_id
                )));
            }
            if let Some(pid) = ev.player.as_deref() {
                if !player_index.contains_key(pid) {
                    return Err(AnalyticsError::invalid(format!(
                        "event in {} references unknown player {pid}",
                        ev.match_id
                    )));
                }
            }
        }

        let mut seen_tracks = HashSet::new();
        for track in &ranking_tracks {
            if !team_index.contains_key(&track.team) {
                return Err(AnalyticsError::invalid(format!(
                    "ranking track references unknown team {}",
                    track.team
                )));
            }
            if track.base_rank == 0 {
                return Err(AnalyticsError::invalid(format!(
                    "ranking track for {} has non-positive base rank",
                    track.team
                )));
            }
            if !seen_tracks.insert(track.team.as_str()) {
                return Err(AnalyticsError::invalid(format!(
                    "duplicate ranking track for {}",
                    track.team
                )));
            }
        }

        log::debug!(
            "registry built: {} teams, {} records, {} matches, {} events, {} players",
            teams.len(),
            records.len(),
            matches.len(),
            events.len(),
            players.len()
        );

        Ok(Self {
            teams,
            team_index,
            records,
            formats,
            matches,
            match_index,
            events,
            players,
            player_index,
            ranking_tracks,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let data: RegistryData = serde_json::from_str(raw).context("invalid registry json")?;
        Ok(Registry::new(data)?)
    }

    pub fn team(&self, code: &str) -> AnalyticsResult<&Team> {
        self.team_index
            .get(code)
            .map(|&idx| &self.teams[idx])
            .ok_or_else(|| AnalyticsError::not_found(EntityKind::Team, code))
    }

    pub fn qualification_record(&self, code: &str) -> AnalyticsResult<&QualificationRecord> {
        self.records
            .get(code)
            .ok_or_else(|| AnalyticsError::not_found(EntityKind::QualificationRecord, code))
    }

    pub fn confederation_format(
        &self,
        confed: Confederation,
    ) -> AnalyticsResult<&ConfederationFormat> {
        self.formats
            .get(&confed)
            .ok_or_else(|| AnalyticsError::not_found(EntityKind::ConfederationFormat, confed.label()))
    }

    pub fn match_record(&self, match_id: &str) -> AnalyticsResult<&MatchRecord> {
        self.match_index
            .get(match_id)
            .map(|&idx| &self.matches[idx])
            .ok_or_else(|| AnalyticsError::not_found(EntityKind::Match, match_id))
    }

    pub fn player(&self, player_id: &str) -> AnalyticsResult<&Player> {
        self.player_index
            .get(player_id)
            .map(|&idx| &self.players[idx])
            .ok_or_else(|| AnalyticsError::not_found(EntityKind::Player, player_id))
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ranking_tracks(&self) -> &[RankingTrack] {
        &self.ranking_tracks
    }

    /// Qualification pool of `confed`. Ranking-only teams are left out.
    pub fn confederation_teams(&self, confed: Confederation) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| t.confederation == confed && !t.ranking_only)
            .collect()
    }

    pub fn teams_by_status(&self, status: QualificationStatus) -> Vec<&Team> {
        self.teams.iter().filter(|t| t.status == status).collect()
    }

    pub fn qualified_teams(&self) -> Vec<&Team> {
        self.teams_by_status(QualificationStatus::Qualified)
    }

    pub fn team_matches(&self, team_code: &str) -> Vec<&MatchRecord> {
        self.matches.iter().filter(|m| m.involves(team_code)).collect()
    }

    /// Events for one match, in registry order.
    pub fn match_events(&self, match_id: &str) -> Vec<&MatchEvent> {
        self.events
            .iter()
            .filter(|e| e.match_id == match_id)
            .collect()
    }

    pub fn events_by_phase(&self, match_id: &str, phase: MatchPhase) -> Vec<&MatchEvent> {
        self.events
            .iter()
            .filter(|e| e.match_id == match_id && e.phase() == phase)
            .collect()
    }

    pub fn players_by_team(&self, team_code: &str) -> Vec<&Player> {
        self.players.iter().filter(|p| p.team == team_code).collect()
    }

    pub fn players_by_position(&self, position: &str) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.position.eq_ignore_ascii_case(position))
            .collect()
    }

    pub fn player_events(&self, player_id: &str) -> Vec<&MatchEvent> {
        self.events
            .iter()
            .filter(|e| e.player.as_deref() == Some(player_id))
            .collect()
    }
}

pub fn load_registry(path: &Path) -> Result<Registry> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read registry file {}", path.display()))?;
    let registry = Registry::from_json(&raw)
        .with_context(|| format!("load registry from {}", path.display()))?;
    log::info!("loaded registry from {}", path.display());
    Ok(registry)
}

/// The bundled sample dataset, parsed once and shared.
pub fn sample_registry() -> Result<&'static Registry> {
    SAMPLE.get_or_try_init(|| Registry::from_json(SAMPLE_REGISTRY_JSON).context("embedded sample registry"))
}

#[cfg(test)]
mod tests {
    use super::{MatchPhase, MatchRecord};

    #[test]
    fn phase_buckets_follow_minute_boundaries() {
        assert_eq!(MatchPhase::from_minute(0), MatchPhase::Opening);
        assert_eq!(MatchPhase::from_minute(15), MatchPhase::Opening);
        assert_eq!(MatchPhase::from_minute(16), MatchPhase::FirstQuarter);
        assert_eq!(MatchPhase::from_minute(45), MatchPhase::FirstHalfClose);
        assert_eq!(MatchPhase::from_minute(60), MatchPhase::SecondHalfOpen);
        assert_eq!(MatchPhase::from_minute(61), MatchPhase::Closing);
        // Stoppage time stays in the last bucket.
        assert_eq!(MatchPhase::from_minute(94), MatchPhase::Closing);
    }

    #[test]
    fn shootout_winner_overrides_draw() {
        let mut m = MatchRecord {
            id: "H1".to_string(),
            team1: "ARG".to_string(),
            team2: "FRA".to_string(),
            score1: 3,
            score2: 3,
            date: "2022-12-18".to_string(),
            tournament: "World Cup 2022".to_string(),
            stage: "Final".to_string(),
            winner: None,
        };
        assert_eq!(m.winner(), None);
        m.winner = Some("ARG".to_string());
        assert_eq!(m.winner(), Some("ARG"));
    }
}
