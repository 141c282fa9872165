use chrono::{Datelike, Months, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::registry::{Confederation, Registry};

// Roughly half a place gained per month for every tracked team.
const TREND_PER_MONTH: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seed: u64,
}

impl HistoryConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            seed: 2026,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSample {
    pub team_name: String,
    pub team_code: String,
    pub confederation: Confederation,
    pub date: String,
    pub rank: u32,
    pub qualified: bool,
    pub host: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamStatusLabel {
    Host,
    Qualified,
    Potential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub code: String,
    pub confederation: Confederation,
    pub status: TeamStatusLabel,
    pub latest_rank: u32,
}

/// First day of every month from `start` through `end`, inclusive.
pub fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let Some(first) = start.with_day0(0) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cur = first;
    while cur <= end {
        out.push(cur);
        match cur.checked_add_months(Months::new(1)) {
            Some(next) => cur = next,
            None => break,
        }
    }
    out
}

fn volatility(base_rank: u32) -> f64 {
    if base_rank > 30 {
        5.0
    } else if base_rank > 10 {
        3.0
    } else {
        2.0
    }
}

/// Simulated monthly FIFA ranking history for every ranking track.
///
/// Deterministic for a given seed. Rows are grouped by team, then by month.
pub fn generate_rankings_history(
    registry: &Registry,
    cfg: &HistoryConfig,
) -> AnalyticsResult<Vec<RankingSample>> {
    if cfg.end < cfg.start {
        return Err(AnalyticsError::invalid(format!(
            "history window ends ({}) before it starts ({})",
            cfg.end, cfg.start
        )));
    }
    let months = month_starts(cfg.start, cfg.end);
    let Some(&first) = months.first() else {
        return Ok(Vec::new());
    };

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut rows = Vec::with_capacity(months.len() * registry.ranking_tracks().len());

    for track in registry.ranking_tracks() {
        let team = registry.team(&track.team)?;
        let noise = Normal::new(0.0, volatility(track.base_rank))
            .map_err(|e| AnalyticsError::invalid(format!("noise for {}: {e}", track.team)))?;

        for &month in &months {
            let elapsed_days = (month - first).num_days() as f64;
            let trend = TREND_PER_MONTH * elapsed_days / 30.0;
            let raw = f64::from(track.base_rank) + trend + noise.sample(&mut rng);
            // Truncate toward zero, then floor at first place.
            let rank = (raw.trunc() as i64).max(1);

            rows.push(RankingSample {
                team_name: team.name.clone(),
                team_code: team.code.clone(),
                confederation: team.confederation,
                date: month.format("%Y-%m").to_string(),
                rank: u32::try_from(rank).unwrap_or(u32::MAX),
                qualified: team.is_qualified(),
                host: team.host,
            });
        }
    }

    log::debug!(
        "generated {} ranking samples over {} months (seed {})",
        rows.len(),
        months.len(),
        cfg.seed
    );
    Ok(rows)
}

/// Latest rank and status label per tracked team, best rank first.
pub fn team_info(registry: &Registry, history: &[RankingSample]) -> AnalyticsResult<Vec<TeamInfo>> {
    let Some(latest_date) = history.iter().map(|r| r.date.as_str()).max() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for track in registry.ranking_tracks() {
        let team = registry.team(&track.team)?;
        let Some(latest) = history
            .iter()
            .find(|r| r.team_code == team.code && r.date == latest_date)
        else {
            continue;
        };
        let status = if team.host {
            TeamStatusLabel::Host
        } else if team.is_qualified() {
            TeamStatusLabel::Qualified
        } else {
            TeamStatusLabel::Potential
        };
        out.push(TeamInfo {
            name: team.name.clone(),
            code: team.code.clone(),
            confederation: team.confederation,
            status,
            latest_rank: latest.rank,
        });
    }

    out.sort_by_key(|t| t.latest_rank);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{month_starts, volatility};

    #[test]
    fn month_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let months = month_starts(start, end);
        assert_eq!(months.len(), 30);
        assert_eq!(months.last().copied(), Some(end));
    }

    #[test]
    fn volatility_tiers() {
        assert_eq!(volatility(2), 2.0);
        assert_eq!(volatility(11), 3.0);
        assert_eq!(volatility(30), 3.0);
        assert_eq!(volatility(31), 5.0);
    }
}
