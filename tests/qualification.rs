use std::fs;
use std::path::PathBuf;

use wc26_analytics::error::{AnalyticsError, EntityKind};
use wc26_analytics::metrics;
use wc26_analytics::qualification::{
    EstimatorConfig, confederation_stats, qualification_analysis, qualification_probability,
};
use wc26_analytics::registry::{Confederation, QualificationStatus, Registry, sample_registry};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn mini() -> Registry {
    Registry::from_json(&read_fixture("mini_registry.json")).expect("fixture should load")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn efficiency_is_points_per_match() {
    let reg = mini();
    let eff = metrics::qualification_efficiency(&reg, "AAA").unwrap();
    assert!(approx(eff, 19.0 / 8.0));
    let rec = reg.qualification_record("AAA").unwrap();
    assert!(approx(metrics::goals_per_match(rec), 2.0));
    assert!(approx(metrics::goals_against_per_match(rec), 0.625));
}

#[test]
fn zero_match_record_yields_zero_rates() {
    let reg = mini();
    let rec = reg.qualification_record("EEE").unwrap();
    assert_eq!(metrics::points_per_match(rec), 0.0);
    assert_eq!(metrics::goals_per_match(rec), 0.0);
    assert_eq!(metrics::goals_against_per_match(rec), 0.0);
}

#[test]
fn resolved_status_short_circuits() {
    let reg = mini();
    let cfg = EstimatorConfig::default();
    assert_eq!(qualification_probability(&reg, "AAA", &cfg).unwrap(), 1.0);
    assert_eq!(qualification_probability(&reg, "DDD", &cfg).unwrap(), 0.0);
}

#[test]
fn in_progress_team_is_scaled_by_filled_slots() {
    let reg = mini();
    let stats = confederation_stats(&reg, Confederation::CONMEBOL).unwrap();
    assert_eq!(stats.qualified_teams, 2);
    assert_eq!(stats.total_slots, 6);
    assert!(approx(stats.slots_factor(), 1.0 / 3.0));

    // 0.5 * 1.75/3 + 0.3 * 1/6 + 0.2 * 15/20, then * (1 - 1/3)
    let base = 0.5 * (14.0 / 8.0) / 3.0 + 0.3 / 6.0 + 0.2 * 15.0 / 20.0;
    let p = qualification_probability(&reg, "BBB", &EstimatorConfig::default()).unwrap();
    assert!(approx(p, base * (2.0 / 3.0)), "got {p}");
}

#[test]
fn zero_match_team_still_gets_ranking_and_goal_terms() {
    let reg = mini();
    let p = qualification_probability(&reg, "EEE", &EstimatorConfig::default()).unwrap();
    assert!(approx(p, 0.3 / 4.0 + 0.2 * 0.5), "got {p}");
}

#[test]
fn missing_format_means_no_slot_discount() {
    let reg = mini();
    let stats = confederation_stats(&reg, Confederation::AFC).unwrap();
    assert_eq!(stats.total_slots, 0);
    assert_eq!(stats.slots_factor(), 0.0);

    let expected = 0.5 * (7.0 / 4.0) / 3.0 + 0.3 / 51.0 + 0.2 * 12.0 / 20.0;
    let p = qualification_probability(&reg, "GGG", &EstimatorConfig::default()).unwrap();
    assert!(approx(p, expected), "got {p}");
}

#[test]
fn unknown_team_and_missing_record_are_not_found() {
    let reg = mini();
    let cfg = EstimatorConfig::default();
    assert_eq!(
        qualification_probability(&reg, "ZZZ", &cfg),
        Err(AnalyticsError::NotFound {
            kind: EntityKind::Team,
            code: "ZZZ".to_string()
        })
    );
    assert_eq!(
        qualification_probability(&reg, "FFF", &cfg),
        Err(AnalyticsError::NotFound {
            kind: EntityKind::QualificationRecord,
            code: "FFF".to_string()
        })
    );
    assert!(
        metrics::qualification_efficiency(&reg, "FFF")
            .unwrap_err()
            .is_not_found()
    );
}

#[test]
fn confederation_stats_averages_over_all_teams() {
    let reg = mini();
    let stats = confederation_stats(&reg, Confederation::CONMEBOL).unwrap();
    assert_eq!(stats.team_count, 4);
    assert!(approx(stats.avg_matches, 8.0));
    assert!(approx(stats.avg_points, 54.0 / 4.0));
    assert!(approx(stats.avg_goals_for, 46.0 / 4.0));
    assert!(approx(stats.avg_goals_against, 33.0 / 4.0));

    // EEE has played nothing, FFF has no record at all and HHH is ranking-only.
    let uefa = confederation_stats(&reg, Confederation::UEFA).unwrap();
    assert_eq!(uefa.team_count, 2);
    assert_eq!(uefa.avg_matches, 0.0);
    assert_eq!(uefa.avg_points, 0.0);

    assert!(confederation_stats(&reg, Confederation::CAF).is_none());
    assert!(confederation_stats(&reg, Confederation::OFC).is_none());
}

#[test]
fn scoped_analysis_only_covers_that_confederation() {
    let reg = mini();
    let analysis =
        qualification_analysis(&reg, Some(Confederation::CONMEBOL), &EstimatorConfig::default())
            .unwrap();
    let codes: Vec<&str> = analysis.teams.keys().map(String::as_str).collect();
    assert_eq!(codes, ["AAA", "BBB", "CCC", "DDD"]);
    let confeds: Vec<&str> = analysis
        .confederation_stats
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(confeds, ["CONMEBOL"]);
    assert!(approx(analysis.teams["AAA"].efficiency, 2.375));
    assert_eq!(analysis.teams["AAA"].qualification_probability, 1.0);
}

#[test]
fn full_analysis_skips_teams_without_records() {
    let reg = mini();
    let analysis = qualification_analysis(&reg, None, &EstimatorConfig::default()).unwrap();
    assert_eq!(analysis.teams.len(), 6);
    assert!(!analysis.teams.contains_key("FFF"));
    let confeds: Vec<&str> = analysis
        .confederation_stats
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(confeds, ["AFC", "CONMEBOL", "UEFA"]);
}

#[test]
fn sample_probabilities_stay_in_unit_interval() {
    let reg = sample_registry().unwrap();
    let cfg = EstimatorConfig::default();
    let mut checked = 0;
    for team in reg.teams() {
        let p = match qualification_probability(reg, &team.code, &cfg) {
            Ok(p) => p,
            Err(err) if err.is_not_found() => continue,
            Err(err) => panic!("{}: {err}", team.code),
        };
        assert!((0.0..=1.0).contains(&p), "{} -> {p}", team.code);
        match team.status {
            QualificationStatus::Qualified => assert_eq!(p, 1.0),
            QualificationStatus::Eliminated => assert_eq!(p, 0.0),
            _ => {}
        }
        checked += 1;
    }
    assert!(checked >= 20);
}

#[test]
fn heavier_weights_are_clamped() {
    let reg = mini();
    let cfg = EstimatorConfig {
        points_weight: 5.0,
        ..EstimatorConfig::default()
    };
    let p = qualification_probability(&reg, "GGG", &cfg).unwrap();
    assert_eq!(p, 1.0);
}

#[test]
fn analysis_serializes_with_wire_names() {
    let reg = mini();
    let analysis =
        qualification_analysis(&reg, Some(Confederation::UEFA), &EstimatorConfig::default())
            .unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    let eee = &json["teams"]["EEE"];
    assert_eq!(eee["confederation"], "UEFA");
    assert_eq!(eee["qualification_data"]["matches_played"], 0);
    assert!(json["confederation_stats"]["UEFA"]["avg_points"].is_number());
}

#[test]
fn sample_confederation_stats_cover_qualification_pool_only() {
    let reg = sample_registry().unwrap();

    let uefa = confederation_stats(reg, Confederation::UEFA).unwrap();
    assert_eq!(uefa.team_count, 5);
    assert_eq!(uefa.qualified_teams, 0);
    assert!(approx(uefa.avg_matches, 4.0));
    assert!(approx(uefa.avg_points, 8.2));
    assert!(approx(uefa.avg_goals_for, 7.8));
    assert!(approx(uefa.avg_goals_against, 3.0));

    let conmebol = confederation_stats(reg, Confederation::CONMEBOL).unwrap();
    assert_eq!(conmebol.team_count, 4);
    assert_eq!(conmebol.qualified_teams, 1);
    assert!(approx(conmebol.avg_matches, 8.0));
    assert!(approx(conmebol.avg_points, 14.5));
    assert!(approx(conmebol.avg_goals_for, 12.0));
    assert!(approx(conmebol.avg_goals_against, 7.25));

    // Hosts plus Costa Rica; nobody has a record.
    let concacaf = confederation_stats(reg, Confederation::CONCACAF).unwrap();
    assert_eq!(concacaf.team_count, 4);
    assert_eq!(concacaf.qualified_teams, 3);
    assert_eq!(concacaf.avg_points, 0.0);
}
