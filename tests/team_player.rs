use std::fs;
use std::path::PathBuf;

use wc26_analytics::error::AnalyticsError;
use wc26_analytics::metrics;
use wc26_analytics::player_analysis::{
    PlayerMetric, player_analysis, player_comparison, top_scorers, top_scorers_by_confederation,
};
use wc26_analytics::registry::{Confederation, Registry, sample_registry};
use wc26_analytics::team_analysis::{
    head_to_head, predict_group_standings, result_counts, team_analysis,
};

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

#[test]
fn shootout_winner_counts_as_a_win() {
    let reg = sample_registry().unwrap();
    assert_eq!(metrics::win_percentage(reg, "ARG"), 100.0);
    let fra = metrics::win_percentage(reg, "FRA");
    assert!((fra - 200.0 / 3.0).abs() < 1e-9, "got {fra}");
    // No recorded matches.
    assert_eq!(metrics::win_percentage(reg, "NZL"), 0.0);
}

#[test]
fn head_to_head_counts_both_sides() {
    let reg = sample_registry().unwrap();
    let h2h = head_to_head(reg, "ARG", "BRA").unwrap();
    assert_eq!(h2h.total_matches, 2);
    assert_eq!(h2h.team1_wins, 2);
    assert_eq!(h2h.team2_wins, 0);
    assert_eq!(h2h.draws, 0);

    let mini = mini();
    let h2h = head_to_head(&mini, "AAA", "CCC").unwrap();
    assert_eq!(h2h.total_matches, 1);
    assert_eq!(h2h.team2_wins, 1);

    let none = head_to_head(&mini, "AAA", "EEE").unwrap();
    assert_eq!(none.total_matches, 0);
    assert!(none.matches.is_empty());

    assert!(matches!(
        head_to_head(&mini, "AAA", "AAA"),
        Err(AnalyticsError::InvalidInput(_))
    ));
    assert!(head_to_head(&mini, "AAA", "ZZZ").unwrap_err().is_not_found());
}

#[test]
fn result_counts_split_wins_draws_losses() {
    let reg = mini();
    let bbb = result_counts(&reg, "BBB").unwrap();
    assert_eq!((bbb.wins, bbb.draws, bbb.losses), (0, 1, 1));
    let ccc = result_counts(&reg, "CCC").unwrap();
    assert_eq!((ccc.wins, ccc.draws, ccc.losses), (1, 1, 0));
}

#[test]
fn group_standings_order_by_score() {
    let reg = sample_registry().unwrap();
    let standings = predict_group_standings(reg, &["NZL", "MEX", "JPN", "ARG"]).unwrap();
    let order: Vec<&str> = standings.iter().map(|s| s.team.as_str()).collect();
    assert_eq!(order, ["ARG", "JPN", "MEX", "NZL"]);
    assert!((standings[0].score - 1.0).abs() < 1e-9);
    assert!((standings[1].score - (0.7 / 20.0 + 0.15)).abs() < 1e-9);
}

#[test]
fn group_must_have_four_known_teams() {
    let reg = sample_registry().unwrap();
    assert!(matches!(
        predict_group_standings(reg, &["ARG", "BRA", "FRA"]),
        Err(AnalyticsError::InvalidInput(_))
    ));
    assert!(matches!(
        predict_group_standings(reg, &["ARG", "BRA", "FRA", "ENG", "ESP"]),
        Err(AnalyticsError::InvalidInput(_))
    ));
    assert!(
        predict_group_standings(reg, &["ARG", "BRA", "FRA", "XXX"])
            .unwrap_err()
            .is_not_found()
    );
}

#[test]
fn team_report_lists_all_matches() {
    let reg = sample_registry().unwrap();
    let report = team_analysis(reg, "ARG").unwrap();
    assert_eq!(report.team_name, "Argentina");
    assert!(report.qualified);
    assert_eq!(report.matches_analyzed, 3);
    assert_eq!(report.confederation, Confederation::CONMEBOL);
    assert!(team_analysis(reg, "XXX").unwrap_err().is_not_found());
}

#[test]
fn top_scorers_are_ranked_by_career_goals() {
    let reg = sample_registry().unwrap();
    let names: Vec<&str> = top_scorers(reg, 3).iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Cristiano Ronaldo", "Lionel Messi", "Harry Kane"]);

    let concacaf = top_scorers_by_confederation(reg, Confederation::CONCACAF, 3);
    let ids: Vec<&str> = concacaf.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["P005", "P006", "P004"]);

    assert!(top_scorers(reg, 0).is_empty());
    assert_eq!(top_scorers(reg, 100).len(), reg.players().len());
}

#[test]
fn per_match_rates_use_events_over_caps() {
    let reg = sample_registry().unwrap();
    let goals = metrics::player_goals_per_match(reg, "P001").unwrap();
    let assists = metrics::player_assists_per_match(reg, "P001").unwrap();
    assert!((goals - 1.0 / 180.0).abs() < 1e-12);
    assert!((assists - 1.0 / 180.0).abs() < 1e-12);

    let mini = mini();
    assert_eq!(metrics::player_goals_per_match(&mini, "Q2").unwrap(), 0.0);
    assert!(metrics::player_goals_per_match(&mini, "Q9").unwrap_err().is_not_found());
}

#[test]
fn comparison_skips_unknown_players() {
    let reg = sample_registry().unwrap();
    let rows = player_comparison(reg, &["P001", "NOPE", "P003"], &[]).unwrap();
    assert_eq!(rows.len(), 2);
    let messi = &rows["P001"];
    assert_eq!(messi.metrics.len(), 3);
    assert_eq!(messi.metrics[&PlayerMetric::Goals], 106.0);
    assert_eq!(messi.metrics[&PlayerMetric::Caps], 180.0);

    let rows = player_comparison(reg, &["P003"], &[PlayerMetric::Age]).unwrap();
    assert_eq!(rows["P003"].metrics.keys().copied().collect::<Vec<_>>(), [PlayerMetric::Age]);
}

#[test]
fn metric_names_parse() {
    assert_eq!(PlayerMetric::parse("Goals_Per_Match"), Some(PlayerMetric::GoalsPerMatch));
    assert_eq!(PlayerMetric::parse("xg"), None);
}

#[test]
fn player_report_includes_events_and_team_name() {
    let reg = sample_registry().unwrap();
    let report = player_analysis(reg, "P001").unwrap();
    assert_eq!(report.team_name.as_deref(), Some("Argentina"));
    assert_eq!(report.events.len(), 2);
    assert_eq!(report.goals, 106);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["events"][1]["kind"], "assist");
}
