use std::fs;
use std::path::PathBuf;

use betagent_terminal::analyze_fetch::parse_prediction_json;
use betagent_terminal::error::ApiError;
use betagent_terminal::matches_fetch::parse_matches_json;
use betagent_terminal::state::Outcome;
use betagent_terminal::summary_fetch::parse_summary_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_dashboard_fixture() {
    let raw = read_fixture("dashboard.json");
    let summary = parse_summary_json(&raw).expect("fixture should parse");
    assert_eq!(summary.golden_algorithm.as_deref(), Some("Poisson Distribution"));
    assert_eq!(summary.system_accuracy.as_deref(), Some("61.4%"));
    // Counts arrive as strings or numbers; both decode.
    assert_eq!(summary.data_points, 70);
    assert_eq!(summary.algorithms_tested, 10);
}

#[test]
fn dashboard_absent_fields_stay_placeholder() {
    let summary = parse_summary_json("{}").expect("empty object should parse");
    assert!(summary.golden_algorithm.is_none());
    assert!(summary.system_accuracy.is_none());
    assert_eq!(summary.data_points, 0);
    assert_eq!(summary.algorithms_tested, 0);
}

#[test]
fn dashboard_null_is_default() {
    let summary = parse_summary_json("null").expect("null should parse");
    assert!(summary.golden_algorithm.is_none());
}

#[test]
fn parses_matches_fixture_preserving_order() {
    let raw = read_fixture("matches.json");
    let matches = parse_matches_json(&raw).expect("fixture should parse");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, "match_0");
    assert_eq!(matches[0].home, "Galatasaray");
    assert_eq!(matches[0].league.as_deref(), Some("Super Lig"));
    // Numeric ids are opaque strings once inside.
    assert_eq!(matches[1].id, "42");
    assert!(matches[1].league.is_none());
}

#[test]
fn empty_match_directory_is_valid() {
    assert!(parse_matches_json("[]").expect("empty array").is_empty());
    assert!(parse_matches_json("null").expect("null").is_empty());
}

#[test]
fn partial_match_records_are_rejected() {
    let missing_team = r#"[{"id": "m1", "home_team": "A", "date": "2024-01-01"}]"#;
    assert!(matches!(
        parse_matches_json(missing_team),
        Err(ApiError::MalformedBundle(_))
    ));

    let blank_date = r#"[{"id": "m1", "home_team": "A", "away_team": "B", "date": "  "}]"#;
    assert!(matches!(
        parse_matches_json(blank_date),
        Err(ApiError::MalformedBundle(_))
    ));

    let blank_id = r#"[{"id": "", "home_team": "A", "away_team": "B", "date": "2024-01-01"}]"#;
    assert!(matches!(
        parse_matches_json(blank_id),
        Err(ApiError::MalformedBundle(_))
    ));
}

#[test]
fn parses_analysis_fixture() {
    let raw = read_fixture("analysis.json");
    let bundle = parse_prediction_json(&raw).expect("fixture should parse");
    assert_eq!(bundle.golden.name, "Poisson Distribution");
    assert_eq!(bundle.golden.outcome, Outcome::Home);
    assert!((bundle.golden.confidence - 0.91).abs() < 1e-9);
    assert!(bundle.golden.rationale.starts_with("Poisson probabilities"));

    // Vote order is ranking order, verbatim from the payload.
    assert_eq!(bundle.votes.len(), 4);
    assert_eq!(bundle.votes[0].algorithm, "Monte Carlo Simulation");
    assert_eq!(bundle.votes[1].outcome, Outcome::Draw);
    assert_eq!(bundle.votes[2].outcome, Outcome::Away);
}

#[test]
fn analysis_missing_golden_is_rejected() {
    let raw = r#"{"all_predictions": [{"algorithm": "Elo Rating System", "prediction": "1"}]}"#;
    let err = parse_prediction_json(raw).expect_err("golden vote is required");
    assert!(matches!(err, ApiError::MalformedBundle(_)));
    assert!(err.to_string().contains("golden"));
}

#[test]
fn analysis_unknown_outcome_token_is_rejected() {
    // The outcome code is a closed enumeration; nothing silently becomes a
    // draw.
    let raw = r#"{
        "golden_algorithm": {
            "name": "Elo Rating System",
            "prediction": {"prediction": "3", "confidence": 0.5, "details": ""}
        },
        "all_predictions": []
    }"#;
    assert!(matches!(
        parse_prediction_json(raw),
        Err(ApiError::MalformedBundle(_))
    ));
}

#[test]
fn analysis_confidence_out_of_range_is_rejected() {
    let raw = r#"{
        "golden_algorithm": {
            "name": "Elo Rating System",
            "prediction": {"prediction": "1", "confidence": 1.2, "details": ""}
        },
        "all_predictions": []
    }"#;
    assert!(matches!(
        parse_prediction_json(raw),
        Err(ApiError::MalformedBundle(_))
    ));
}

#[test]
fn outcome_tokens_round_trip() {
    for (token, outcome) in [
        ("1", Outcome::Home),
        ("2", Outcome::Away),
        ("X", Outcome::Draw),
    ] {
        let parsed = Outcome::from_wire(token).expect("defined token");
        assert_eq!(parsed, outcome);
        assert_eq!(parsed.wire_code(), token);
    }
    assert!(Outcome::from_wire("draw").is_err());
    assert!(Outcome::from_wire("").is_err());
}
