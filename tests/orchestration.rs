use betagent_terminal::analyze_fetch::parse_prediction_json;
use betagent_terminal::provider::auto_analyze_target;
use betagent_terminal::state::{
    AlgorithmVote, AppState, DashboardSummary, Delta, GoldenVote, Outcome, PredictionBundle,
    UpcomingMatch, apply_delta,
};
use betagent_terminal::view_model::{self, ConfidenceTier};

fn fixture(id: &str, home: &str, away: &str) -> UpcomingMatch {
    UpcomingMatch {
        id: id.to_string(),
        home: home.to_string(),
        away: away.to_string(),
        date: "2024-01-01".to_string(),
        league: None,
    }
}

fn bundle(name: &str, outcome: Outcome, confidence: f64, vote_count: usize) -> PredictionBundle {
    PredictionBundle {
        golden: GoldenVote {
            name: name.to_string(),
            outcome,
            confidence,
            rationale: "because".to_string(),
        },
        votes: (0..vote_count)
            .map(|i| AlgorithmVote {
                algorithm: format!("Algo {i}"),
                outcome: Outcome::Home,
            })
            .collect(),
    }
}

#[test]
fn set_matches_preserves_backend_order() {
    let mut state = AppState::new();
    let matches = vec![fixture("m3", "C", "D"), fixture("m1", "A", "B")];
    apply_delta(&mut state, Delta::SetMatches(matches.clone()));
    assert_eq!(state.matches, matches);
}

#[test]
fn set_matches_clamps_a_stale_selection() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetMatches(vec![
            fixture("m1", "A", "B"),
            fixture("m2", "C", "D"),
            fixture("m3", "E", "F"),
        ]),
    );
    state.selected = 2;
    apply_delta(&mut state, Delta::SetMatches(vec![fixture("m1", "A", "B")]));
    assert_eq!(state.selected, 0);
}

#[test]
fn analysis_started_marks_the_match_in_flight() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::AnalysisStarted { id: "m1".to_string() });
    assert!(state.is_in_flight("m1"));
    assert!(!state.is_in_flight("m2"));
}

#[test]
fn in_flight_entries_are_independent_per_match() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::AnalysisStarted { id: "m1".to_string() });
    apply_delta(&mut state, Delta::AnalysisStarted { id: "m2".to_string() });

    apply_delta(
        &mut state,
        Delta::SetPrediction {
            id: "m1".to_string(),
            bundle: bundle("Elo Rating System", Outcome::Home, 0.7, 2),
        },
    );
    // m1 resolved; m2 is still outstanding.
    assert!(!state.is_in_flight("m1"));
    assert!(state.is_in_flight("m2"));
}

#[test]
fn reanalysis_overwrites_the_store_entry_wholesale() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            id: "m1".to_string(),
            bundle: bundle("Elo Rating System", Outcome::Away, 0.6, 5),
        },
    );
    let replacement = bundle("Poisson Distribution", Outcome::Home, 0.9, 1);
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            id: "m1".to_string(),
            bundle: replacement.clone(),
        },
    );

    let stored = state.prediction_for("m1").expect("entry exists");
    assert_eq!(*stored, replacement);
    assert_eq!(stored.votes.len(), 1);
    assert_eq!(state.predictions.len(), 1);
}

#[test]
fn failed_analysis_leaves_the_store_untouched_and_releases_in_flight() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::AnalysisStarted { id: "m2".to_string() });
    apply_delta(&mut state, Delta::AnalysisFailed { id: "m2".to_string() });

    assert!(state.prediction_for("m2").is_none());
    assert!(!state.is_in_flight("m2"));
}

#[test]
fn failed_reanalysis_keeps_the_previous_bundle() {
    let mut state = AppState::new();
    let original = bundle("Elo Rating System", Outcome::Draw, 0.55, 3);
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            id: "m1".to_string(),
            bundle: original.clone(),
        },
    );
    apply_delta(&mut state, Delta::AnalysisStarted { id: "m1".to_string() });
    apply_delta(&mut state, Delta::AnalysisFailed { id: "m1".to_string() });

    assert_eq!(state.prediction_for("m1"), Some(&original));
    assert!(!state.is_in_flight("m1"));
}

#[test]
fn summary_is_replaced_wholesale() {
    let mut state = AppState::new();
    assert!(!state.summary_loaded);

    apply_delta(
        &mut state,
        Delta::SetSummary(DashboardSummary {
            golden_algorithm: Some("Elo Rating System".to_string()),
            system_accuracy: Some("58.0%".to_string()),
            data_points: 70,
            algorithms_tested: 10,
        }),
    );
    assert!(state.summary_loaded);

    apply_delta(&mut state, Delta::SetSummary(DashboardSummary::default()));
    assert!(state.summary.golden_algorithm.is_none());
    assert_eq!(state.summary.data_points, 0);
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new();
    for i in 0..300 {
        apply_delta(&mut state, Delta::Log(format!("line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 100"));
}

#[test]
fn empty_directory_never_auto_triggers() {
    assert_eq!(auto_analyze_target(&[], false), None);
    assert_eq!(auto_analyze_target(&[], true), None);
}

#[test]
fn auto_trigger_fires_for_the_first_entry_at_most_once() {
    let matches = vec![fixture("m1", "A", "B"), fixture("m2", "C", "D")];
    assert_eq!(auto_analyze_target(&matches, false), Some("m1"));
    // Once triggered, later directory refreshes stay quiet.
    assert_eq!(auto_analyze_target(&matches, true), None);
}

#[test]
fn analyze_resolution_flows_through_to_the_view() {
    // Directory returns one match; its analysis resolves with confidence
    // 0.91 and outcome code "1".
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetMatches(vec![fixture("m1", "A", "B")]),
    );

    let raw = r#"{
        "golden_algorithm": {
            "name": "Poisson Distribution",
            "prediction": {"prediction": "1", "confidence": 0.91, "details": "strong home rates"}
        },
        "all_predictions": [
            {"algorithm": "Monte Carlo Simulation", "prediction": "1"},
            {"algorithm": "Elo Rating System", "prediction": "X"}
        ]
    }"#;
    let parsed = parse_prediction_json(raw).expect("valid payload");

    apply_delta(&mut state, Delta::AnalysisStarted { id: "m1".to_string() });
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            id: "m1".to_string(),
            bundle: parsed,
        },
    );

    let stored = state.prediction_for("m1").expect("entry exists");
    let view = view_model::present(stored);
    assert_eq!(view.outcome_label, "HOME WIN");
    assert_eq!(view.confidence_tier, ConfidenceTier::High);
    assert_eq!(view.top_votes.len(), 2);
    assert!(!state.is_in_flight("m1"));
}
