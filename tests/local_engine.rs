use rand::SeedableRng;
use rand::rngs::StdRng;

use betagent_terminal::engine::AnalysisEngine;
use betagent_terminal::feed;
use betagent_terminal::view_model;

#[test]
fn local_engine_serves_the_same_contract_as_the_wire() {
    let mut rng = StdRng::seed_from_u64(2024);
    let history = feed::generate_historical(&mut rng, 10);
    let engine = AnalysisEngine::train(&history);

    let summary = engine.summary();
    assert_eq!(summary.data_points as usize, history.len());
    assert!(summary.golden_algorithm.is_some());
    assert!(summary.system_accuracy.is_some());
    assert_eq!(
        summary.algorithms_tested as usize,
        engine.leaderboard().len()
    );

    for fixture in feed::generate_upcoming(&mut rng, 5) {
        let bundle = engine.analyze(&fixture).expect("roster is non-empty");
        assert!((0.0..=1.0).contains(&bundle.golden.confidence));
        assert!(!bundle.golden.rationale.is_empty());

        // `present` is total over engine bundles; no vote names the golden.
        let view = view_model::present(&bundle);
        assert!(["HOME WIN", "AWAY WIN", "DRAW"].contains(&view.outcome_label));
        assert_eq!(view.top_votes.len(), 3.min(bundle.votes.len()));
        assert!(bundle.votes.iter().all(|v| v.algorithm != bundle.golden.name));
    }
}

#[test]
fn retraining_on_the_same_seed_selects_the_same_golden() {
    let build = || {
        let mut rng = StdRng::seed_from_u64(99);
        AnalysisEngine::train(&feed::generate_historical(&mut rng, 8))
    };
    let a = build();
    let b = build();
    assert_eq!(
        a.golden().map(|s| s.name.clone()),
        b.golden().map(|s| s.name.clone())
    );
}
