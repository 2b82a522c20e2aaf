use anyhow::Result;

use betagent_terminal::engine::AnalysisEngine;
use betagent_terminal::feed;
use betagent_terminal::history_store;
use betagent_terminal::view_model;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut rng = feed::rng_from_env();
    let weeks = feed::history_weeks_from_env();

    let data = match history_store::default_db_path() {
        Some(path) => {
            let conn = history_store::open_db(&path)?;
            let stored = history_store::load_all(&conn)?;
            if stored.is_empty() {
                println!("history db empty, generating {weeks} weeks of matches");
                feed::generate_historical(&mut rng, weeks)
            } else {
                println!("loaded {} matches from {}", stored.len(), path.display());
                stored
            }
        }
        None => feed::generate_historical(&mut rng, weeks),
    };

    let engine = AnalysisEngine::train(&data);

    println!();
    println!("{:<4} {:<24} {:>9} {:>8} {:>8}", "Rank", "Algorithm", "Accuracy", "Brier", "Samples");
    for (rank, score) in engine.leaderboard().iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>8.1}% {:>8.3} {:>8}",
            rank + 1,
            score.name,
            score.accuracy * 100.0,
            score.brier,
            score.samples
        );
    }

    if let Some(golden) = engine.golden() {
        println!();
        println!(
            "golden algorithm: {} ({:.1}% accuracy)",
            golden.name,
            golden.accuracy * 100.0
        );
    }

    // One sample bundle so a dry run shows the full contract end to end.
    if let Some(fixture) = feed::generate_upcoming(&mut rng, 1).into_iter().next() {
        let bundle = engine.analyze(&fixture)?;
        let view = view_model::present(&bundle);
        println!();
        println!(
            "{} vs {} ({}): {} at {} [{}]",
            fixture.home,
            fixture.away,
            fixture.date,
            view.outcome_label,
            view_model::format_confidence(bundle.golden.confidence),
            view.confidence_tier.label()
        );
        for vote in &view.top_votes {
            println!("  {}", view_model::format_vote(vote));
        }
    }

    Ok(())
}
