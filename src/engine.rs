use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::algorithms::{self, Algorithm};
use crate::feed::HistoricalMatch;
use crate::state::{AlgorithmVote, DashboardSummary, GoldenVote, PredictionBundle, UpcomingMatch};

const HOLDOUT_FRACTION: f64 = 0.2;

/// Holdout performance of one algorithm.
#[derive(Debug, Clone)]
pub struct AlgorithmScore {
    pub name: String,
    pub accuracy: f64,
    pub brier: f64,
    pub samples: usize,
}

/// The ensemble after training and evaluation. `algorithms` and
/// `leaderboard` share ranking order; index 0 is the golden algorithm.
pub struct AnalysisEngine {
    algorithms: Vec<Box<dyn Algorithm>>,
    leaderboard: Vec<AlgorithmScore>,
    data_points: usize,
}

impl AnalysisEngine {
    /// Trains every registered algorithm on the dataset, scores them on the
    /// most recent slice and ranks them by holdout accuracy.
    pub fn train(data: &[HistoricalMatch]) -> Self {
        let mut algorithms = algorithms::roster();
        for algo in &mut algorithms {
            algo.train(data);
        }

        // Dataset is newest-first; hold out the most recent matches.
        let holdout_len = ((data.len() as f64 * HOLDOUT_FRACTION).round() as usize)
            .max(1)
            .min(data.len());
        let holdout = &data[..holdout_len];

        let scores: Vec<AlgorithmScore> = algorithms
            .par_iter()
            .map(|algo| score_algorithm(algo.as_ref(), holdout))
            .collect();

        let mut order: Vec<usize> = (0..algorithms.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .accuracy
                .partial_cmp(&scores[a].accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    scores[a]
                        .brier
                        .partial_cmp(&scores[b].brier)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then(a.cmp(&b))
        });

        let mut slots: Vec<Option<Box<dyn Algorithm>>> =
            algorithms.into_iter().map(Some).collect();
        let mut ranked = Vec::with_capacity(slots.len());
        let mut leaderboard = Vec::with_capacity(slots.len());
        for idx in order {
            if let Some(algo) = slots[idx].take() {
                leaderboard.push(scores[idx].clone());
                ranked.push(algo);
            }
        }

        Self {
            algorithms: ranked,
            leaderboard,
            data_points: data.len(),
        }
    }

    pub fn leaderboard(&self) -> &[AlgorithmScore] {
        &self.leaderboard
    }

    pub fn golden(&self) -> Option<&AlgorithmScore> {
        self.leaderboard.first()
    }

    pub fn data_points(&self) -> usize {
        self.data_points
    }

    /// The aggregate metrics the dashboard endpoint would report.
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            golden_algorithm: self.golden().map(|s| s.name.clone()),
            system_accuracy: self.golden().map(|s| format!("{:.1}%", s.accuracy * 100.0)),
            data_points: self.data_points as u64,
            algorithms_tested: self.algorithms.len() as u64,
        }
    }

    /// Runs the golden algorithm on a fixture and collects every other
    /// algorithm's vote in ranking order, the same bundle shape the HTTP
    /// analyze endpoint returns.
    pub fn analyze(&self, fixture: &UpcomingMatch) -> Result<PredictionBundle> {
        let golden_algo = self
            .algorithms
            .first()
            .context("no algorithms registered")?;
        let prediction = golden_algo.predict(&fixture.home, &fixture.away);

        let votes: Vec<AlgorithmVote> = self.algorithms[1..]
            .iter()
            .map(|algo| AlgorithmVote {
                algorithm: algo.name().to_string(),
                outcome: algo.predict(&fixture.home, &fixture.away).outcome,
            })
            .collect();

        Ok(PredictionBundle {
            golden: GoldenVote {
                name: golden_algo.name().to_string(),
                outcome: prediction.outcome,
                confidence: prediction.confidence.clamp(0.0, 1.0),
                rationale: prediction.details,
            },
            votes,
        })
    }
}

fn score_algorithm(algo: &dyn Algorithm, holdout: &[HistoricalMatch]) -> AlgorithmScore {
    let mut correct = 0usize;
    let mut brier_sum = 0.0;
    let mut total = 0usize;

    for m in holdout {
        let prediction = algo.predict(&m.home, &m.away);
        let hit = prediction.outcome == m.outcome();
        if hit {
            correct += 1;
        }
        let target = if hit { 1.0 } else { 0.0 };
        brier_sum += (prediction.confidence - target).powi(2);
        total += 1;
    }

    AlgorithmScore {
        name: algo.name().to_string(),
        accuracy: if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        },
        brier: if total > 0 { brier_sum / total as f64 } else { 0.0 },
        samples: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Outcome;

    fn one_sided_data(n: usize) -> Vec<HistoricalMatch> {
        (0..n)
            .map(|i| HistoricalMatch {
                date: format!("2024-02-{:02}", (i % 28) + 1),
                home: "Galatasaray".to_string(),
                away: "Konyaspor".to_string(),
                home_goals: 3,
                away_goals: 0,
                home_xg: 2.4,
                away_xg: 0.6,
                possession_home: 62,
                injuries_home: 0,
                injuries_away: 2,
            })
            .collect()
    }

    #[test]
    fn leaderboard_is_sorted_by_accuracy() {
        let engine = AnalysisEngine::train(&one_sided_data(40));
        let board = engine.leaderboard();
        assert!(!board.is_empty());
        for pair in board.windows(2) {
            assert!(pair[0].accuracy >= pair[1].accuracy);
        }
    }

    #[test]
    fn golden_tops_the_board_and_summary_reflects_it() {
        let engine = AnalysisEngine::train(&one_sided_data(40));
        let summary = engine.summary();
        assert_eq!(
            summary.golden_algorithm.as_deref(),
            engine.golden().map(|s| s.name.as_str())
        );
        assert_eq!(summary.data_points, 40);
        assert_eq!(summary.algorithms_tested as usize, engine.leaderboard().len());
    }

    #[test]
    fn bundle_satisfies_the_contract_invariants() {
        let engine = AnalysisEngine::train(&one_sided_data(40));
        let fixture = UpcomingMatch {
            id: "match_0".to_string(),
            home: "Galatasaray".to_string(),
            away: "Konyaspor".to_string(),
            date: "2024-05-19".to_string(),
            league: None,
        };
        let bundle = engine.analyze(&fixture).expect("engine has algorithms");

        assert!((0.0..=1.0).contains(&bundle.golden.confidence));
        assert!(!bundle.golden.name.is_empty());
        // Votes exclude the golden algorithm and follow ranking order.
        assert_eq!(bundle.votes.len(), engine.leaderboard().len() - 1);
        for (vote, score) in bundle.votes.iter().zip(&engine.leaderboard()[1..]) {
            assert_eq!(vote.algorithm, score.name);
        }
    }

    #[test]
    fn one_sided_history_predicts_the_home_side() {
        let engine = AnalysisEngine::train(&one_sided_data(60));
        let fixture = UpcomingMatch {
            id: "m".to_string(),
            home: "Galatasaray".to_string(),
            away: "Konyaspor".to_string(),
            date: "2024-05-19".to_string(),
            league: None,
        };
        let bundle = engine.analyze(&fixture).expect("engine has algorithms");
        assert_eq!(bundle.golden.outcome, Outcome::Home);
    }
}
