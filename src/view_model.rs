use crate::state::{AlgorithmVote, Outcome, PredictionBundle};

const TOP_VOTES: usize = 3;
const HIGH_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Low,
}

impl ConfidenceTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Display-ready projection of a prediction bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub outcome_label: &'static str,
    pub confidence_tier: ConfidenceTier,
    pub top_votes: Vec<AlgorithmVote>,
}

/// Pure and total over validated bundles: outcome tokens and the confidence
/// range were already checked at the boundary, so this never fails.
pub fn present(bundle: &PredictionBundle) -> PredictionView {
    PredictionView {
        outcome_label: bundle.golden.outcome.label(),
        confidence_tier: confidence_tier(bundle.golden.confidence),
        top_votes: bundle.votes.iter().take(TOP_VOTES).cloned().collect(),
    }
}

/// Strict greater-than: exactly 0.8 is still "low".
pub fn confidence_tier(confidence: f64) -> ConfidenceTier {
    if confidence > HIGH_CONFIDENCE {
        ConfidenceTier::High
    } else {
        ConfidenceTier::Low
    }
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

pub fn format_vote(vote: &AlgorithmVote) -> String {
    format!("{}: {}", vote.algorithm, vote.outcome.wire_code())
}
