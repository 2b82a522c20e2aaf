use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::{AlgorithmVote, GoldenVote, Outcome, PredictionBundle};
use crate::summary_fetch::snippet;

/// Requests a prediction bundle from `GET {base}/api/analyze/{match_id}`.
///
/// Unknown ids are passed through verbatim; whether they resolve is the
/// backend's business. The response is validated into the typed bundle here,
/// so downstream code never sees an absent golden vote, an out-of-range
/// confidence or an unrecognized outcome token.
pub fn fetch_prediction(
    client: &Client,
    base: &str,
    match_id: &str,
) -> Result<PredictionBundle, ApiError> {
    let url = format!("{base}/api/analyze/{match_id}");
    let resp = client.get(&url).send()?;
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            body: snippet(&body),
        });
    }
    parse_prediction_json(&body)
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    golden_algorithm: Option<GoldenRecord>,
    #[serde(default)]
    all_predictions: Vec<VoteRecord>,
}

#[derive(Debug, Deserialize)]
struct GoldenRecord {
    name: String,
    prediction: Option<InnerPrediction>,
}

#[derive(Debug, Deserialize)]
struct InnerPrediction {
    prediction: String,
    confidence: f64,
    #[serde(default)]
    details: String,
}

#[derive(Debug, Deserialize)]
struct VoteRecord {
    algorithm: String,
    prediction: String,
}

pub fn parse_prediction_json(raw: &str) -> Result<PredictionBundle, ApiError> {
    let response: AnalysisResponse = serde_json::from_str(raw.trim())?;

    let golden = response
        .golden_algorithm
        .ok_or_else(|| ApiError::malformed("analysis response is missing golden_algorithm"))?;
    let name = golden.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::malformed("golden algorithm has an empty name"));
    }
    let inner = golden
        .prediction
        .ok_or_else(|| ApiError::malformed("golden algorithm carries no prediction"))?;

    let outcome = Outcome::from_wire(&inner.prediction)?;
    if !(0.0..=1.0).contains(&inner.confidence) || !inner.confidence.is_finite() {
        return Err(ApiError::malformed(format!(
            "confidence {} is outside [0, 1]",
            inner.confidence
        )));
    }

    let mut votes = Vec::with_capacity(response.all_predictions.len());
    for record in response.all_predictions {
        let algorithm = record.algorithm.trim().to_string();
        if algorithm.is_empty() {
            return Err(ApiError::malformed("vote with empty algorithm name"));
        }
        votes.push(AlgorithmVote {
            algorithm,
            outcome: Outcome::from_wire(&record.prediction)?,
        });
    }

    Ok(PredictionBundle {
        golden: GoldenVote {
            name,
            outcome,
            confidence: inner.confidence,
            rationale: inner.details.trim().to_string(),
        },
        votes,
    })
}
