use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Predicted match result. Parsed from the wire tokens `"1"` (home win),
/// `"2"` (away win) and `"X"` (draw); anything else is rejected at the
/// boundary rather than coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl Outcome {
    pub fn from_wire(token: &str) -> Result<Self, ApiError> {
        match token.trim() {
            "1" => Ok(Self::Home),
            "2" => Ok(Self::Away),
            "X" => Ok(Self::Draw),
            other => Err(ApiError::malformed(format!(
                "unknown outcome token {other:?}"
            ))),
        }
    }

    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Home => "1",
            Self::Away => "2",
            Self::Draw => "X",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "HOME WIN",
            Self::Away => "AWAY WIN",
            Self::Draw => "DRAW",
        }
    }
}

/// A fixture from the match directory. Immutable once fetched; the directory
/// client rejects records missing any of these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingMatch {
    pub id: String,
    pub home: String,
    pub away: String,
    pub date: String,
    pub league: Option<String>,
}

/// Aggregate system metrics shown in the header tiles. Replaced wholesale on
/// refetch; `golden_algorithm` and `system_accuracy` stay `None` until the
/// backend finishes initializing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub golden_algorithm: Option<String>,
    pub system_accuracy: Option<String>,
    pub data_points: u64,
    pub algorithms_tested: u64,
}

/// The primary prediction: the vote of the currently best-performing
/// algorithm, with its certainty and free-text rationale.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldenVote {
    pub name: String,
    pub outcome: Outcome,
    pub confidence: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmVote {
    pub algorithm: String,
    pub outcome: Outcome,
}

/// Full per-match analysis result: the golden vote plus every other
/// algorithm's vote in ranking order. Created once per analysis call and
/// overwritten wholesale on re-analysis, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionBundle {
    pub golden: GoldenVote,
    pub votes: Vec<AlgorithmVote>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub summary: DashboardSummary,
    pub summary_loaded: bool,
    pub matches: Vec<UpcomingMatch>,
    pub predictions: HashMap<String, PredictionBundle>,
    pub in_flight: HashSet<String>,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            summary: DashboardSummary::default(),
            summary_loaded: false,
            matches: Vec::with_capacity(16),
            predictions: HashMap::with_capacity(16),
            in_flight: HashSet::new(),
            selected: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn selected_match(&self) -> Option<&UpcomingMatch> {
        self.matches.get(self.selected)
    }

    pub fn selected_match_id(&self) -> Option<String> {
        self.selected_match().map(|m| m.id.clone())
    }

    pub fn prediction_for(&self, id: &str) -> Option<&PredictionBundle> {
        self.predictions.get(id)
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    pub fn select_next(&mut self) {
        let total = self.matches.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.matches.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.matches.len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// State updates emitted by the provider thread. Applied one at a time on the
/// UI loop, so each is atomic with respect to rendering; the provider is the
/// only writer of `predictions` and `in_flight`.
#[derive(Debug, Clone)]
pub enum Delta {
    SetSummary(DashboardSummary),
    SetMatches(Vec<UpcomingMatch>),
    AnalysisStarted { id: String },
    SetPrediction { id: String, bundle: PredictionBundle },
    AnalysisFailed { id: String },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Analyze { match_id: String },
    RefreshSummary,
    RefreshMatches,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetSummary(summary) => {
            state.summary = summary;
            state.summary_loaded = true;
        }
        Delta::SetMatches(matches) => {
            // Backend order is display order.
            state.matches = matches;
            state.clamp_selection();
        }
        Delta::AnalysisStarted { id } => {
            state.in_flight.insert(id);
        }
        Delta::SetPrediction { id, bundle } => {
            state.in_flight.remove(&id);
            state.predictions.insert(id, bundle);
        }
        Delta::AnalysisFailed { id } => {
            // Failure never touches an existing store entry.
            state.in_flight.remove(&id);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
