use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::feed::HistoricalMatch;
use crate::state::Outcome;

const DRAW_BASE: f64 = 0.28;
const MONTE_CARLO_RUNS: usize = 1000;
const FORM_WINDOW: usize = 5;

/// One algorithm's verdict on a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub outcome: Outcome,
    pub confidence: f64,
    pub details: String,
}

pub trait Algorithm: Send + Sync {
    fn name(&self) -> &str;
    fn train(&mut self, _data: &[HistoricalMatch]) {}
    fn predict(&self, home: &str, away: &str) -> Prediction;
}

/// The full ensemble, in registration order. Ranking order is decided later
/// by evaluation.
pub fn roster() -> Vec<Box<dyn Algorithm>> {
    vec![
        Box::new(PoissonModel::new()),
        Box::new(MonteCarloModel::new()),
        Box::new(EloModel::new()),
        Box::new(FormModel::new()),
        Box::new(GoalAverageModel::new()),
        Box::new(HeadToHeadModel::new()),
        Box::new(HomeAdvantageModel::new()),
        Box::new(PossessionModel::new()),
        Box::new(InjuryImpactModel::new()),
        Box::new(XgTrendModel::new()),
    ]
}

#[derive(Debug, Clone, Copy)]
struct Probs {
    home: f64,
    draw: f64,
    away: f64,
}

impl Probs {
    fn normalized(self) -> Self {
        let sum = (self.home + self.draw + self.away).max(f64::EPSILON);
        Self {
            home: self.home / sum,
            draw: self.draw / sum,
            away: self.away / sum,
        }
    }

    fn pick(self) -> (Outcome, f64) {
        let p = self.normalized();
        if p.home >= p.draw && p.home >= p.away {
            (Outcome::Home, p.home)
        } else if p.away >= p.draw {
            (Outcome::Away, p.away)
        } else {
            (Outcome::Draw, p.draw)
        }
    }
}

/// Goal-difference edge mapped to outcome probabilities. The draw share
/// shrinks as the edge grows; logistic split of the remainder.
fn probs_from_edge(edge: f64) -> Probs {
    let favorite = 1.0 / (1.0 + (-edge).exp());
    let draw = (DRAW_BASE * (1.0 - 0.5 * edge.abs().min(1.4) / 1.4)).max(0.08);
    let rest = 1.0 - draw;
    Probs {
        home: favorite * rest,
        draw,
        away: (1.0 - favorite) * rest,
    }
}

fn poisson_pmf(lambda: f64, max_k: usize) -> Vec<f64> {
    let mut out = vec![0.0; max_k + 1];
    let lambda = lambda.max(0.0);

    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }

    let sum: f64 = out.iter().sum();
    if sum < 1.0 {
        out[max_k] += 1.0 - sum;
    }
    out
}

fn outcome_probs_poisson(lambda_home: f64, lambda_away: f64, max_goals: usize) -> Probs {
    let pmf_h = poisson_pmf(lambda_home, max_goals);
    let pmf_a = poisson_pmf(lambda_away, max_goals);

    let mut probs = Probs {
        home: 0.0,
        draw: 0.0,
        away: 0.0,
    };
    for (i, p_i) in pmf_h.iter().enumerate() {
        for (j, p_j) in pmf_a.iter().enumerate() {
            let p = p_i * p_j;
            if i > j {
                probs.home += p;
            } else if i < j {
                probs.away += p;
            } else {
                probs.draw += p;
            }
        }
    }
    probs.normalized()
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

// ---------------------------------------------------------------------------
// Poisson Distribution

pub struct PoissonModel {
    avg_home_scored: f64,
    avg_away_scored: f64,
    home_strength: HashMap<String, f64>,
    away_strength: HashMap<String, f64>,
}

impl PoissonModel {
    pub fn new() -> Self {
        Self {
            avg_home_scored: 1.4,
            avg_away_scored: 1.1,
            home_strength: HashMap::new(),
            away_strength: HashMap::new(),
        }
    }
}

impl Default for PoissonModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for PoissonModel {
    fn name(&self) -> &str {
        "Poisson Distribution"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        if data.is_empty() {
            return;
        }

        let n = data.len() as f64;
        self.avg_home_scored = data.iter().map(|m| m.home_goals as f64).sum::<f64>() / n;
        self.avg_away_scored = data.iter().map(|m| m.away_goals as f64).sum::<f64>() / n;

        let mut home_sums: HashMap<&str, (f64, usize)> = HashMap::new();
        let mut away_sums: HashMap<&str, (f64, usize)> = HashMap::new();
        for m in data {
            let h = home_sums.entry(m.home.as_str()).or_insert((0.0, 0));
            h.0 += m.home_goals as f64;
            h.1 += 1;
            let a = away_sums.entry(m.away.as_str()).or_insert((0.0, 0));
            a.0 += m.away_goals as f64;
            a.1 += 1;
        }

        self.home_strength = home_sums
            .into_iter()
            .map(|(team, (goals, count))| {
                let rate = goals / count as f64;
                (team.to_string(), rate / self.avg_home_scored.max(0.1))
            })
            .collect();
        self.away_strength = away_sums
            .into_iter()
            .map(|(team, (goals, count))| {
                let rate = goals / count as f64;
                (team.to_string(), rate / self.avg_away_scored.max(0.1))
            })
            .collect();
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let hs = self.home_strength.get(home).copied().unwrap_or(1.0);
        let aw = self.away_strength.get(away).copied().unwrap_or(1.0);

        let lambda_home = clamp(hs * self.avg_home_scored, 0.2, 3.8);
        let lambda_away = clamp(aw * self.avg_away_scored, 0.2, 3.8);

        let probs = outcome_probs_poisson(lambda_home, lambda_away, 6);
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!(
                "Poisson probabilities: 1({:.2}) X({:.2}) 2({:.2})",
                probs.home, probs.draw, probs.away
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Monte Carlo Simulation

pub struct MonteCarloModel {
    lambda_home: f64,
    lambda_away: f64,
}

impl MonteCarloModel {
    pub fn new() -> Self {
        Self {
            lambda_home: 1.4,
            lambda_away: 1.1,
        }
    }
}

impl Default for MonteCarloModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for MonteCarloModel {
    fn name(&self) -> &str {
        "Monte Carlo Simulation"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        if data.is_empty() {
            return;
        }
        let n = data.len() as f64;
        self.lambda_home = data.iter().map(|m| m.home_goals as f64).sum::<f64>() / n;
        self.lambda_away = data.iter().map(|m| m.away_goals as f64).sum::<f64>() / n;
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        // Seed from the pairing so repeated calls agree on the same fixture.
        let mut hasher = DefaultHasher::new();
        home.hash(&mut hasher);
        away.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());

        let mut wins = [0usize; 3];
        for _ in 0..MONTE_CARLO_RUNS {
            let h = sample_poisson(&mut rng, self.lambda_home);
            let a = sample_poisson(&mut rng, self.lambda_away);
            if h > a {
                wins[0] += 1;
            } else if h == a {
                wins[1] += 1;
            } else {
                wins[2] += 1;
            }
        }

        let probs = Probs {
            home: wins[0] as f64 / MONTE_CARLO_RUNS as f64,
            draw: wins[1] as f64 / MONTE_CARLO_RUNS as f64,
            away: wins[2] as f64 / MONTE_CARLO_RUNS as f64,
        };
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!(
                "Simulated {MONTE_CARLO_RUNS} matches. Win rate: {:.1}%",
                confidence * 100.0
            ),
        }
    }
}

fn sample_poisson(rng: &mut impl Rng, lambda: f64) -> u8 {
    let limit = (-lambda.max(0.05)).exp();
    let mut k = 0u32;
    let mut p = 1.0;
    loop {
        k += 1;
        p *= rng.gen_range(0.0..1.0);
        if p <= limit {
            break;
        }
    }
    (k - 1).min(9) as u8
}

// ---------------------------------------------------------------------------
// Elo Rating System

pub struct EloModel {
    ratings: HashMap<String, f64>,
    k: f64,
    home_adv_pts: f64,
}

impl EloModel {
    pub fn new() -> Self {
        Self {
            ratings: HashMap::new(),
            k: 20.0,
            home_adv_pts: 60.0,
        }
    }

    fn rating(&self, team: &str) -> f64 {
        self.ratings.get(team).copied().unwrap_or(1500.0)
    }
}

impl Default for EloModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for EloModel {
    fn name(&self) -> &str {
        "Elo Rating System"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        let mut ordered: Vec<&HistoricalMatch> = data.iter().collect();
        // ISO dates, so string order is chronological order.
        ordered.sort_by(|a, b| a.date.cmp(&b.date));

        self.ratings.clear();
        for m in ordered {
            let eh = self.rating(&m.home);
            let ea = self.rating(&m.away);

            let expected_home = expected_score(eh + self.home_adv_pts, ea);
            let s_home = match m.outcome() {
                Outcome::Home => 1.0,
                Outcome::Draw => 0.5,
                Outcome::Away => 0.0,
            };

            let delta = self.k * (s_home - expected_home);
            self.ratings.insert(m.home.clone(), eh + delta);
            self.ratings.insert(m.away.clone(), ea - delta);
        }
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let rh = self.rating(home);
        let ra = self.rating(away);
        let expected = expected_score(rh + self.home_adv_pts, ra);

        // Draws are likeliest when the sides are even.
        let draw = clamp(0.30 - 0.22 * (2.0 * expected - 1.0).abs(), 0.10, 0.30);
        let probs = Probs {
            home: expected * (1.0 - draw),
            draw,
            away: (1.0 - expected) * (1.0 - draw),
        };
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!("Elo ratings {:.0} vs {:.0} (home advantage applied)", rh, ra),
        }
    }
}

fn expected_score(r_a: f64, r_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf(-(r_a - r_b) / 400.0))
}

// ---------------------------------------------------------------------------
// Form Analysis

pub struct FormModel {
    points_per_match: HashMap<String, f64>,
}

impl FormModel {
    pub fn new() -> Self {
        Self {
            points_per_match: HashMap::new(),
        }
    }

    fn form(&self, team: &str) -> f64 {
        self.points_per_match.get(team).copied().unwrap_or(1.3)
    }
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for FormModel {
    fn name(&self) -> &str {
        "Form Analysis"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        // Dataset is newest-first, so the first hits per team are its most
        // recent outings.
        let mut points: HashMap<&str, Vec<f64>> = HashMap::new();
        for m in data {
            let (home_pts, away_pts) = match m.outcome() {
                Outcome::Home => (3.0, 0.0),
                Outcome::Draw => (1.0, 1.0),
                Outcome::Away => (0.0, 3.0),
            };
            let h = points.entry(m.home.as_str()).or_default();
            if h.len() < FORM_WINDOW {
                h.push(home_pts);
            }
            let a = points.entry(m.away.as_str()).or_default();
            if a.len() < FORM_WINDOW {
                a.push(away_pts);
            }
        }

        self.points_per_match = points
            .into_iter()
            .filter(|(_, pts)| !pts.is_empty())
            .map(|(team, pts)| {
                let avg = pts.iter().sum::<f64>() / pts.len() as f64;
                (team.to_string(), avg)
            })
            .collect();
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let fh = self.form(home);
        let fa = self.form(away);
        let edge = 0.6 * (fh - fa) + 0.25;
        let probs = probs_from_edge(edge);
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!(
                "Last {FORM_WINDOW}: {home} {fh:.2} ppg vs {away} {fa:.2} ppg"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Goal Averages

pub struct GoalAverageModel {
    net_goals: HashMap<String, f64>,
}

impl GoalAverageModel {
    pub fn new() -> Self {
        Self {
            net_goals: HashMap::new(),
        }
    }
}

impl Default for GoalAverageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for GoalAverageModel {
    fn name(&self) -> &str {
        "Goal Averages"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
        for m in data {
            let diff = m.home_goals as f64 - m.away_goals as f64;
            let h = totals.entry(m.home.as_str()).or_insert((0.0, 0));
            h.0 += diff;
            h.1 += 1;
            let a = totals.entry(m.away.as_str()).or_insert((0.0, 0));
            a.0 -= diff;
            a.1 += 1;
        }

        self.net_goals = totals
            .into_iter()
            .map(|(team, (sum, count))| (team.to_string(), sum / count.max(1) as f64))
            .collect();
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let nh = self.net_goals.get(home).copied().unwrap_or(0.0);
        let na = self.net_goals.get(away).copied().unwrap_or(0.0);
        let edge = 0.8 * (nh - na) + 0.2;
        let probs = probs_from_edge(edge);
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!("Net goals per match: {nh:+.2} vs {na:+.2}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Head-to-Head

pub struct HeadToHeadModel {
    meetings: HashMap<(String, String), [usize; 3]>,
}

impl HeadToHeadModel {
    pub fn new() -> Self {
        Self {
            meetings: HashMap::new(),
        }
    }
}

impl Default for HeadToHeadModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for HeadToHeadModel {
    fn name(&self) -> &str {
        "Head-to-Head"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        self.meetings.clear();
        for m in data {
            let key = (m.home.clone(), m.away.clone());
            let entry = self.meetings.entry(key).or_insert([0; 3]);
            match m.outcome() {
                Outcome::Home => entry[0] += 1,
                Outcome::Draw => entry[1] += 1,
                Outcome::Away => entry[2] += 1,
            }
        }
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let counts = self
            .meetings
            .get(&(home.to_string(), away.to_string()))
            .copied()
            .unwrap_or([0; 3]);
        let total = counts.iter().sum::<usize>();

        // Laplace smoothing; with no prior meetings this degrades to a mild
        // home lean.
        let probs = Probs {
            home: (counts[0] as f64 + 1.4) / (total as f64 + 3.5),
            draw: (counts[1] as f64 + 1.0) / (total as f64 + 3.5),
            away: (counts[2] as f64 + 1.1) / (total as f64 + 3.5),
        };
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!("Direct meetings H/D/A: {}/{}/{}", counts[0], counts[1], counts[2]),
        }
    }
}

// ---------------------------------------------------------------------------
// Home Advantage

pub struct HomeAdvantageModel {
    rates: Probs,
}

impl HomeAdvantageModel {
    pub fn new() -> Self {
        Self {
            rates: Probs {
                home: 0.45,
                draw: 0.27,
                away: 0.28,
            },
        }
    }
}

impl Default for HomeAdvantageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for HomeAdvantageModel {
    fn name(&self) -> &str {
        "Home Advantage"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        if data.is_empty() {
            return;
        }
        let n = data.len() as f64;
        let mut counts = [0usize; 3];
        for m in data {
            match m.outcome() {
                Outcome::Home => counts[0] += 1,
                Outcome::Draw => counts[1] += 1,
                Outcome::Away => counts[2] += 1,
            }
        }
        self.rates = Probs {
            home: counts[0] as f64 / n,
            draw: counts[1] as f64 / n,
            away: counts[2] as f64 / n,
        };
    }

    fn predict(&self, _home: &str, _away: &str) -> Prediction {
        let (outcome, confidence) = self.rates.pick();
        Prediction {
            outcome,
            confidence,
            details: format!(
                "League base rates: 1({:.2}) X({:.2}) 2({:.2})",
                self.rates.home, self.rates.draw, self.rates.away
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Possession Index

pub struct PossessionModel {
    possession: HashMap<String, f64>,
}

impl PossessionModel {
    pub fn new() -> Self {
        Self {
            possession: HashMap::new(),
        }
    }
}

impl Default for PossessionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for PossessionModel {
    fn name(&self) -> &str {
        "Possession Index"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
        for m in data {
            let h = totals.entry(m.home.as_str()).or_insert((0.0, 0));
            h.0 += m.possession_home as f64;
            h.1 += 1;
            let a = totals.entry(m.away.as_str()).or_insert((0.0, 0));
            a.0 += 100.0 - m.possession_home as f64;
            a.1 += 1;
        }
        self.possession = totals
            .into_iter()
            .map(|(team, (sum, count))| (team.to_string(), sum / count.max(1) as f64))
            .collect();
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let ph = self.possession.get(home).copied().unwrap_or(50.0);
        let pa = self.possession.get(away).copied().unwrap_or(50.0);
        let edge = (ph - pa) / 18.0 + 0.2;
        let probs = probs_from_edge(edge);
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!("Average possession {ph:.0}% vs {pa:.0}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// Injury Impact

pub struct InjuryImpactModel {
    injuries: HashMap<String, f64>,
}

impl InjuryImpactModel {
    pub fn new() -> Self {
        Self {
            injuries: HashMap::new(),
        }
    }
}

impl Default for InjuryImpactModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for InjuryImpactModel {
    fn name(&self) -> &str {
        "Injury Impact"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
        for m in data {
            let h = totals.entry(m.home.as_str()).or_insert((0.0, 0));
            h.0 += m.injuries_home as f64;
            h.1 += 1;
            let a = totals.entry(m.away.as_str()).or_insert((0.0, 0));
            a.0 += m.injuries_away as f64;
            a.1 += 1;
        }
        self.injuries = totals
            .into_iter()
            .map(|(team, (sum, count))| (team.to_string(), sum / count.max(1) as f64))
            .collect();
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let ih = self.injuries.get(home).copied().unwrap_or(1.5);
        let ia = self.injuries.get(away).copied().unwrap_or(1.5);
        // Fewer absentees, stronger side.
        let edge = 0.35 * (ia - ih) + 0.2;
        let probs = probs_from_edge(edge);
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!("Average absentees {ih:.1} vs {ia:.1}"),
        }
    }
}

// ---------------------------------------------------------------------------
// xG Trend

pub struct XgTrendModel {
    net_xg: HashMap<String, f64>,
}

impl XgTrendModel {
    pub fn new() -> Self {
        Self {
            net_xg: HashMap::new(),
        }
    }
}

impl Default for XgTrendModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for XgTrendModel {
    fn name(&self) -> &str {
        "xG Trend"
    }

    fn train(&mut self, data: &[HistoricalMatch]) {
        let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
        for m in data {
            let diff = m.home_xg - m.away_xg;
            let h = totals.entry(m.home.as_str()).or_insert((0.0, 0));
            h.0 += diff;
            h.1 += 1;
            let a = totals.entry(m.away.as_str()).or_insert((0.0, 0));
            a.0 -= diff;
            a.1 += 1;
        }
        self.net_xg = totals
            .into_iter()
            .map(|(team, (sum, count))| (team.to_string(), sum / count.max(1) as f64))
            .collect();
    }

    fn predict(&self, home: &str, away: &str) -> Prediction {
        let xh = self.net_xg.get(home).copied().unwrap_or(0.0);
        let xa = self.net_xg.get(away).copied().unwrap_or(0.0);
        let edge = 0.7 * (xh - xa) + 0.2;
        let probs = probs_from_edge(edge);
        let (outcome, confidence) = probs.pick();
        Prediction {
            outcome,
            confidence,
            details: format!("Net xG per match: {xh:+.2} vs {xa:+.2}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(home: &str, away: &str, hg: u8, ag: u8, date: &str) -> HistoricalMatch {
        HistoricalMatch {
            date: date.to_string(),
            home: home.to_string(),
            away: away.to_string(),
            home_goals: hg,
            away_goals: ag,
            home_xg: hg as f64,
            away_xg: ag as f64,
            possession_home: 50,
            injuries_home: 1,
            injuries_away: 1,
        }
    }

    #[test]
    fn poisson_pmf_sums_to_one() {
        let pmf = poisson_pmf(1.4, 6);
        let sum: f64 = pmf.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn probs_pick_is_the_argmax() {
        let (outcome, confidence) = Probs {
            home: 0.2,
            draw: 0.5,
            away: 0.3,
        }
        .pick();
        assert_eq!(outcome, Outcome::Draw);
        assert!((confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn every_model_reports_confidence_in_unit_range() {
        let data = vec![
            played("A", "B", 2, 0, "2024-01-01"),
            played("B", "A", 1, 1, "2024-01-08"),
            played("A", "B", 3, 1, "2024-01-15"),
        ];
        for mut algo in roster() {
            algo.train(&data);
            let p = algo.predict("A", "B");
            assert!(
                (0.0..=1.0).contains(&p.confidence),
                "{} produced {}",
                algo.name(),
                p.confidence
            );
            assert!(!p.details.is_empty());
        }
    }

    #[test]
    fn elo_favors_the_repeat_winner() {
        let data: Vec<HistoricalMatch> = (0..10)
            .map(|i| played("Strong", "Weak", 2, 0, &format!("2024-01-{:02}", i + 1)))
            .collect();
        let mut elo = EloModel::new();
        elo.train(&data);
        let p = elo.predict("Strong", "Weak");
        assert_eq!(p.outcome, Outcome::Home);
        assert!(p.confidence > 0.5);
    }

    #[test]
    fn monte_carlo_is_stable_per_fixture() {
        let model = MonteCarloModel::new();
        assert_eq!(model.predict("A", "B"), model.predict("A", "B"));
    }

    #[test]
    fn head_to_head_counts_meetings() {
        let data = vec![
            played("A", "B", 2, 0, "2024-01-01"),
            played("A", "B", 1, 0, "2024-01-08"),
            played("A", "B", 0, 0, "2024-01-15"),
        ];
        let mut h2h = HeadToHeadModel::new();
        h2h.train(&data);
        let p = h2h.predict("A", "B");
        assert_eq!(p.outcome, Outcome::Home);
        assert!(p.details.contains("2/1/0"));
    }
}
