use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;
use reqwest::blocking::Client;

use crate::analyze_fetch;
use crate::engine::AnalysisEngine;
use crate::feed::{self, HistoricalMatch};
use crate::history_store;
use crate::http_client;
use crate::matches_fetch;
use crate::state::{DashboardSummary, Delta, PredictionBundle, ProviderCommand, UpcomingMatch};
use crate::summary_fetch;

const UPCOMING_COUNT: usize = 5;

// The documented backend fallback for analyze calls with ids the directory
// does not know.
const FALLBACK_HOME: &str = "Galatasaray";
const FALLBACK_AWAY: &str = "Fenerbahce";
const FALLBACK_DATE: &str = "2024-05-19";

enum Backend {
    /// The three HTTP endpoints of a remote backend.
    Remote {
        base: String,
        client: &'static Client,
    },
    /// The in-process engine playing the backend's role.
    Local {
        engine: AnalysisEngine,
        directory: Vec<UpcomingMatch>,
    },
}

/// Decides whether a successful directory fetch should kick off an automatic
/// analysis. Fires for the first entry only, at most once per session, and
/// never on an empty directory.
pub fn auto_analyze_target(matches: &[UpcomingMatch], already_triggered: bool) -> Option<&str> {
    if already_triggered {
        return None;
    }
    matches.first().map(|m| m.id.as_str())
}

/// Spawns the provider thread: resolves the backend, runs the startup
/// sequence (summary, then directory, then the one-shot auto analysis) and
/// serves commands until the UI hangs up.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let backend = init_backend(&tx);
        run(backend, tx, cmd_rx);
    });
}

fn init_backend(tx: &Sender<Delta>) -> Backend {
    if let Some(base) = http_client::api_base() {
        match http_client::http_client() {
            Ok(client) => {
                let _ = tx.send(Delta::Log(format!("[INFO] Using backend at {base}")));
                return Backend::Remote { base, client };
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] HTTP client unavailable ({err}), falling back to local engine"
                )));
            }
        }
    }

    let _ = tx.send(Delta::Log(
        "[INFO] No backend configured, starting local engine".to_string(),
    ));
    let _ = tx.send(Delta::Log("[INFO] Initializing scraper...".to_string()));

    let mut rng = feed::rng_from_env();
    let history = load_or_generate_history(&mut rng, tx);
    let _ = tx.send(Delta::Log(format!(
        "[INFO] Retrieved {} historical matches",
        history.len()
    )));

    let engine = AnalysisEngine::train(&history);
    let _ = tx.send(Delta::Log(format!(
        "[INFO] Trained {} algorithms on {} matches",
        engine.leaderboard().len(),
        engine.data_points()
    )));
    if let Some(golden) = engine.golden() {
        let _ = tx.send(Delta::Log(format!(
            "[INFO] Golden algorithm selected: {} ({:.1}% accuracy)",
            golden.name,
            golden.accuracy * 100.0
        )));
    }

    let directory = feed::generate_upcoming(&mut rng, UPCOMING_COUNT);
    let _ = tx.send(Delta::Log("[INFO] System ready".to_string()));

    Backend::Local { engine, directory }
}

fn load_or_generate_history(
    rng: &mut rand::rngs::StdRng,
    tx: &Sender<Delta>,
) -> Vec<HistoricalMatch> {
    let weeks = feed::history_weeks_from_env();

    let Some(path) = history_store::default_db_path() else {
        return feed::generate_historical(rng, weeks);
    };

    match history_store::open_db(&path) {
        Ok(mut conn) => match history_store::load_all(&conn) {
            Ok(stored) if !stored.is_empty() => stored,
            Ok(_) => {
                let fresh = feed::generate_historical(rng, weeks);
                if let Err(err) = history_store::replace_all(&mut conn, &fresh) {
                    let _ = tx.send(Delta::Log(format!(
                        "[WARN] Could not persist history: {err}"
                    )));
                }
                fresh
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] History load failed: {err}")));
                feed::generate_historical(rng, weeks)
            }
        },
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] History db unavailable: {err}")));
            feed::generate_historical(rng, weeks)
        }
    }
}

fn run(backend: Backend, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    let mut auto_triggered = false;

    refresh_summary(&backend, &tx);
    refresh_matches(&backend, &tx, &mut auto_triggered);

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            ProviderCommand::Analyze { match_id } => run_analysis(&backend, &match_id, &tx),
            ProviderCommand::RefreshSummary => refresh_summary(&backend, &tx),
            ProviderCommand::RefreshMatches => refresh_matches(&backend, &tx, &mut auto_triggered),
        }
    }
}

fn refresh_summary(backend: &Backend, tx: &Sender<Delta>) {
    // On failure the previous summary (or the placeholder) stays on screen.
    match fetch_summary(backend) {
        Ok(summary) => {
            let _ = tx.send(Delta::SetSummary(summary));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Dashboard fetch failed: {err}")));
        }
    }
}

fn refresh_matches(backend: &Backend, tx: &Sender<Delta>, auto_triggered: &mut bool) {
    match fetch_matches(backend) {
        Ok(matches) => {
            let target = auto_analyze_target(&matches, *auto_triggered).map(str::to_string);
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Match directory: {} fixtures",
                matches.len()
            )));
            let _ = tx.send(Delta::SetMatches(matches));
            if let Some(id) = target {
                *auto_triggered = true;
                run_analysis(backend, &id, tx);
            }
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Match fetch failed: {err}")));
        }
    }
}

fn run_analysis(backend: &Backend, match_id: &str, tx: &Sender<Delta>) {
    let _ = tx.send(Delta::AnalysisStarted {
        id: match_id.to_string(),
    });

    match fetch_bundle(backend, match_id) {
        Ok(bundle) => {
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Analysis ready for {match_id}: {} ({:.1}%)",
                bundle.golden.outcome.label(),
                bundle.golden.confidence * 100.0
            )));
            let _ = tx.send(Delta::SetPrediction {
                id: match_id.to_string(),
                bundle,
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Analysis failed for {match_id}: {err}"
            )));
            let _ = tx.send(Delta::AnalysisFailed {
                id: match_id.to_string(),
            });
        }
    }
}

fn fetch_summary(backend: &Backend) -> Result<DashboardSummary> {
    match backend {
        Backend::Remote { base, client } => Ok(summary_fetch::fetch_summary(client, base)?),
        Backend::Local { engine, .. } => Ok(engine.summary()),
    }
}

fn fetch_matches(backend: &Backend) -> Result<Vec<UpcomingMatch>> {
    match backend {
        Backend::Remote { base, client } => Ok(matches_fetch::fetch_matches(client, base)?),
        Backend::Local { directory, .. } => Ok(directory.clone()),
    }
}

fn fetch_bundle(backend: &Backend, match_id: &str) -> Result<PredictionBundle> {
    match backend {
        Backend::Remote { base, client } => {
            Ok(analyze_fetch::fetch_prediction(client, base, match_id)?)
        }
        Backend::Local { engine, directory } => {
            let fixture = directory
                .iter()
                .find(|m| m.id == match_id)
                .cloned()
                .unwrap_or_else(|| UpcomingMatch {
                    id: match_id.to_string(),
                    home: FALLBACK_HOME.to_string(),
                    away: FALLBACK_AWAY.to_string(),
                    date: FALLBACK_DATE.to_string(),
                    league: None,
                });
            engine.analyze(&fixture)
        }
    }
}
