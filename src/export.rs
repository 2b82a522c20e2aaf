use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::state::AppState;
use crate::view_model;

pub struct ExportReport {
    pub predictions: usize,
    pub matches: usize,
}

/// Writes the current session to an .xlsx workbook: one sheet per concern
/// (summary tiles, match directory, prediction store).
pub fn export_dashboard(path: &Path, state: &AppState) -> Result<ExportReport> {
    let mut summary_rows = vec![vec!["Metric".to_string(), "Value".to_string()]];
    summary_rows.push(vec![
        "Golden Algorithm".to_string(),
        state
            .summary
            .golden_algorithm
            .clone()
            .unwrap_or_else(|| "Initializing...".to_string()),
    ]);
    summary_rows.push(vec![
        "System Accuracy".to_string(),
        state
            .summary
            .system_accuracy
            .clone()
            .unwrap_or_else(|| "--%".to_string()),
    ]);
    summary_rows.push(vec![
        "Data Points".to_string(),
        state.summary.data_points.to_string(),
    ]);
    summary_rows.push(vec![
        "Algorithms Tested".to_string(),
        state.summary.algorithms_tested.to_string(),
    ]);

    let mut match_rows = vec![vec![
        "Match ID".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Date".to_string(),
        "League".to_string(),
        "Analyzed".to_string(),
    ]];
    for m in &state.matches {
        match_rows.push(vec![
            m.id.clone(),
            m.home.clone(),
            m.away.clone(),
            m.date.clone(),
            m.league.clone().unwrap_or_else(|| "-".to_string()),
            if state.predictions.contains_key(&m.id) {
                "yes".to_string()
            } else {
                "no".to_string()
            },
        ]);
    }

    let mut prediction_rows = vec![vec![
        "Match ID".to_string(),
        "Fixture".to_string(),
        "Prediction".to_string(),
        "Confidence".to_string(),
        "Tier".to_string(),
        "Golden Algorithm".to_string(),
        "Top Votes".to_string(),
        "Rationale".to_string(),
    ]];
    // Directory order keeps the sheet aligned with the screen.
    for m in &state.matches {
        let Some(bundle) = state.predictions.get(&m.id) else {
            continue;
        };
        let view = view_model::present(bundle);
        let votes = view
            .top_votes
            .iter()
            .map(view_model::format_vote)
            .collect::<Vec<_>>()
            .join(", ");
        prediction_rows.push(vec![
            m.id.clone(),
            format!("{} vs {}", m.home, m.away),
            view.outcome_label.to_string(),
            view_model::format_confidence(bundle.golden.confidence),
            view.confidence_tier.label().to_string(),
            bundle.golden.name.clone(),
            votes,
            bundle.golden.rationale.clone(),
        ]);
    }

    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), "Summary", &summary_rows)?;
    write_sheet(workbook.add_worksheet(), "Matches", &match_rows)?;
    write_sheet(workbook.add_worksheet(), "Predictions", &prediction_rows)?;
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        predictions: prediction_rows.len() - 1,
        matches: match_rows.len() - 1,
    })
}

fn write_sheet(worksheet: &mut Worksheet, name: &str, rows: &[Vec<String>]) -> Result<()> {
    worksheet
        .set_name(name)
        .with_context(|| format!("name sheet {name}"))?;
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            worksheet
                .write(r as u32, c as u16, cell.as_str())
                .with_context(|| format!("write {name} row {r}"))?;
        }
    }
    Ok(())
}
