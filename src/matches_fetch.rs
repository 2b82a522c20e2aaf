use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::UpcomingMatch;
use crate::summary_fetch::snippet;

/// Fetches the match directory from `GET {base}/api/matches`.
///
/// The order returned by the backend is preserved for display. An empty
/// array is valid (no fixtures scheduled); records missing an id, either
/// team name or the date are rejected outright.
pub fn fetch_matches(client: &Client, base: &str) -> Result<Vec<UpcomingMatch>, ApiError> {
    let url = format!("{base}/api/matches");
    let resp = client.get(&url).send()?;
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            body: snippet(&body),
        });
    }
    parse_matches_json(&body)
}

#[derive(Debug, Deserialize)]
struct MatchRecord {
    id: serde_json::Value,
    home_team: String,
    away_team: String,
    date: String,
    #[serde(default)]
    league: Option<String>,
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<UpcomingMatch>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    let records: Vec<MatchRecord> = serde_json::from_str(trimmed)?;
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        out.push(validate_record(record)?);
    }
    Ok(out)
}

fn validate_record(record: MatchRecord) -> Result<UpcomingMatch, ApiError> {
    // Identifiers are opaque; the backend has sent both strings and numbers.
    let id = match &record.id {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        other => {
            return Err(ApiError::malformed(format!(
                "match id is not a string or number: {other}"
            )));
        }
    };
    if id.is_empty() {
        return Err(ApiError::malformed("match record with empty id"));
    }

    let home = record.home_team.trim().to_string();
    let away = record.away_team.trim().to_string();
    let date = record.date.trim().to_string();
    if home.is_empty() || away.is_empty() {
        return Err(ApiError::malformed(format!(
            "match {id} is missing a team name"
        )));
    }
    if date.is_empty() {
        return Err(ApiError::malformed(format!("match {id} is missing a date")));
    }

    Ok(UpcomingMatch {
        id,
        home,
        away,
        date,
        league: record
            .league
            .and_then(|l| {
                let trimmed = l.trim().to_string();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            }),
    })
}
