use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::DashboardSummary;

/// Fetches the aggregate system metrics from `GET {base}/api/dashboard`.
///
/// The payload is deliberately lenient: every field is optional and the
/// backend has been observed sending counts as both strings and numbers,
/// so this parses through `Value` instead of a fixed shape.
pub fn fetch_summary(client: &Client, base: &str) -> Result<DashboardSummary, ApiError> {
    let url = format!("{base}/api/dashboard");
    let resp = client.get(&url).send()?;
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            body: snippet(&body),
        });
    }
    parse_summary_json(&body)
}

pub fn parse_summary_json(raw: &str) -> Result<DashboardSummary, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(DashboardSummary::default());
    }

    let root: Value = serde_json::from_str(trimmed)?;
    if !root.is_object() {
        return Err(ApiError::malformed("dashboard payload is not an object"));
    }

    Ok(DashboardSummary {
        golden_algorithm: pick_string(&root, "golden_algorithm"),
        system_accuracy: pick_string(&root, "system_accuracy"),
        data_points: pick_u64(&root, "data_points").unwrap_or(0),
        algorithms_tested: pick_u64(&root, "algorithms_tested").unwrap_or(0),
    })
}

fn pick_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn pick_u64(value: &Value, key: &str) -> Option<u64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

pub(crate) fn snippet(body: &str) -> String {
    const MAX: usize = 160;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
