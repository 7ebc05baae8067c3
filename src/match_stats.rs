use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client;
use crate::records::StatRow;

const API_PREFIX: &str = "https://api.sofascore.com/api/v1";

/// Statistics for one match, flattened to one row per (metric, period).
/// A non-success response means the match simply has no published
/// statistics, so it resolves to an empty table rather than an error.
pub fn fetch_match_statistics(match_id: u64) -> Result<Vec<StatRow>> {
    let client = http_client()?;
    let url = format!("{API_PREFIX}/event/{match_id}/statistics");
    let resp = client
        .get(&url)
        .send()
        .context("statistics request failed")?;
    if !resp.status().is_success() {
        return Ok(Vec::new());
    }
    let body = resp.text().context("failed reading statistics body")?;
    parse_statistics_json(&body)
}

#[derive(Debug, Deserialize)]
struct StatisticsResponse {
    #[serde(default)]
    statistics: Vec<PeriodBlock>,
}

#[derive(Debug, Deserialize)]
struct PeriodBlock {
    period: String,
    #[serde(default)]
    groups: Vec<StatGroup>,
}

#[derive(Debug, Deserialize)]
struct StatGroup {
    #[serde(rename = "statisticsItems", default)]
    items: Vec<StatItem>,
}

#[derive(Debug, Deserialize)]
struct StatItem {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    home: Option<Value>,
    #[serde(default)]
    away: Option<Value>,
}

pub fn parse_statistics_json(raw: &str) -> Result<Vec<StatRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let parsed: StatisticsResponse =
        serde_json::from_str(trimmed).context("invalid statistics json")?;

    let mut rows = Vec::new();
    for block in parsed.statistics {
        for group in block.groups {
            for item in group.items {
                let Some(key) = item.key.or(item.name) else {
                    continue;
                };
                let (Some(home), Some(away)) = (
                    item.home.as_ref().and_then(cell_text),
                    item.away.as_ref().and_then(cell_text),
                ) else {
                    continue;
                };
                rows.push(StatRow {
                    key,
                    period: block.period.clone(),
                    home,
                    away,
                });
            }
        }
    }
    Ok(rows)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
