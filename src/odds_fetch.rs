use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::http_client;
use crate::records::OddsRow;

const API_PREFIX: &str = "https://api.sofascore.com/api/v1";

/// Betting markets for one match, flattened to one row per choice. Markets
/// are not published for every match; a non-success response resolves to an
/// empty table rather than an error.
pub fn fetch_match_odds(match_id: u64) -> Result<Vec<OddsRow>> {
    let client = http_client()?;
    let url = format!("{API_PREFIX}/event/{match_id}/odds/1/all");
    let resp = client.get(&url).send().context("odds request failed")?;
    if !resp.status().is_success() {
        return Ok(Vec::new());
    }
    let body = resp.text().context("failed reading odds body")?;
    parse_odds_json(&body)
}

#[derive(Debug, Deserialize)]
struct OddsResponse {
    #[serde(default)]
    markets: Vec<Market>,
}

#[derive(Debug, Deserialize)]
struct Market {
    #[serde(rename = "marketId", default)]
    market_id: Option<u64>,
    #[serde(rename = "marketName", default)]
    market_name: String,
    #[serde(rename = "structureType", default)]
    structure_type: Option<u32>,
    #[serde(rename = "marketGroup", default)]
    market_group: Option<String>,
    #[serde(rename = "marketPeriod", default)]
    market_period: Option<String>,
    #[serde(rename = "choiceGroup", default)]
    choice_group: Option<String>,
    #[serde(rename = "isLive", default)]
    is_live: bool,
    #[serde(default)]
    suspended: bool,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    name: String,
    #[serde(rename = "fractionalValue", default)]
    fractional_value: Option<String>,
    #[serde(rename = "initialFractionalValue", default)]
    initial_fractional_value: Option<String>,
    #[serde(rename = "sourceId", default)]
    source_id: Option<u64>,
    #[serde(default)]
    winning: Option<bool>,
    #[serde(default)]
    change: Option<i64>,
}

pub fn parse_odds_json(raw: &str) -> Result<Vec<OddsRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let parsed: OddsResponse = serde_json::from_str(trimmed).context("invalid odds json")?;

    let mut rows = Vec::new();
    for market in parsed.markets {
        for choice in market.choices {
            rows.push(OddsRow {
                market_id: market.market_id,
                market_name: market.market_name.clone(),
                structure_type: market.structure_type,
                market_group: market.market_group.clone(),
                market_period: market.market_period.clone(),
                choice_group: market.choice_group.clone(),
                is_live: market.is_live,
                suspended: market.suspended,
                selection: choice.name,
                fractional_value: choice.fractional_value,
                initial_fractional_value: choice.initial_fractional_value,
                source_id: choice.source_id,
                winning: choice.winning,
                change: choice.change,
            });
        }
    }
    Ok(rows)
}
