use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_client::http_client;
use crate::records::{MatchRecord, Season};

const API_PREFIX: &str = "https://api.sofascore.com/api/v1";
// Hard stop for the pager in case the feed never reports a last page.
const MAX_EVENT_PAGES: u32 = 60;

#[derive(Debug, Clone, Copy)]
pub struct League {
    pub name: &'static str,
    pub tournament_id: u32,
}

/// Leagues this tool knows how to enumerate. Callers pick from this table
/// (or all of it); nothing else reads it ambiently.
pub const LEAGUE_CATALOG: &[League] = &[
    League {
        name: "EPL",
        tournament_id: 17,
    },
    League {
        name: "La Liga",
        tournament_id: 8,
    },
    League {
        name: "Bundesliga",
        tournament_id: 35,
    },
    League {
        name: "Serie A",
        tournament_id: 23,
    },
    League {
        name: "Ligue 1",
        tournament_id: 34,
    },
    League {
        name: "Champions League",
        tournament_id: 7,
    },
    League {
        name: "Europa League",
        tournament_id: 679,
    },
    League {
        name: "World Cup",
        tournament_id: 16,
    },
];

pub fn find_league(name: &str) -> Option<League> {
    let trimmed = name.trim();
    LEAGUE_CATALOG
        .iter()
        .copied()
        .find(|league| league.name.eq_ignore_ascii_case(trimmed))
}

/// Seasons for a league, most recent first as the API delivers them.
pub fn fetch_valid_seasons(league: League) -> Result<Vec<Season>> {
    let client = http_client()?;
    let url = format!(
        "{API_PREFIX}/unique-tournament/{}/seasons",
        league.tournament_id
    );
    let resp = client.get(&url).send().context("seasons request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading seasons body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "seasons http {} for `{}`",
            status,
            league.name
        ));
    }
    parse_seasons_json(&body)
}

pub fn parse_seasons_json(raw: &str) -> Result<Vec<Season>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid seasons json")?;
    let mut seasons = Vec::new();
    if let Some(arr) = root.get("seasons").and_then(|v| v.as_array()) {
        for item in arr {
            if let Ok(season) = serde_json::from_value::<Season>(item.clone()) {
                seasons.push(season);
            }
        }
    }
    Ok(seasons)
}

/// All matches of one season, following the event pager until the feed
/// reports no further page.
pub fn fetch_season_matches(league: League, season_id: u64) -> Result<Vec<MatchRecord>> {
    let client = http_client()?;
    let mut out = Vec::new();

    for page in 0..MAX_EVENT_PAGES {
        let url = format!(
            "{API_PREFIX}/unique-tournament/{}/season/{}/events/last/{}",
            league.tournament_id, season_id, page
        );
        let resp = client.get(&url).send().context("events request failed")?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // Past the last page.
            break;
        }
        let body = resp.text().context("failed reading events body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "events http {} for `{}` page {}",
                status,
                league.name,
                page
            ));
        }
        let parsed = parse_events_page_json(&body)?;
        out.extend(parsed.events);
        if !parsed.has_next_page {
            break;
        }
    }

    Ok(out)
}

#[derive(Debug)]
pub struct EventsPage {
    pub events: Vec<MatchRecord>,
    pub has_next_page: bool,
}

pub fn parse_events_page_json(raw: &str) -> Result<EventsPage> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(EventsPage {
            events: Vec::new(),
            has_next_page: false,
        });
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid events json")?;
    let has_next_page = root
        .get("hasNextPage")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let mut events = Vec::new();
    if let Some(arr) = root.get("events").and_then(|v| v.as_array()) {
        for item in arr {
            // Skip entries the feed ships malformed; the builder only ever
            // sees records that carried the required shape.
            if let Ok(record) = serde_json::from_value::<MatchRecord>(item.clone()) {
                events.push(record);
            }
        }
    }

    Ok(EventsPage {
        events,
        has_next_page,
    })
}
