use std::fmt::Display;

use anyhow::{Result, anyhow};
use chrono::{Local, TimeZone};

use crate::records::{MatchRecord, OddsRow, StatRow};

/// Fixed sheet column order; ASIAN is filled in by the report renderer with
/// a formula over Correct Score and Head Start, never by the engine.
pub const COLUMNS: [&str; 17] = [
    "W/L",
    "T/X",
    "Total Goals",
    "Home/Away",
    "Correct Score",
    "HT",
    "Total Goal O/E",
    "Score O/E",
    "Concede O/E",
    "BTTS",
    "Corner",
    "Card",
    "Corner HT",
    "Card HT",
    "ASIAN",
    "Head Start",
    "Date",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Win => "W",
            MatchResult::Loss => "L",
            MatchResult::Draw => "D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverUnder {
    Over,
    Under,
}

impl OverUnder {
    pub fn as_str(self) -> &'static str {
        match self {
            OverUnder::Over => "T",
            OverUnder::Under => "X",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn as_str(self) -> &'static str {
        match self {
            Venue::Home => "H",
            Venue::Away => "A",
        }
    }
}

/// Three-way odd/even split: a zero count is its own class ("EN"), distinct
/// from an even nonzero count, for the downstream betting-market columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
    Nil,
}

impl Parity {
    pub fn as_str(self) -> &'static str {
        match self {
            Parity::Odd => "O",
            Parity::Even => "E",
            Parity::Nil => "EN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Btts {
    Yes,
    No,
}

impl Btts {
    pub fn as_str(self) -> &'static str {
        match self {
            Btts::Yes => "Y",
            Btts::No => "N",
        }
    }
}

/// One sheet row for one (finished match, team) pair. Score-derived fields
/// are always present; statistic- and odds-derived fields degrade to `None`
/// when the source has nothing usable.
#[derive(Debug, Clone)]
pub struct DerivedRow {
    pub result: MatchResult,
    pub over_under: OverUnder,
    pub total_goals: i64,
    pub home_away: Venue,
    pub correct_score: String,
    pub ht_score: String,
    pub total_goal_oe: Parity,
    pub team_score_oe: Parity,
    pub concede_oe: Parity,
    pub btts: Btts,
    pub corners_total: Option<String>,
    pub cards_total: Option<String>,
    pub corners_ht: Option<String>,
    pub cards_ht: Option<String>,
    pub handicap_value: Option<f64>,
    pub match_date: String,
}

/// Derive one row from an already-fetched match record, statistics table and
/// odds table. Pure; performs no I/O. Returns an error only when the match
/// record itself is missing a required score field -- statistic and odds
/// lookups never fail the row, they blank their own field.
pub fn derive_row(
    record: &MatchRecord,
    team_name: &str,
    stats: &[StatRow],
    odds: &[OddsRow],
) -> Result<DerivedRow> {
    let team_at_home = record.is_home(team_name);

    let home_ft = require_score(record.home_score.current, record.id, "homeScore.current")?;
    let away_ft = require_score(record.away_score.current, record.id, "awayScore.current")?;
    let home_ht = require_score(record.home_score.period1, record.id, "homeScore.period1")?;
    let away_ht = require_score(record.away_score.period1, record.id, "awayScore.period1")?;

    let (team_score, opponent_score) = oriented(home_ft, away_ft, team_at_home);
    let (ht_team_score, ht_opponent_score) = oriented(home_ht, away_ht, team_at_home);

    let result = match team_score.cmp(&opponent_score) {
        std::cmp::Ordering::Greater => MatchResult::Win,
        std::cmp::Ordering::Less => MatchResult::Loss,
        std::cmp::Ordering::Equal => MatchResult::Draw,
    };

    let total_goals = team_score + opponent_score;
    // Over/under 2.5: goals are integers, so over means at least 3.
    let over_under = if total_goals > 2 {
        OverUnder::Over
    } else {
        OverUnder::Under
    };

    let btts = if team_score > 0 && opponent_score > 0 {
        Btts::Yes
    } else {
        Btts::No
    };

    let match_date = format_match_date(record.start_timestamp).ok_or_else(|| {
        anyhow!(
            "match {}: start timestamp {} out of range",
            record.id,
            record.start_timestamp
        )
    })?;

    Ok(DerivedRow {
        result,
        over_under,
        total_goals,
        home_away: if team_at_home { Venue::Home } else { Venue::Away },
        correct_score: relative_pair(team_score, opponent_score, true),
        ht_score: relative_pair(ht_team_score, ht_opponent_score, true),
        total_goal_oe: parity(total_goals),
        team_score_oe: parity(team_score),
        concede_oe: parity(opponent_score),
        btts,
        corners_total: corner_pair(stats, "ALL", team_at_home),
        cards_total: card_pair(stats, "ALL", team_at_home),
        corners_ht: corner_pair(stats, "1ST", team_at_home),
        cards_ht: card_pair(stats, "1ST", team_at_home),
        handicap_value: handicap_value(odds, team_name),
        match_date,
    })
}

pub fn parity(value: i64) -> Parity {
    if value == 0 {
        Parity::Nil
    } else if value % 2 != 0 {
        Parity::Odd
    } else {
        Parity::Even
    }
}

/// `"{team}-{opponent}"`, the queried team's value first.
fn relative_pair<T: Display>(home: T, away: T, team_at_home: bool) -> String {
    if team_at_home {
        format!("{home}-{away}")
    } else {
        format!("{away}-{home}")
    }
}

fn oriented(home: i64, away: i64, team_at_home: bool) -> (i64, i64) {
    if team_at_home { (home, away) } else { (away, home) }
}

fn require_score(value: Option<i64>, match_id: u64, field: &str) -> Result<i64> {
    value.ok_or_else(|| anyhow!("match {match_id}: missing {field}"))
}

fn stat_rows<'a>(
    stats: &'a [StatRow],
    key_fragment: &'a str,
    period: &'a str,
) -> impl Iterator<Item = &'a StatRow> {
    stats
        .iter()
        .filter(move |row| row.key.contains(key_fragment) && row.period == period)
}

/// Corners for one period, team-relative, taken verbatim off the single
/// matching row. `None` when the row is missing.
fn corner_pair(stats: &[StatRow], period: &str, team_at_home: bool) -> Option<String> {
    let row = stat_rows(stats, "corner", period).next()?;
    Some(relative_pair(&row.home, &row.away, team_at_home))
}

/// Cards for one period, summed across card-type rows (yellow, red), then
/// team-relative. Non-numeric values fail the extraction, they do not count
/// as zero; no matching row at all also yields `None`.
fn card_pair(stats: &[StatRow], period: &str, team_at_home: bool) -> Option<String> {
    let mut home_total = 0i64;
    let mut away_total = 0i64;
    let mut matched = false;
    for row in stat_rows(stats, "Card", period) {
        home_total += row.home.trim().parse::<i64>().ok()?;
        away_total += row.away.trim().parse::<i64>().ok()?;
        matched = true;
    }
    matched.then(|| relative_pair(home_total, away_total, team_at_home))
}

/// First handicap-market selection naming the team, in source order; the
/// feed occasionally lists several and the first one is authoritative.
pub fn handicap_value(odds: &[OddsRow], team_name: &str) -> Option<f64> {
    let selection = odds
        .iter()
        .filter(|row| row.market_name.contains("handicap"))
        .map(|row| row.selection.as_str())
        .find(|selection| selection.contains(team_name))?;
    parse_handicap_label(selection)
}

/// Pull the number out of a `"(<number>) <text>"` selection label.
pub fn parse_handicap_label(label: &str) -> Option<f64> {
    let (head, _) = label.split_once(") ")?;
    head.trim_start_matches('(').trim().parse::<f64>().ok()
}

fn format_match_date(start_timestamp: i64) -> Option<String> {
    Local
        .timestamp_opt(start_timestamp, 0)
        .single()
        .map(|dt| dt.format("%d-%m-%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::{Parity, parity, parse_handicap_label};

    #[test]
    fn parity_three_way_split() {
        assert_eq!(parity(0), Parity::Nil);
        assert_eq!(parity(1), Parity::Odd);
        assert_eq!(parity(2), Parity::Even);
        assert_eq!(parity(3), Parity::Odd);
        assert_eq!(parity(4), Parity::Even);
    }

    #[test]
    fn handicap_label_parses_signed_values() {
        assert_eq!(parse_handicap_label("(-1.5) Arsenal"), Some(-1.5));
        assert_eq!(parse_handicap_label("(2) Brentford"), Some(2.0));
        assert_eq!(parse_handicap_label("(+0.5) Fulham"), Some(0.5));
    }

    #[test]
    fn handicap_label_rejects_other_shapes() {
        assert_eq!(parse_handicap_label("Arsenal -1.5"), None);
        assert_eq!(parse_handicap_label("(abc) Arsenal"), None);
        assert_eq!(parse_handicap_label(""), None);
    }
}
