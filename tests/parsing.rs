use std::fs;
use std::path::PathBuf;

use sofasheet::match_stats::parse_statistics_json;
use sofasheet::odds_fetch::parse_odds_json;
use sofasheet::sofascore::{parse_events_page_json, parse_seasons_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_events_page_fixture() {
    let raw = read_fixture("events_page.json");
    let page = parse_events_page_json(&raw).expect("fixture should parse");
    assert_eq!(page.events.len(), 2);
    assert!(!page.has_next_page);

    let finished = &page.events[0];
    assert_eq!(finished.id, 11352501);
    assert!(finished.is_finished());
    assert!(finished.is_home("Arsenal"));
    assert_eq!(finished.home_score.current, Some(2));
    assert_eq!(finished.home_score.period1, Some(1));
    assert_eq!(finished.away_score.current, Some(1));

    let upcoming = &page.events[1];
    assert!(!upcoming.is_finished());
    assert!(upcoming.involves("Arsenal"));
    assert_eq!(upcoming.home_score.current, None);
    assert_eq!(upcoming.home_score.period1, None);
}

#[test]
fn parses_seasons_fixture_most_recent_first() {
    let raw = read_fixture("seasons.json");
    let seasons = parse_seasons_json(&raw).expect("fixture should parse");
    assert_eq!(seasons.len(), 3);
    assert_eq!(seasons[0].id, 76986);
    assert_eq!(seasons[0].year, "25/26");
    assert_eq!(seasons[2].year, "23/24");
}

#[test]
fn parses_statistics_fixture_across_periods() {
    let raw = read_fixture("statistics.json");
    let rows = parse_statistics_json(&raw).expect("fixture should parse");

    let corners_all = rows
        .iter()
        .find(|row| row.key == "cornerKicks" && row.period == "ALL")
        .expect("corners row");
    assert_eq!(corners_all.home, "7");
    assert_eq!(corners_all.away, "4");

    let yellows_1st = rows
        .iter()
        .find(|row| row.key == "yellowCards" && row.period == "1ST")
        .expect("yellow cards row");
    assert_eq!(yellows_1st.home, "1");

    // Percentages survive as the strings they arrive as.
    let possession = rows
        .iter()
        .find(|row| row.key == "ballPossession")
        .expect("possession row");
    assert_eq!(possession.home, "57%");
}

#[test]
fn parses_odds_fixture_flat() {
    let raw = read_fixture("odds.json");
    let rows = parse_odds_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 5);

    let handicap: Vec<_> = rows
        .iter()
        .filter(|row| row.market_name == "Asian handicap")
        .collect();
    assert_eq!(handicap.len(), 2);
    assert_eq!(handicap[0].selection, "(-1.5) Arsenal");
    assert_eq!(handicap[0].fractional_value.as_deref(), Some("6/4"));
    assert_eq!(handicap[0].choice_group.as_deref(), Some("-1.5"));

    let full_time_winner = rows
        .iter()
        .find(|row| row.market_name == "Full time" && row.winning == Some(true))
        .expect("winning choice");
    assert_eq!(full_time_winner.selection, "1");
}
