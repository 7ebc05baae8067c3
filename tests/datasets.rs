use std::collections::HashMap;

use anyhow::Result;

use sofasheet::dataset::{
    MatchDataSource, build_team_datasets, team_matches, unique_team_names,
};
use sofasheet::records::{MatchRecord, MatchStatus, OddsRow, ScorePair, StatRow, TeamSide};

fn match_record(id: u64, home: &str, away: &str, status: &str, score: Option<[i64; 2]>) -> MatchRecord {
    let (home_score, away_score) = match score {
        Some([h, a]) => (
            ScorePair {
                current: Some(h),
                period1: Some(0),
            },
            ScorePair {
                current: Some(a),
                period1: Some(0),
            },
        ),
        None => (ScorePair::default(), ScorePair::default()),
    };
    MatchRecord {
        id,
        start_timestamp: 1723917600 + id as i64,
        home_team: TeamSide {
            name: home.to_string(),
        },
        away_team: TeamSide {
            name: away.to_string(),
        },
        home_score,
        away_score,
        status: MatchStatus {
            kind: status.to_string(),
        },
    }
}

#[derive(Default)]
struct StubSource {
    stats: HashMap<u64, Vec<StatRow>>,
    odds: HashMap<u64, Vec<OddsRow>>,
    fail_for: Option<u64>,
}

impl MatchDataSource for StubSource {
    fn statistics(&self, match_id: u64) -> Result<Vec<StatRow>> {
        if self.fail_for == Some(match_id) {
            return Err(anyhow::anyhow!("statistics fetch refused"));
        }
        Ok(self.stats.get(&match_id).cloned().unwrap_or_default())
    }

    fn odds(&self, match_id: u64) -> Result<Vec<OddsRow>> {
        Ok(self.odds.get(&match_id).cloned().unwrap_or_default())
    }
}

#[test]
fn team_filter_is_exact_and_case_sensitive() {
    let matches = vec![
        match_record(1, "Alpha", "Beta", "finished", Some([1, 0])),
        match_record(2, "Gamma", "Alpha", "finished", Some([0, 0])),
        match_record(3, "Gamma", "Beta", "finished", Some([2, 2])),
    ];
    assert_eq!(team_matches(&matches, "Alpha").len(), 2);
    assert_eq!(team_matches(&matches, "alpha").len(), 0);
    assert_eq!(team_matches(&matches, "Alp").len(), 0);
}

#[test]
fn unique_team_names_are_sorted_and_deduplicated() {
    let matches = vec![
        match_record(1, "Beta", "Alpha", "finished", Some([1, 0])),
        match_record(2, "Alpha", "Gamma", "finished", Some([0, 0])),
    ];
    assert_eq!(unique_team_names(&matches), vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn unfinished_matches_are_excluded() {
    let matches = vec![
        match_record(1, "Alpha", "Beta", "finished", Some([2, 0])),
        match_record(2, "Beta", "Alpha", "notstarted", None),
        match_record(3, "Alpha", "Gamma", "postponed", None),
    ];
    let teams = vec!["Alpha".to_string()];
    let report = build_team_datasets(&matches, &teams, &StubSource::default(), |_| {});
    assert!(report.errors.is_empty());
    assert_eq!(report.datasets.len(), 1);
    assert_eq!(report.datasets[0].rows.len(), 1);
    assert_eq!(report.datasets[0].rows[0].correct_score, "2-0");
}

#[test]
fn bad_record_is_logged_and_skipped() {
    // Finished but with no scores attached; the rest of the batch survives.
    let matches = vec![
        match_record(1, "Alpha", "Beta", "finished", Some([1, 1])),
        match_record(2, "Gamma", "Alpha", "finished", None),
        match_record(3, "Alpha", "Delta", "finished", Some([3, 0])),
    ];
    let teams = vec!["Alpha".to_string()];
    let report = build_team_datasets(&matches, &teams, &StubSource::default(), |_| {});
    assert_eq!(report.datasets[0].rows.len(), 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("`2`"));
    assert!(report.errors[0].contains("Alpha"));
}

#[test]
fn fetch_failure_skips_only_that_match() {
    let matches = vec![
        match_record(1, "Alpha", "Beta", "finished", Some([1, 0])),
        match_record(2, "Alpha", "Gamma", "finished", Some([0, 2])),
    ];
    let teams = vec!["Alpha".to_string()];
    let source = StubSource {
        fail_for: Some(1),
        ..StubSource::default()
    };
    let report = build_team_datasets(&matches, &teams, &source, |_| {});
    assert_eq!(report.datasets[0].rows.len(), 1);
    assert_eq!(report.datasets[0].rows[0].correct_score, "0-2");
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("statistics fetch refused"));
}

#[test]
fn rows_keep_match_iteration_order() {
    let matches = vec![
        match_record(10, "Alpha", "Beta", "finished", Some([3, 0])),
        match_record(11, "Gamma", "Alpha", "finished", Some([1, 2])),
        match_record(12, "Alpha", "Delta", "finished", Some([0, 0])),
    ];
    let teams = vec!["Alpha".to_string()];
    let report = build_team_datasets(&matches, &teams, &StubSource::default(), |_| {});
    let scores: Vec<&str> = report.datasets[0]
        .rows
        .iter()
        .map(|row| row.correct_score.as_str())
        .collect();
    assert_eq!(scores, vec!["3-0", "2-1", "0-0"]);
}

#[test]
fn team_without_rows_still_gets_an_empty_dataset() {
    let matches = vec![match_record(1, "Alpha", "Beta", "notstarted", None)];
    let teams = vec!["Alpha".to_string(), "Beta".to_string()];
    let report = build_team_datasets(&matches, &teams, &StubSource::default(), |_| {});
    assert_eq!(report.datasets.len(), 2);
    assert!(report.datasets.iter().all(|d| d.rows.is_empty()));
}

#[test]
fn both_sides_of_one_match_derive_their_own_view() {
    let matches = vec![match_record(1, "Alpha", "Beta", "finished", Some([2, 1]))];
    let teams = vec!["Alpha".to_string(), "Beta".to_string()];
    let report = build_team_datasets(&matches, &teams, &StubSource::default(), |_| {});
    assert_eq!(report.datasets[0].rows[0].correct_score, "2-1");
    assert_eq!(report.datasets[1].rows[0].correct_score, "1-2");
}

#[test]
fn progress_counts_every_finished_match_once() {
    let matches = vec![
        match_record(1, "Alpha", "Beta", "finished", Some([1, 0])),
        match_record(2, "Beta", "Gamma", "finished", Some([0, 0])),
    ];
    let teams = vec!["Alpha".to_string(), "Beta".to_string(), "Gamma".to_string()];
    let mut last = (0usize, 0usize);
    let _ = build_team_datasets(&matches, &teams, &StubSource::default(), |progress| {
        last = (progress.current, progress.total);
    });
    // Two matches, four team-sides in total.
    assert_eq!(last, (4, 4));
}
