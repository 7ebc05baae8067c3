use std::collections::BTreeSet;
use std::env;

use anyhow::Result;
use rayon::prelude::*;

use crate::derive::{self, DerivedRow};
use crate::match_stats;
use crate::odds_fetch;
use crate::records::{MatchRecord, OddsRow, StatRow};

/// Matches where the team played either side, in the given order.
pub fn team_matches<'a>(matches: &'a [MatchRecord], team_name: &str) -> Vec<&'a MatchRecord> {
    matches
        .iter()
        .filter(|record| record.involves(team_name))
        .collect()
}

/// Every team name appearing in the match list, sorted and deduplicated.
pub fn unique_team_names(matches: &[MatchRecord]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for record in matches {
        names.insert(record.home_team.name.clone());
        names.insert(record.away_team.name.clone());
    }
    names.into_iter().collect()
}

/// Per-match supplementary data. The live implementation hits the API once
/// per match; tests substitute canned tables.
pub trait MatchDataSource: Sync {
    fn statistics(&self, match_id: u64) -> Result<Vec<StatRow>>;
    fn odds(&self, match_id: u64) -> Result<Vec<OddsRow>>;
}

pub struct SofascoreDataSource;

impl MatchDataSource for SofascoreDataSource {
    fn statistics(&self, match_id: u64) -> Result<Vec<StatRow>> {
        match_stats::fetch_match_statistics(match_id)
    }

    fn odds(&self, match_id: u64) -> Result<Vec<OddsRow>> {
        odds_fetch::fetch_match_odds(match_id)
    }
}

#[derive(Debug, Clone)]
pub struct TeamDataset {
    pub team: String,
    pub rows: Vec<DerivedRow>,
}

pub struct BuildProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

pub struct BuildReport {
    pub datasets: Vec<TeamDataset>,
    pub errors: Vec<String>,
}

/// Build one ordered dataset per team. Only finished matches derive rows;
/// a match that fails to derive is logged into the report and skipped, it
/// never aborts the rest of the team or the remaining teams. Teams that end
/// up with nothing still get an (empty) dataset entry.
pub fn build_team_datasets(
    matches: &[MatchRecord],
    team_names: &[String],
    source: &impl MatchDataSource,
    mut on_progress: impl FnMut(BuildProgress),
) -> BuildReport {
    let per_team: Vec<Vec<&MatchRecord>> = team_names
        .iter()
        .map(|team| {
            team_matches(matches, team)
                .into_iter()
                .filter(|record| record.is_finished())
                .collect()
        })
        .collect();
    let total: usize = per_team.iter().map(Vec::len).sum();

    let mut datasets = Vec::with_capacity(team_names.len());
    let mut errors = Vec::new();
    let mut current = 0usize;

    for (team, finished) in team_names.iter().zip(per_team) {
        on_progress(BuildProgress {
            current,
            total,
            message: format!("Processing `{}` matches ({})", team, finished.len()),
        });

        // Fetches fan out over the pool; collect keeps match order, not
        // completion order.
        let results: Vec<(u64, Result<DerivedRow>)> = with_fetch_pool(|| {
            finished
                .par_iter()
                .map(|record| (record.id, derive_with_source(record, team, source)))
                .collect()
        });

        let mut rows = Vec::with_capacity(results.len());
        for (match_id, result) in results {
            current += 1;
            match result {
                Ok(row) => rows.push(row),
                Err(err) => errors.push(format!("match `{match_id}` for `{team}`: {err}")),
            }
        }

        on_progress(BuildProgress {
            current,
            total,
            message: format!("Added data for `{}` with `{}` rows", team, rows.len()),
        });
        datasets.push(TeamDataset {
            team: team.clone(),
            rows,
        });
    }

    BuildReport { datasets, errors }
}

fn derive_with_source(
    record: &MatchRecord,
    team_name: &str,
    source: &impl MatchDataSource,
) -> Result<DerivedRow> {
    let stats = source.statistics(record.id)?;
    let odds = source.odds(record.id)?;
    derive::derive_row(record, team_name, &stats, &odds)
}

fn with_fetch_pool<T>(action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    let threads = fetch_parallelism();
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(6)
        .max(1)
}
