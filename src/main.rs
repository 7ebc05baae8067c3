use std::cmp::Reverse;

use anyhow::Result;

use sofasheet::config::{LeagueSelection, ScrapeConfig, SeasonSelection};
use sofasheet::dataset::{self, BuildProgress, SofascoreDataSource};
use sofasheet::records::{MatchRecord, Season};
use sofasheet::report_export;
use sofasheet::sofascore::{self, League};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ScrapeConfig::from_env();

    let mut errors = Vec::new();
    let leagues = resolve_leagues(&config.leagues, &mut errors);
    if leagues.is_empty() {
        return Err(anyhow::anyhow!("no leagues resolved from APP_LEAGUES"));
    }

    let mut matches: Vec<MatchRecord> = Vec::new();
    for league in &leagues {
        let seasons = match sofascore::fetch_valid_seasons(*league) {
            Ok(seasons) => seasons,
            Err(err) => {
                errors.push(format!("seasons for `{}`: {err}", league.name));
                continue;
            }
        };
        let selected = select_seasons(seasons, &config.seasons);
        if selected.is_empty() {
            errors.push(format!("no seasons selected for `{}`", league.name));
            continue;
        }

        for season in selected {
            println!("Fetching `{}` season `{}`", league.name, season.name);
            match sofascore::fetch_season_matches(*league, season.id) {
                Ok(batch) => {
                    println!("  {} matches", batch.len());
                    matches.extend(batch);
                }
                Err(err) => errors.push(format!(
                    "matches for `{}` season `{}`: {err}",
                    league.name, season.name
                )),
            }
        }
    }

    // Most recent first, the order the sheets are read in.
    matches.sort_by_key(|record| Reverse(record.start_timestamp));

    let team_names = config
        .teams
        .clone()
        .unwrap_or_else(|| dataset::unique_team_names(&matches));
    println!("Teams: {}  Matches: {}", team_names.len(), matches.len());

    let source = SofascoreDataSource;
    let report = dataset::build_team_datasets(
        &matches,
        &team_names,
        &source,
        |progress: BuildProgress| {
            println!(
                "[{}/{}] {}",
                progress.current, progress.total, progress.message
            );
        },
    );
    errors.extend(report.errors);

    let export = report_export::save_workbook(&config.output, &report.datasets)?;
    println!("Excel file saved as `{}`", config.output.display());
    println!("Sheets: {}  Rows: {}", export.sheets, export.rows);
    for team in &export.skipped {
        println!("**Empty match data: {team}");
    }

    if !errors.is_empty() {
        println!("Errors: {}", errors.len());
        for err in errors.iter().take(12) {
            println!(" - {err}");
        }
    }

    Ok(())
}

fn resolve_leagues(selection: &LeagueSelection, errors: &mut Vec<String>) -> Vec<League> {
    match selection {
        LeagueSelection::All => sofascore::LEAGUE_CATALOG.to_vec(),
        LeagueSelection::Named(names) => {
            let mut leagues = Vec::with_capacity(names.len());
            for name in names {
                match sofascore::find_league(name) {
                    Some(league) => leagues.push(league),
                    None => errors.push(format!("unknown league `{name}`")),
                }
            }
            leagues
        }
    }
}

fn select_seasons(seasons: Vec<Season>, selection: &SeasonSelection) -> Vec<Season> {
    match selection {
        SeasonSelection::All => seasons,
        SeasonSelection::Latest => seasons.into_iter().take(1).collect(),
        SeasonSelection::Named(names) => seasons
            .into_iter()
            .filter(|season| {
                names
                    .iter()
                    .any(|name| season.year == *name || season.name == *name)
            })
            .collect(),
    }
}
