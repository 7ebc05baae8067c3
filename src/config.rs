use std::env;
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "sofascore.xlsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeagueSelection {
    All,
    Named(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonSelection {
    All,
    Latest,
    Named(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub leagues: LeagueSelection,
    pub seasons: SeasonSelection,
    pub teams: Option<Vec<String>>,
    pub output: PathBuf,
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        let leagues = match env::var("APP_LEAGUES") {
            Ok(raw) if !is_all(&raw) => {
                let names = parse_list(&raw);
                if names.is_empty() {
                    LeagueSelection::All
                } else {
                    LeagueSelection::Named(names)
                }
            }
            _ => LeagueSelection::All,
        };

        let seasons = match env::var("APP_SEASONS") {
            Ok(raw) if raw.trim().eq_ignore_ascii_case("latest") => SeasonSelection::Latest,
            Ok(raw) if !is_all(&raw) => {
                let names = parse_list(&raw);
                if names.is_empty() {
                    SeasonSelection::All
                } else {
                    SeasonSelection::Named(names)
                }
            }
            _ => SeasonSelection::All,
        };

        let teams = env::var("APP_TEAMS")
            .ok()
            .map(|raw| parse_list(&raw))
            .filter(|names| !names.is_empty());

        let output = env::var("APP_OUTPUT")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        Self {
            leagues,
            seasons,
            teams,
            output,
        }
    }
}

fn is_all(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all")
}

pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
