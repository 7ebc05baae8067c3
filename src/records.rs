use serde::Deserialize;

/// One match as returned by the events listing. Scores are optional because
/// fixtures that have not been played yet arrive without them.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    pub id: u64,
    #[serde(rename = "startTimestamp")]
    pub start_timestamp: i64,
    #[serde(rename = "homeTeam")]
    pub home_team: TeamSide,
    #[serde(rename = "awayTeam")]
    pub away_team: TeamSide,
    #[serde(rename = "homeScore", default)]
    pub home_score: ScorePair,
    #[serde(rename = "awayScore", default)]
    pub away_score: ScorePair,
    pub status: MatchStatus,
}

impl MatchRecord {
    pub fn is_finished(&self) -> bool {
        self.status.kind == "finished"
    }

    /// Exact name equality; alias handling across renames is out of scope.
    pub fn is_home(&self, team_name: &str) -> bool {
        self.home_team.name == team_name
    }

    pub fn involves(&self, team_name: &str) -> bool {
        self.home_team.name == team_name || self.away_team.name == team_name
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamSide {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScorePair {
    #[serde(default)]
    pub current: Option<i64>,
    #[serde(default)]
    pub period1: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchStatus {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Season {
    pub id: u64,
    pub name: String,
    pub year: String,
}

/// One statistic metric for one period, flattened out of the nested
/// statistics payload. Values stay as delivered (often numeric strings,
/// sometimes percentages); coercion happens at extraction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub key: String,
    pub period: String,
    pub home: String,
    pub away: String,
}

/// One market choice, flattened to a row the way the odds endpoint nests
/// markets over choices.
#[derive(Debug, Clone)]
pub struct OddsRow {
    pub market_id: Option<u64>,
    pub market_name: String,
    pub structure_type: Option<u32>,
    pub market_group: Option<String>,
    pub market_period: Option<String>,
    pub choice_group: Option<String>,
    pub is_live: bool,
    pub suspended: bool,
    pub selection: String,
    pub fractional_value: Option<String>,
    pub initial_fractional_value: Option<String>,
    pub source_id: Option<u64>,
    pub winning: Option<bool>,
    pub change: Option<i64>,
}
