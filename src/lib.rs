pub mod config;
pub mod dataset;
pub mod derive;
pub mod http_client;
pub mod match_stats;
pub mod odds_fetch;
pub mod records;
pub mod report_export;
pub mod sofascore;
