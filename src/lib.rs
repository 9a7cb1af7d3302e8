pub mod concentration;
pub mod demo_season;
pub mod dynamics;
pub mod expectation;
pub mod export;
pub mod ingest;
pub mod match_stats;
pub mod player_stats;
pub mod ratio;
pub mod render;
pub mod report;
pub mod splits;
pub mod tables;
