pub mod batch;
pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod match_analysis;
pub mod metrics;
pub mod player_analysis;
pub mod qualification;
pub mod rankings_history;
pub mod registry;
pub mod team_analysis;
