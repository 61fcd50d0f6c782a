//! Shared configuration and domain records for the TFT ladder collector.

pub mod app_config;
pub mod config;
pub mod ladder;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use ladder::{Division, Tier, NON_HUMAN_PLAYER_ID, UNRANKED_DIVISION, UNRANKED_TIER};
pub use records::{
    BatchCounts, ItemRecord, LadderEntry, MatchBatch, MatchRecord,
    ParticipantRecord, Ranking, TraitRecord, UnitRecord,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
