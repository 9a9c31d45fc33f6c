use thiserror::Error;

use crate::replay::ReplayMismatch;

/// Failures of the shell around the engine. `simulate` itself never fails.
#[derive(Error, Debug)]
pub enum BattleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("replay mismatch: {0}")]
    Replay(#[from] ReplayMismatch),

    #[error("battle file has no seed and none was supplied")]
    MissingSeed,
}

pub type Result<T> = std::result::Result<T, BattleError>;
