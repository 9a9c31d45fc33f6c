//! Battle configuration and battle files (YAML or JSON)

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BattleError, Result};
use crate::roster::Roster;

pub const DEFAULT_MAX_TURNS: u32 = 200;

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

/// Wrap any integer seed to 32 bits; `-7` and `4294967289` are the same seed.
pub fn wrap_seed(seed: i64) -> u32 {
    seed as u32
}

fn deserialize_seed<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    i64::deserialize(deserializer).map(wrap_seed)
}

fn deserialize_opt_seed<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u32>, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.map(wrap_seed))
}

/// Seed and turn cap for one battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleConfig {
    #[serde(deserialize_with = "deserialize_seed")]
    pub seed: u32,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

impl BattleConfig {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// Full battle input: both rosters plus optional seed and turn cap.
/// ```yaml
/// seed: 42
/// maxTurns: 200
/// teamA: { heroes: [...] }
/// teamB: { heroes: [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleFile {
    pub team_a: Roster,
    pub team_b: Roster,
    #[serde(default, deserialize_with = "deserialize_opt_seed", skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
}

impl BattleFile {
    /// Load a battle file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let path_str = path.as_ref().to_string_lossy().to_lowercase();

        if path_str.ends_with(".json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The battle configuration, failing if the file carries no seed.
    pub fn config(&self) -> Result<BattleConfig> {
        let seed = self.seed.ok_or(BattleError::MissingSeed)?;
        Ok(self.config_or(seed))
    }

    /// The battle configuration, using `fallback_seed` if the file has none.
    pub fn config_or(&self, fallback_seed: u32) -> BattleConfig {
        BattleConfig {
            seed: self.seed.unwrap_or(fallback_seed),
            max_turns: self.max_turns.unwrap_or(DEFAULT_MAX_TURNS),
        }
    }
}
