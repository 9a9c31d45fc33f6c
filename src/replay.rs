//! Replay records: the stored form of a server-computed battle, and the
//! check that re-simulating it reproduces the same log.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::{BattleConfig, BattleFile};
use crate::error::Result;
use crate::event::{BattleEvent, BattleResult, Winner};
use crate::roster::Roster;
use crate::simulation::simulate;

/// Bumped whenever a change alters any battle outcome for a fixed input.
pub const ENGINE_VERSION: &str = "1";

/// First point where a stored battle and a fresh simulation disagree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayMismatch {
    #[error("record was produced by engine {recorded}, this is engine {current}")]
    EngineVersion { recorded: String, current: String },

    #[error("winner differs: recorded {recorded}, replayed {replayed}")]
    Winner { recorded: Winner, replayed: Winner },

    #[error("turn count differs: recorded {recorded}, replayed {replayed}")]
    Turns { recorded: u32, replayed: u32 },

    #[error("event {index} differs: recorded {recorded:?}, replayed {replayed:?}")]
    Event {
        index: usize,
        recorded: Option<Box<BattleEvent>>,
        replayed: Option<Box<BattleEvent>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRecord {
    pub engine_version: String,
    pub seed: u32,
    pub max_turns: u32,
    pub team_a: Roster,
    pub team_b: Roster,
    pub result: BattleResult,
}

impl BattleRecord {
    /// Simulate and keep everything needed to audit the battle later.
    pub fn capture(team_a: Roster, team_b: Roster, config: BattleConfig) -> Self {
        let result = simulate(&team_a, &team_b, &config);
        Self {
            engine_version: ENGINE_VERSION.to_string(),
            seed: config.seed,
            max_turns: config.max_turns,
            team_a,
            team_b,
            result,
        }
    }

    pub fn capture_file(file: &BattleFile) -> Result<Self> {
        let config = file.config()?;
        Ok(Self::capture(file.team_a.clone(), file.team_b.clone(), config))
    }

    pub fn config(&self) -> BattleConfig {
        BattleConfig {
            seed: self.seed,
            max_turns: self.max_turns,
        }
    }

    /// Re-run the battle and compare winner, turns and every log entry.
    pub fn verify(&self) -> std::result::Result<(), ReplayMismatch> {
        if self.engine_version != ENGINE_VERSION {
            return Err(ReplayMismatch::EngineVersion {
                recorded: self.engine_version.clone(),
                current: ENGINE_VERSION.to_string(),
            });
        }

        let replayed = simulate(&self.team_a, &self.team_b, &self.config());

        let len = self.result.log.len().max(replayed.log.len());
        for index in 0..len {
            let recorded = self.result.log.get(index);
            let fresh = replayed.log.get(index);
            if recorded != fresh {
                return Err(ReplayMismatch::Event {
                    index,
                    recorded: recorded.cloned().map(Box::new),
                    replayed: fresh.cloned().map(Box::new),
                });
            }
        }
        if self.result.winner != replayed.winner {
            return Err(ReplayMismatch::Winner {
                recorded: self.result.winner,
                replayed: replayed.winner,
            });
        }
        if self.result.turns != replayed.turns {
            return Err(ReplayMismatch::Turns {
                recorded: self.result.turns,
                replayed: replayed.turns,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::make_demo_team;
    use crate::event::Side;

    fn record() -> BattleRecord {
        BattleRecord::capture(
            make_demo_team(Side::A),
            make_demo_team(Side::B),
            BattleConfig::new(2024).with_max_turns(60),
        )
    }

    #[test]
    fn fresh_record_verifies() {
        assert_eq!(record().verify(), Ok(()));
    }

    #[test]
    fn json_round_trip_still_verifies() {
        let rec = record();
        let back = BattleRecord::from_json(&rec.to_json().unwrap()).unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.verify(), Ok(()));
    }

    #[test]
    fn tampered_damage_is_located() {
        let mut rec = record();
        let index = rec
            .result
            .log
            .iter()
            .position(|e| matches!(e, BattleEvent::Action(a) if !a.evaded))
            .unwrap();
        if let BattleEvent::Action(a) = &mut rec.result.log[index] {
            a.damage += 1;
        }
        match rec.verify() {
            Err(ReplayMismatch::Event { index: i, .. }) => assert_eq!(i, index),
            other => panic!("expected event mismatch, got {other:?}"),
        }
    }

    #[test]
    fn tampered_winner_is_reported() {
        let mut rec = record();
        let actual = rec.result.winner;
        rec.result.winner = if actual == Winner::A { Winner::B } else { Winner::A };
        assert!(matches!(rec.verify(), Err(ReplayMismatch::Winner { .. })));
    }

    #[test]
    fn truncated_log_is_reported() {
        let mut rec = record();
        let len = rec.result.log.len();
        rec.result.log.pop();
        match rec.verify() {
            Err(ReplayMismatch::Event { index, recorded, replayed }) => {
                assert_eq!(index, len - 1);
                assert!(recorded.is_none());
                assert!(replayed.is_some());
            }
            other => panic!("expected event mismatch, got {other:?}"),
        }
    }

    #[test]
    fn foreign_engine_version_is_rejected() {
        let mut rec = record();
        rec.engine_version = "0".into();
        assert!(matches!(rec.verify(), Err(ReplayMismatch::EngineVersion { .. })));
    }

    #[test]
    fn save_and_load() {
        let rec = record();
        let path = std::env::temp_dir().join(format!("idle_battle_record_{}.json", std::process::id()));
        rec.save(&path).unwrap();
        let loaded = BattleRecord::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, rec);
    }
}
