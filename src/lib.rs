//! Deterministic, seeded battle engine for an idle RPG.
//!
//! `simulate` turns two rosters and a seed into a winner, a turn count and a
//! replayable event log. Identical inputs always produce identical output.

pub mod combatant;
pub mod config;
pub mod demo;
pub mod effects;
pub mod error;
pub mod event;
pub mod replay;
pub mod rng;
pub mod roster;
pub mod selection;
pub mod simulation;
pub mod stats;

#[cfg(feature = "python")]
mod python;

pub use config::{BattleConfig, BattleFile};
pub use event::{BattleEvent, BattleResult, Side, Winner};
pub use roster::{ActionEffect, Combatant, Roster, SpecialAction, StatKind, Stats};
pub use simulation::simulate;
