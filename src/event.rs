//! Battle log events and the battle result.
//!
//! Events are internally tagged by `"t"` in JSON so a client can replay the
//! log without knowing the Rust types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combatant::SideState;
use crate::roster::StatKind;

/// Which roster a combatant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::A => write!(f, "A"),
            Winner::B => write!(f, "B"),
            Winner::Draw => write!(f, "Draw"),
        }
    }
}

/// What kind of attack an action event records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Strike {
    Basic,
    #[serde(rename_all = "camelCase")]
    Special { action_id: String, action_name: String },
}

impl Strike {
    pub fn is_special(&self) -> bool {
        matches!(self, Strike::Special { .. })
    }
}

/// An attack against the opposing front, hit or evaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRecord {
    pub turn: u32,
    pub side: Side,
    pub actor_id: String,
    pub actor_name: String,
    #[serde(flatten)]
    pub strike: Strike,
    pub target_id: String,
    pub target_name: String,
    pub evaded: bool,
    pub damage: u32,
    pub target_hp_after: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealRecord {
    pub turn: u32,
    pub side: Side,
    pub actor_id: String,
    pub actor_name: String,
    pub action_id: String,
    pub action_name: String,
    pub target_id: String,
    pub target_name: String,
    pub amount: u32,
    pub target_hp_after: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffRecord {
    pub turn: u32,
    pub side: Side,
    pub actor_id: String,
    pub actor_name: String,
    pub action_id: String,
    pub action_name: String,
    pub target_id: String,
    pub target_name: String,
    pub stat: StatKind,
    pub amount: f64,
    pub duration_turns: u32,
}

/// One entry of the battle log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum BattleEvent {
    TurnStart {
        turn: u32,
        side: Side,
    },
    Action(AttackRecord),
    Heal(HealRecord),
    Buff(BuffRecord),
    #[serde(rename_all = "camelCase")]
    CombatantDown {
        turn: u32,
        /// Side the fallen combatant belongs to
        side: Side,
        combatant_id: String,
        combatant_name: String,
    },
    BattleEnd {
        winner: Winner,
        turns: u32,
    },
}

/// Final state of both sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSides {
    #[serde(rename = "A")]
    pub a: SideState,
    #[serde(rename = "B")]
    pub b: SideState,
}

/// Everything one call to `simulate` produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: Winner,
    pub turns: u32,
    pub log: Vec<BattleEvent>,
    #[serde(rename = "final")]
    pub final_state: FinalSides,
}

impl BattleResult {
    /// Attack events emitted by `side`
    pub fn attacks_by(&self, side: Side) -> impl Iterator<Item = &AttackRecord> {
        self.log.iter().filter_map(move |e| match e {
            BattleEvent::Action(a) if a.side == side => Some(a),
            _ => None,
        })
    }

    /// Heal and buff events plus special attacks for `side`
    pub fn special_count(&self, side: Side) -> usize {
        self.log
            .iter()
            .filter(|e| match e {
                BattleEvent::Action(a) => a.side == side && a.strike.is_special(),
                BattleEvent::Heal(h) => h.side == side,
                BattleEvent::Buff(b) => b.side == side,
                _ => false,
            })
            .count()
    }

    /// Number of turns `side` took
    pub fn turns_taken(&self, side: Side) -> usize {
        self.log
            .iter()
            .filter(|e| matches!(e, BattleEvent::TurnStart { side: s, .. } if *s == side))
            .count()
    }
}
