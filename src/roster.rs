//! Static roster definitions: what a team looks like before a battle starts.

use serde::{Deserialize, Serialize};

/// Maximum combatants per side; longer rosters are truncated.
pub const MAX_ROSTER_SIZE: usize = 25;

/// Stats that modifiers can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatKind {
    #[default]
    #[serde(rename = "atk")]
    Atk,
    #[serde(rename = "def")]
    Def,
    #[serde(rename = "evasion", alias = "eva")]
    Evasion,
    #[serde(rename = "preemption", alias = "preempt")]
    Preemption,
    #[serde(rename = "kingPower", alias = "king")]
    KingPower,
}

impl StatKind {
    /// Probability-like stats are clamped to [0, 1] whenever they are read.
    pub fn is_probability(self) -> bool {
        matches!(self, StatKind::Evasion | StatKind::Preemption | StatKind::KingPower)
    }
}

/// Raw stat bundle as it arrives from the roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub hp: f64,
    #[serde(default)]
    pub atk: f64,
    /// Can be negative, which amplifies damage taken
    #[serde(default)]
    pub def: f64,
    #[serde(default, alias = "eva")]
    pub evasion: f64,
    #[serde(default, alias = "preempt")]
    pub preemption: f64,
    #[serde(default, alias = "king")]
    pub king_power: f64,
}

fn default_power() -> f64 {
    1.0
}

fn default_duration() -> f64 {
    1.0
}

/// Kind-specific payload of a special action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionEffect {
    /// `power` multiplies the actor's attack
    Damage {
        #[serde(default = "default_power")]
        power: f64,
    },
    /// `power` is a flat hp amount
    Heal {
        #[serde(default)]
        power: f64,
    },
    #[serde(rename_all = "camelCase")]
    Buff {
        #[serde(default)]
        stat: StatKind,
        #[serde(default)]
        amount: f64,
        #[serde(default = "default_duration")]
        duration_turns: f64,
    },
}

/// A special action owned by a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialAction {
    pub id: String,
    pub name: String,
    /// Trigger probability per opportunity, 0..1
    #[serde(default)]
    pub chance: f64,
    #[serde(flatten)]
    pub effect: ActionEffect,
}

impl SpecialAction {
    pub fn damage(id: &str, name: &str, chance: f64, power: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            chance,
            effect: ActionEffect::Damage { power },
        }
    }

    pub fn heal(id: &str, name: &str, chance: f64, power: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            chance,
            effect: ActionEffect::Heal { power },
        }
    }

    pub fn buff(id: &str, name: &str, chance: f64, stat: StatKind, amount: f64, duration_turns: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            chance,
            effect: ActionEffect::Buff { stat, amount, duration_turns },
        }
    }
}

fn default_level() -> f64 {
    1.0
}

/// One roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: f64,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default, alias = "skills")]
    pub actions: Vec<SpecialAction>,
}

/// Ordered roster; index 0 is the front
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(rename = "heroes", alias = "combatants")]
    pub combatants: Vec<Combatant>,
}

impl Roster {
    pub fn new(combatants: Vec<Combatant>) -> Self {
        Self { combatants }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action_kind() {
        let json = r#"[
            {"id": "s1", "name": "Slash", "kind": "damage", "chance": 0.12, "power": 1.6},
            {"id": "s2", "name": "First Aid", "kind": "heal", "chance": 0.08, "power": 18},
            {"id": "s3", "name": "Rage", "kind": "buff", "chance": 0.06, "stat": "atk", "amount": 5, "durationTurns": 2}
        ]"#;
        let actions: Vec<SpecialAction> = serde_json::from_str(json).unwrap();
        assert_eq!(actions[0].effect, ActionEffect::Damage { power: 1.6 });
        assert_eq!(actions[1].effect, ActionEffect::Heal { power: 18.0 });
        assert_eq!(
            actions[2].effect,
            ActionEffect::Buff { stat: StatKind::Atk, amount: 5.0, duration_turns: 2.0 }
        );
    }

    #[test]
    fn missing_kind_fields_fall_back_to_defaults() {
        let json = r#"[
            {"id": "d", "name": "D", "kind": "damage", "chance": 0.5},
            {"id": "h", "name": "H", "kind": "heal", "chance": 0.5},
            {"id": "b", "name": "B", "kind": "buff", "chance": 0.5}
        ]"#;
        let actions: Vec<SpecialAction> = serde_json::from_str(json).unwrap();
        assert_eq!(actions[0].effect, ActionEffect::Damage { power: 1.0 });
        assert_eq!(actions[1].effect, ActionEffect::Heal { power: 0.0 });
        assert_eq!(
            actions[2].effect,
            ActionEffect::Buff { stat: StatKind::Atk, amount: 0.0, duration_turns: 1.0 }
        );
    }

    #[test]
    fn accepts_short_stat_names() {
        let json = r#"{
            "heroes": [{
                "id": "h1", "name": "H1",
                "stats": {"hp": 100, "atk": 10, "def": -2, "eva": 0.1, "preempt": 0.2, "king": 0.3},
                "skills": [{"id": "b", "name": "B", "kind": "buff", "chance": 0.1, "stat": "preempt", "amount": 0.1}]
            }]
        }"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        let hero = &roster.combatants[0];
        assert_eq!(hero.level, 1.0);
        assert_eq!(hero.stats.def, -2.0);
        assert_eq!(hero.stats.evasion, 0.1);
        assert_eq!(hero.stats.preemption, 0.2);
        assert_eq!(hero.stats.king_power, 0.3);
        match hero.actions[0].effect {
            ActionEffect::Buff { stat, .. } => assert_eq!(stat, StatKind::Preemption),
            ref other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn any_numeric_level_is_carried_through() {
        let json = r#"{"heroes": [
            {"id": "a", "name": "A", "level": -1},
            {"id": "b", "name": "B", "level": 1.5}
        ]}"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.combatants[0].level, -1.0);
        assert_eq!(roster.combatants[1].level, 1.5);

        let state = crate::combatant::CombatantState::from_combatant(&roster.combatants[1]);
        assert_eq!(state.level, 1.5);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"id": "x", "name": "X", "kind": "teleport", "chance": 0.1}"#;
        assert!(serde_json::from_str::<SpecialAction>(json).is_err());
    }

    #[test]
    fn probability_stats() {
        assert!(StatKind::Evasion.is_probability());
        assert!(StatKind::KingPower.is_probability());
        assert!(!StatKind::Atk.is_probability());
        assert!(!StatKind::Def.is_probability());
    }
}
