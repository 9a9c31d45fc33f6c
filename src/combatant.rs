//! Per-battle combatant state with stat calculations

use serde::{Deserialize, Serialize};

use crate::roster::{Combatant, Roster, SpecialAction, StatKind, MAX_ROSTER_SIZE};

/// Clamp to [0, 1]; anything non-finite reads as 0.
#[inline]
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

/// Floor to an integer, treating non-finite input as `fallback`.
#[inline]
fn floor_or(x: f64, fallback: i64) -> i64 {
    if x.is_finite() {
        x.floor() as i64
    } else {
        fallback
    }
}

/// A timed additive stat adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    /// `<action id>:<turn applied>`
    pub id: String,
    pub name: String,
    pub stat: StatKind,
    pub amount: f64,
    pub remaining_turns: u32,
    pub source_id: String,
}

/// Mutable state of one combatant during a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantState {
    pub id: String,
    pub name: String,
    pub level: f64,
    pub max_hp: u32,
    pub hp: u32,
    pub atk: i64,
    pub def: i64,
    pub evasion: f64,
    pub preemption: f64,
    pub king_power: f64,
    pub actions: Vec<SpecialAction>,
    pub modifiers: Vec<Modifier>,
    pub alive: bool,
}

impl CombatantState {
    /// Normalize a roster entry: hp floored to at least 1, atk floored to at
    /// least 0, def floored, probabilities clamped.
    pub fn from_combatant(c: &Combatant) -> Self {
        let hp = floor_or(c.stats.hp, 1).clamp(1, u32::MAX as i64) as u32;
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            level: c.level,
            max_hp: hp,
            hp,
            atk: floor_or(c.stats.atk, 0).max(0),
            def: floor_or(c.stats.def, 0),
            evasion: clamp01(c.stats.evasion),
            preemption: clamp01(c.stats.preemption),
            king_power: clamp01(c.stats.king_power),
            actions: c.actions.clone(),
            modifiers: Vec::new(),
            alive: true,
        }
    }

    fn base_stat(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Atk => self.atk as f64,
            StatKind::Def => self.def as f64,
            StatKind::Evasion => self.evasion,
            StatKind::Preemption => self.preemption,
            StatKind::KingPower => self.king_power,
        }
    }

    /// Base value plus all active modifiers on `stat`
    pub fn effective(&self, stat: StatKind) -> f64 {
        let bonus: f64 = self
            .modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.amount)
            .sum();
        let value = self.base_stat(stat) + bonus;
        if stat.is_probability() {
            clamp01(value)
        } else {
            value
        }
    }

    /// Apply `damage`, returning true if this knocked the combatant out.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Decrement every modifier and drop the expired ones
    pub fn tick_modifiers(&mut self) {
        if self.modifiers.is_empty() {
            return;
        }
        for m in &mut self.modifiers {
            m.remaining_turns = m.remaining_turns.saturating_sub(1);
        }
        self.modifiers.retain(|m| m.remaining_turns > 0);
    }
}

/// One side of a battle. Order never changes; dead combatants stay in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    #[serde(rename = "heroes")]
    pub combatants: Vec<CombatantState>,
}

impl SideState {
    pub fn from_roster(roster: &Roster) -> Self {
        Self {
            combatants: roster
                .combatants
                .iter()
                .take(MAX_ROSTER_SIZE)
                .map(CombatantState::from_combatant)
                .collect(),
        }
    }

    pub fn any_alive(&self) -> bool {
        self.combatants.iter().any(|c| c.alive)
    }

    /// Index of the lowest-index living combatant
    pub fn front_index(&self) -> Option<usize> {
        self.combatants.iter().position(|c| c.alive)
    }

    pub fn front(&self) -> Option<&CombatantState> {
        self.front_index().map(|i| &self.combatants[i])
    }

    pub fn tick_modifiers(&mut self) {
        for c in self.combatants.iter_mut().filter(|c| c.alive) {
            c.tick_modifiers();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Stats;

    fn combatant(stats: Stats) -> Combatant {
        Combatant {
            id: "c1".into(),
            name: "C1".into(),
            level: 3.0,
            stats,
            actions: vec![],
        }
    }

    fn modifier(stat: StatKind, amount: f64, remaining: u32) -> Modifier {
        Modifier {
            id: format!("m:{remaining}"),
            name: "M".into(),
            stat,
            amount,
            remaining_turns: remaining,
            source_id: "c1".into(),
        }
    }

    #[test]
    fn builder_floors_and_clamps() {
        let state = CombatantState::from_combatant(&combatant(Stats {
            hp: 99.7,
            atk: 12.9,
            def: -2.5,
            evasion: 1.7,
            preemption: -0.3,
            king_power: 0.25,
        }));
        assert_eq!(state.max_hp, 99);
        assert_eq!(state.hp, 99);
        assert_eq!(state.atk, 12);
        assert_eq!(state.def, -3);
        assert_eq!(state.evasion, 1.0);
        assert_eq!(state.preemption, 0.0);
        assert_eq!(state.king_power, 0.25);
        assert_eq!(state.level, 3.0);
        assert!(state.alive);
        assert!(state.modifiers.is_empty());
    }

    #[test]
    fn degenerate_stats_are_normalized() {
        let state = CombatantState::from_combatant(&combatant(Stats {
            hp: 0.0,
            atk: -5.0,
            def: f64::NAN,
            evasion: f64::NAN,
            preemption: f64::INFINITY,
            king_power: 0.0,
        }));
        assert_eq!(state.hp, 1);
        assert_eq!(state.max_hp, 1);
        assert_eq!(state.atk, 0);
        assert_eq!(state.def, 0);
        assert_eq!(state.evasion, 0.0);
        assert_eq!(state.preemption, 1.0);
    }

    #[test]
    fn roster_is_truncated_to_25() {
        let roster = Roster::new((0..30).map(|_| combatant(Stats::default())).collect());
        assert_eq!(SideState::from_roster(&roster).combatants.len(), MAX_ROSTER_SIZE);
    }

    #[test]
    fn effective_stat_sums_modifiers() {
        let mut state = CombatantState::from_combatant(&combatant(Stats { atk: 10.0, def: 2.0, ..Stats::default() }));
        state.modifiers.push(modifier(StatKind::Atk, 5.0, 2));
        state.modifiers.push(modifier(StatKind::Atk, -1.5, 1));
        state.modifiers.push(modifier(StatKind::Def, -4.0, 1));
        assert_eq!(state.effective(StatKind::Atk), 13.5);
        assert_eq!(state.effective(StatKind::Def), -2.0);
    }

    #[test]
    fn probability_stats_clamp_on_read_only() {
        let mut state = CombatantState::from_combatant(&combatant(Stats { evasion: 0.8, ..Stats::default() }));
        state.modifiers.push(modifier(StatKind::Evasion, 0.5, 1));
        assert_eq!(state.effective(StatKind::Evasion), 1.0);
        assert_eq!(state.evasion, 0.8);

        state.modifiers.push(modifier(StatKind::KingPower, -3.0, 1));
        assert_eq!(state.effective(StatKind::KingPower), 0.0);
    }

    #[test]
    fn modifiers_expire_after_their_duration() {
        let mut state = CombatantState::from_combatant(&combatant(Stats { atk: 10.0, ..Stats::default() }));
        state.modifiers.push(modifier(StatKind::Atk, 5.0, 2));
        state.tick_modifiers();
        assert_eq!(state.effective(StatKind::Atk), 15.0);
        state.tick_modifiers();
        assert_eq!(state.effective(StatKind::Atk), 10.0);
        assert!(state.modifiers.is_empty());
    }

    #[test]
    fn damage_and_heal_stay_in_bounds() {
        let mut state = CombatantState::from_combatant(&combatant(Stats { hp: 50.0, ..Stats::default() }));
        assert!(!state.take_damage(20));
        state.heal(100);
        assert_eq!(state.hp, 50);
        assert!(state.take_damage(70));
        assert_eq!(state.hp, 0);
        assert!(!state.alive);
        assert!(!state.take_damage(5));
    }

    #[test]
    fn front_skips_the_dead() {
        let roster = Roster::new((0..3).map(|_| combatant(Stats { hp: 10.0, ..Stats::default() })).collect());
        let mut side = SideState::from_roster(&roster);
        assert_eq!(side.front_index(), Some(0));
        side.combatants[0].take_damage(10);
        assert_eq!(side.front_index(), Some(1));
        side.combatants[1].take_damage(10);
        side.combatants[2].take_damage(10);
        assert_eq!(side.front_index(), None);
        assert!(!side.any_alive());
    }

    #[test]
    fn dead_combatants_do_not_tick() {
        let roster = Roster::new((0..2).map(|_| combatant(Stats { hp: 10.0, ..Stats::default() })).collect());
        let mut side = SideState::from_roster(&roster);
        side.combatants[0].modifiers.push(modifier(StatKind::Atk, 1.0, 1));
        side.combatants[0].take_damage(10);
        side.tick_modifiers();
        assert_eq!(side.combatants[0].modifiers.len(), 1);
    }
}
