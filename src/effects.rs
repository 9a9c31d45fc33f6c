//! Damage, heal and buff application.
//!
//! Only damage consumes a draw (the evasion check). Heals and buffs always
//! land on the acting side's current front, whoever owns the action.

use crate::combatant::{CombatantState, Modifier, SideState};
use crate::event::{AttackRecord, BattleEvent, BuffRecord, HealRecord, Side, Strike};
use crate::rng::BattleRng;
use crate::roster::{SpecialAction, StatKind};

/// Damage from `attacker` to `defender` for a landed hit: the king-power
/// scaled attack is floored, defense subtracted, and the result is never
/// below 1.
pub fn compute_damage(attacker: &CombatantState, defender: &CombatantState, mult: f64) -> u32 {
    let atk = attacker.effective(StatKind::Atk);
    let king = attacker.effective(StatKind::KingPower);
    let def = defender.effective(StatKind::Def);

    let base = (atk * (1.0 + king) * mult).floor();
    let dmg = (base - def).floor();
    if dmg.is_nan() || dmg < 1.0 {
        1
    } else {
        // saturating cast
        dmg as u32
    }
}

/// Who strikes and with what
pub struct Attack<'a> {
    pub turn: u32,
    pub side: Side,
    pub strike: Strike,
    /// Damage multiplier (1.0 for a basic strike)
    pub mult: f64,
    pub actor: &'a CombatantState,
}

/// Roll evasion, then damage the defending front. Pushes the action event
/// and, if the target falls, a combatant-down event.
pub fn resolve_attack(
    attack: Attack<'_>,
    foe: &mut SideState,
    target_idx: usize,
    rng: &mut BattleRng,
    log: &mut Vec<BattleEvent>,
) {
    let target = &mut foe.combatants[target_idx];
    let evaded = rng.next_unit() < target.effective(StatKind::Evasion);
    let damage = if evaded {
        0
    } else {
        compute_damage(attack.actor, target, attack.mult)
    };
    let down = damage > 0 && target.take_damage(damage);

    tracing::trace!(
        turn = attack.turn,
        actor = %attack.actor.id,
        target = %target.id,
        evaded,
        damage,
        hp_after = target.hp,
        "attack"
    );

    log.push(BattleEvent::Action(AttackRecord {
        turn: attack.turn,
        side: attack.side,
        actor_id: attack.actor.id.clone(),
        actor_name: attack.actor.name.clone(),
        strike: attack.strike,
        target_id: target.id.clone(),
        target_name: target.name.clone(),
        evaded,
        damage,
        target_hp_after: target.hp,
    }));

    if down {
        log.push(BattleEvent::CombatantDown {
            turn: attack.turn,
            side: attack.side.other(),
            combatant_id: target.id.clone(),
            combatant_name: target.name.clone(),
        });
    }
}

/// Heal the acting side's front by `max(0, floor(power))`, capped at max hp.
pub fn resolve_heal(
    turn: u32,
    side: Side,
    own: &mut SideState,
    owner_idx: usize,
    action: &SpecialAction,
    power: f64,
    log: &mut Vec<BattleEvent>,
) {
    let Some(target_idx) = own.front_index() else {
        return;
    };
    let amount = if power.is_finite() && power > 0.0 {
        power.floor().min(u32::MAX as f64) as u32
    } else {
        0
    };
    own.combatants[target_idx].heal(amount);

    let owner = &own.combatants[owner_idx];
    let target = &own.combatants[target_idx];
    tracing::trace!(turn, actor = %owner.id, target = %target.id, amount, "heal");

    log.push(BattleEvent::Heal(HealRecord {
        turn,
        side,
        actor_id: owner.id.clone(),
        actor_name: owner.name.clone(),
        action_id: action.id.clone(),
        action_name: action.name.clone(),
        target_id: target.id.clone(),
        target_name: target.name.clone(),
        amount,
        target_hp_after: target.hp,
    }));
}

/// Buff parameters after normalization
pub struct BuffSpec {
    pub stat: StatKind,
    pub amount: f64,
    pub duration_turns: f64,
}

/// Attach a modifier to the acting side's front.
pub fn resolve_buff(
    turn: u32,
    side: Side,
    own: &mut SideState,
    owner_idx: usize,
    action: &SpecialAction,
    spec: BuffSpec,
    log: &mut Vec<BattleEvent>,
) {
    let Some(target_idx) = own.front_index() else {
        return;
    };
    let amount = if spec.amount.is_finite() { spec.amount } else { 0.0 };
    let duration = if spec.duration_turns.is_finite() {
        spec.duration_turns.floor().clamp(1.0, u32::MAX as f64) as u32
    } else {
        1
    };

    let owner_id = own.combatants[owner_idx].id.clone();
    let owner_name = own.combatants[owner_idx].name.clone();
    let target = &mut own.combatants[target_idx];
    target.modifiers.push(Modifier {
        id: format!("{}:{}", action.id, turn),
        name: action.name.clone(),
        stat: spec.stat,
        amount,
        remaining_turns: duration,
        source_id: owner_id.clone(),
    });

    tracing::trace!(turn, actor = %owner_id, target = %target.id, stat = ?spec.stat, amount, duration, "buff");

    log.push(BattleEvent::Buff(BuffRecord {
        turn,
        side,
        actor_id: owner_id,
        actor_name: owner_name,
        action_id: action.id.clone(),
        action_name: action.name.clone(),
        target_id: target.id.clone(),
        target_name: target.name.clone(),
        stat: spec.stat,
        amount,
        duration_turns: duration,
    }));
}
