//! Core battle loop and batch runners

use rayon::prelude::*;

use crate::combatant::SideState;
use crate::config::BattleConfig;
use crate::effects::{resolve_attack, resolve_buff, resolve_heal, Attack, BuffSpec};
use crate::event::{BattleEvent, BattleResult, FinalSides, Side, Strike, Winner};
use crate::rng::BattleRng;
use crate::roster::{ActionEffect, Roster, StatKind};
use crate::selection::{build_action_table, select, Selection};
use crate::stats::AggregatedStats;

/// Pick the opening side from the fronts' effective preemption. A tie costs
/// one draw; below 0.5 favours A.
fn decide_first_side(a: &SideState, b: &SideState, rng: &mut BattleRng) -> Side {
    let pre_a = a.front().map_or(0.0, |c| c.effective(StatKind::Preemption));
    let pre_b = b.front().map_or(0.0, |c| c.effective(StatKind::Preemption));
    if pre_a == pre_b {
        if rng.next_unit() < 0.5 {
            Side::A
        } else {
            Side::B
        }
    } else if pre_a > pre_b {
        Side::A
    } else {
        Side::B
    }
}

fn decide_winner(a: &SideState, b: &SideState) -> Winner {
    match (a.any_alive(), b.any_alive()) {
        (true, false) => Winner::A,
        (false, true) => Winner::B,
        _ => Winner::Draw,
    }
}

/// Play one side's turn. Returns false if the opposing side has no front,
/// which ends the battle without completing the turn.
fn play_turn(
    turn: u32,
    side: Side,
    own: &mut SideState,
    foe: &mut SideState,
    rng: &mut BattleRng,
    log: &mut Vec<BattleEvent>,
) -> bool {
    own.tick_modifiers();

    let Some(target_idx) = foe.front_index() else {
        return false;
    };

    let table = build_action_table(own);
    let selection = select(rng.next_unit(), &table);
    // Copy what is needed out of the table so `own` can be mutated below.
    let picked = match selection {
        Selection::BasicStrike => None,
        Selection::Special(i) => Some((table[i].owner, table[i].action.clone())),
    };
    drop(table);

    match picked {
        None => {
            let Some(actor_idx) = own.front_index() else {
                return false;
            };
            let attack = Attack {
                turn,
                side,
                strike: Strike::Basic,
                mult: 1.0,
                actor: &own.combatants[actor_idx],
            };
            resolve_attack(attack, foe, target_idx, rng, log);
        }
        Some((owner_idx, action)) => match action.effect {
            ActionEffect::Damage { power } => {
                let mult = if power.is_finite() { power.max(0.0) } else { 0.0 };
                let attack = Attack {
                    turn,
                    side,
                    strike: Strike::Special {
                        action_id: action.id.clone(),
                        action_name: action.name.clone(),
                    },
                    mult,
                    actor: &own.combatants[owner_idx],
                };
                resolve_attack(attack, foe, target_idx, rng, log);
            }
            ActionEffect::Heal { power } => {
                resolve_heal(turn, side, own, owner_idx, &action, power, log);
            }
            ActionEffect::Buff { stat, amount, duration_turns } => {
                let spec = BuffSpec { stat, amount, duration_turns };
                resolve_buff(turn, side, own, owner_idx, &action, spec, log);
            }
        },
    }
    true
}

/// Run one battle to completion. The result depends only on the arguments.
pub fn simulate(team_a: &Roster, team_b: &Roster, config: &BattleConfig) -> BattleResult {
    let mut rng = BattleRng::new(config.seed);
    let mut a = SideState::from_roster(team_a);
    let mut b = SideState::from_roster(team_b);

    let mut side = decide_first_side(&a, &b, &mut rng);
    tracing::debug!(
        seed = config.seed,
        max_turns = config.max_turns,
        size_a = a.combatants.len(),
        size_b = b.combatants.len(),
        first = %side,
        "battle start"
    );

    let mut log = Vec::new();
    let mut turn: u32 = 0;

    while a.any_alive() && b.any_alive() && turn < config.max_turns {
        turn += 1;
        log.push(BattleEvent::TurnStart { turn, side });

        let (own, foe) = match side {
            Side::A => (&mut a, &mut b),
            Side::B => (&mut b, &mut a),
        };
        if !play_turn(turn, side, own, foe, &mut rng, &mut log) {
            break;
        }
        side = side.other();
    }

    let winner = decide_winner(&a, &b);
    log.push(BattleEvent::BattleEnd { winner, turns: turn });
    tracing::debug!(%winner, turns = turn, events = log.len(), "battle end");

    BattleResult {
        winner,
        turns: turn,
        log,
        final_state: FinalSides { a, b },
    }
}

/// Derive `count` battle seeds from one master seed
pub fn derive_seeds(master_seed: u64, count: usize) -> Vec<u32> {
    let mut rng = fastrand::Rng::with_seed(master_seed);
    (0..count).map(|_| rng.u32(..)).collect()
}

/// Run one battle per seed in parallel
pub fn run_battles_parallel(team_a: &Roster, team_b: &Roster, max_turns: u32, seeds: &[u32]) -> Vec<BattleResult> {
    seeds
        .par_iter()
        .map(|&seed| simulate(team_a, team_b, &BattleConfig { seed, max_turns }))
        .collect()
}

/// Run one battle per seed sequentially
pub fn run_battles_sequential(team_a: &Roster, team_b: &Roster, max_turns: u32, seeds: &[u32]) -> Vec<BattleResult> {
    seeds
        .iter()
        .map(|&seed| simulate(team_a, team_b, &BattleConfig { seed, max_turns }))
        .collect()
}

/// Run a sweep and aggregate it. Without a master seed one is drawn fresh.
pub fn run_and_aggregate(
    team_a: &Roster,
    team_b: &Roster,
    max_turns: u32,
    count: usize,
    master_seed: Option<u64>,
    parallel: bool,
) -> AggregatedStats {
    let master_seed = master_seed.unwrap_or_else(rand::random::<u64>);
    let seeds = derive_seeds(master_seed, count);
    tracing::info!(count, master_seed, parallel, "running sweep");

    let results = if parallel {
        run_battles_parallel(team_a, team_b, max_turns, &seeds)
    } else {
        run_battles_sequential(team_a, team_b, max_turns, &seeds)
    };

    AggregatedStats::from_results(master_seed, &results)
}
