//! Built-in demo rosters for smoke tests, benchmarks and the CLI `--demo` flag

use crate::event::Side;
use crate::roster::{Combatant, Roster, SpecialAction, StatKind, Stats, MAX_ROSTER_SIZE};

fn demo_hero(side: Side, i: usize) -> Combatant {
    let n = i as f64;
    let actions = if i % 6 == 0 {
        vec![
            SpecialAction::damage(&format!("s{i}-slash"), "Slash+", 0.12, 1.6),
            SpecialAction::buff(&format!("s{i}-rage"), "Rage", 0.06, StatKind::Atk, 5.0, 2.0),
        ]
    } else if i % 9 == 0 {
        vec![SpecialAction::heal(&format!("s{i}-heal"), "First Aid", 0.08, 18.0)]
    } else {
        vec![SpecialAction::damage(&format!("s{i}-poke"), "Poke", 0.05, 1.2)]
    };

    Combatant {
        id: format!("{side}-h{i}"),
        name: format!("{side}-Hero{i}"),
        level: 1.0,
        stats: Stats {
            hp: 120.0 + n * 3.0,
            atk: 25.0 + n,
            def: if i % 5 == 0 { -2.0 } else { 2.0 },
            evasion: (i % 7) as f64 * 0.01,
            preemption: match side {
                Side::A => 0.06,
                Side::B => 0.04,
            },
            king_power: (i % 10) as f64 * 0.01,
        },
        actions,
    }
}

/// A full 25-combatant team. Side A gets slightly higher preemption.
pub fn make_demo_team(side: Side) -> Roster {
    Roster::new((1..=MAX_ROSTER_SIZE).map(|i| demo_hero(side, i)).collect())
}

/// Single-boss NPC roster
pub fn make_stage_boss() -> Roster {
    Roster::new(vec![Combatant {
        id: "npc_boss_1".into(),
        name: "Golem".into(),
        level: 1.0,
        stats: Stats {
            hp: 550.0,
            atk: 20.0,
            def: 2.0,
            evasion: 0.01,
            preemption: 0.03,
            king_power: 0.02,
        },
        actions: vec![SpecialAction::damage("smash", "Smash", 0.1, 1.7)],
    }])
}
