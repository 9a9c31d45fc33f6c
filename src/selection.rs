//! Action table and probability-stacking selection.
//!
//! Every living combatant's special actions are flattened in roster order.
//! Chances are summed; each entry owns a fixed-width slice of the draw line,
//! earlier entries lower. Once the sum reaches 1 basic strikes are impossible
//! and the draw is stretched over the whole table.

use crate::combatant::{clamp01, SideState};
use crate::roster::SpecialAction;

/// One selectable special action
#[derive(Debug, Clone, Copy)]
pub struct TableEntry<'a> {
    /// Index of the owning combatant in its side
    pub owner: usize,
    pub action: &'a SpecialAction,
    /// Chance after clamping
    pub chance: f64,
}

/// Outcome of one selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    BasicStrike,
    /// Index into the action table
    Special(usize),
}

/// Collect the side's triggerable actions for this turn.
pub fn build_action_table(side: &SideState) -> Vec<TableEntry<'_>> {
    let mut table = Vec::new();
    for (owner, combatant) in side.combatants.iter().enumerate() {
        if !combatant.alive {
            continue;
        }
        for action in &combatant.actions {
            if !action.chance.is_finite() || action.chance <= 0.0 {
                continue;
            }
            table.push(TableEntry {
                owner,
                action,
                chance: clamp01(action.chance),
            });
        }
    }
    table
}

/// Sum of the table's chances, accumulated in table order
pub fn total_chance(table: &[TableEntry<'_>]) -> f64 {
    table.iter().map(|e| e.chance).sum()
}

/// Resolve one draw `r` in `[0, 1)` against the table.
pub fn select(r: f64, table: &[TableEntry<'_>]) -> Selection {
    let total = total_chance(table);
    if total <= 0.0 {
        return Selection::BasicStrike;
    }

    let mut x = if total < 1.0 {
        if r >= total {
            return Selection::BasicStrike;
        }
        r
    } else {
        r * total
    };

    for (i, entry) in table.iter().enumerate() {
        if x < entry.chance {
            return Selection::Special(i);
        }
        x -= entry.chance;
    }

    // Rounding can leave x just past the last boundary.
    Selection::Special(table.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Combatant, Roster, Stats};

    fn side(actions: Vec<Vec<SpecialAction>>) -> SideState {
        let combatants = actions
            .into_iter()
            .enumerate()
            .map(|(i, actions)| Combatant {
                id: format!("h{i}"),
                name: format!("H{i}"),
                level: 1.0,
                stats: Stats { hp: 10.0, ..Stats::default() },
                actions,
            })
            .collect();
        SideState::from_roster(&Roster::new(combatants))
    }

    fn dmg(id: &str, chance: f64) -> SpecialAction {
        SpecialAction::damage(id, id, chance, 1.0)
    }

    #[test]
    fn table_preserves_roster_then_action_order() {
        let s = side(vec![
            vec![dmg("a1", 0.1), dmg("a2", 0.2)],
            vec![dmg("b1", 0.3)],
        ]);
        let table = build_action_table(&s);
        let ids: Vec<_> = table.iter().map(|e| e.action.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2", "b1"]);
        assert_eq!(table[2].owner, 1);
    }

    #[test]
    fn table_skips_dead_owners_and_zero_chances() {
        let mut s = side(vec![
            vec![dmg("a1", 0.5)],
            vec![dmg("b1", 0.0), dmg("b2", -1.0), dmg("b3", f64::NAN), dmg("b4", 2.0)],
        ]);
        s.combatants[0].take_damage(10);
        let table = build_action_table(&s);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].action.id, "b4");
        assert_eq!(table[0].chance, 1.0);
    }

    #[test]
    fn empty_table_is_always_basic() {
        assert_eq!(select(0.0, &[]), Selection::BasicStrike);
        assert_eq!(select(0.999, &[]), Selection::BasicStrike);
    }

    #[test]
    fn below_one_uses_raw_intervals() {
        let s = side(vec![vec![dmg("a", 0.2), dmg("b", 0.3)]]);
        let table = build_action_table(&s);
        assert_eq!(select(0.0, &table), Selection::Special(0));
        assert_eq!(select(0.19, &table), Selection::Special(0));
        assert_eq!(select(0.2, &table), Selection::Special(1));
        assert_eq!(select(0.49, &table), Selection::Special(1));
        assert_eq!(select(0.5, &table), Selection::BasicStrike);
        assert_eq!(select(0.99, &table), Selection::BasicStrike);
    }

    #[test]
    fn saturated_table_never_selects_basic() {
        let s = side(vec![vec![dmg("a", 0.9)], vec![dmg("b", 0.9)]]);
        let table = build_action_table(&s);
        // total 1.8: raw r below 0.5 maps into [0, 0.9)
        assert_eq!(select(0.0, &table), Selection::Special(0));
        assert_eq!(select(0.49, &table), Selection::Special(0));
        assert_eq!(select(0.5, &table), Selection::Special(1));
        assert_eq!(select(0.999_999, &table), Selection::Special(1));
        for i in 0..1000 {
            let r = i as f64 / 1000.0;
            assert_ne!(select(r, &table), Selection::BasicStrike);
        }
    }

    #[test]
    fn exactly_one_is_saturated() {
        let s = side(vec![vec![dmg("a", 0.5), dmg("b", 0.5)]]);
        let table = build_action_table(&s);
        assert_eq!(select(0.999_999_9, &table), Selection::Special(1));
    }

    #[test]
    fn walk_fallthrough_picks_last_entry() {
        let s = side(vec![vec![dmg("a", 0.6), dmg("b", 0.6)]]);
        let table = build_action_table(&s);
        // Not reachable from a real draw, but the walk must not fail.
        assert_eq!(select(1.0, &table), Selection::Special(1));
    }
}
