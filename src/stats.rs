//! Aggregated statistics over a sweep of battles

use serde::{Deserialize, Serialize};

use crate::event::{BattleResult, Side, Winner};

/// Per-side counters summed over a sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    pub turns_taken: usize,
    pub specials: usize,
    pub attacks: usize,
    /// Attacks by this side that the other side evaded
    pub evaded: usize,
    pub damage_dealt: u64,
    pub knockouts: usize,
}

impl SideStats {
    fn collect(result: &BattleResult, side: Side) -> Self {
        let mut stats = SideStats {
            turns_taken: result.turns_taken(side),
            specials: result.special_count(side),
            ..SideStats::default()
        };
        for attack in result.attacks_by(side) {
            stats.attacks += 1;
            if attack.evaded {
                stats.evaded += 1;
            }
            stats.damage_dealt += attack.damage as u64;
            if attack.target_hp_after == 0 && !attack.evaded {
                stats.knockouts += 1;
            }
        }
        stats
    }

    fn add(&mut self, other: &SideStats) {
        self.turns_taken += other.turns_taken;
        self.specials += other.specials;
        self.attacks += other.attacks;
        self.evaded += other.evaded;
        self.damage_dealt += other.damage_dealt;
        self.knockouts += other.knockouts;
    }

    /// Share of turns that used a special action
    pub fn special_rate(&self) -> f64 {
        ratio(self.specials, self.turns_taken)
    }

    /// Share of attacks the opponent evaded
    pub fn evade_rate(&self) -> f64 {
        ratio(self.evaded, self.attacks)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub master_seed: u64,
    pub battles: usize,
    pub wins_a: usize,
    pub wins_b: usize,
    pub draws: usize,
    pub win_rate_a: f64,
    pub win_rate_b: f64,
    pub draw_rate: f64,
    pub avg_turns: f64,
    pub std_turns: f64,
    pub min_turns: u32,
    pub max_turns: u32,
    pub side_a: SideStats,
    pub side_b: SideStats,
}

impl AggregatedStats {
    pub fn from_results(master_seed: u64, results: &[BattleResult]) -> Self {
        let mut stats = AggregatedStats {
            master_seed,
            battles: results.len(),
            ..AggregatedStats::default()
        };
        if results.is_empty() {
            return stats;
        }

        for r in results {
            match r.winner {
                Winner::A => stats.wins_a += 1,
                Winner::B => stats.wins_b += 1,
                Winner::Draw => stats.draws += 1,
            }
            stats.side_a.add(&SideStats::collect(r, Side::A));
            stats.side_b.add(&SideStats::collect(r, Side::B));
        }

        let n = results.len() as f64;
        stats.win_rate_a = stats.wins_a as f64 / n;
        stats.win_rate_b = stats.wins_b as f64 / n;
        stats.draw_rate = stats.draws as f64 / n;

        let turns: Vec<f64> = results.iter().map(|r| r.turns as f64).collect();
        stats.avg_turns = turns.iter().sum::<f64>() / n;
        let variance = turns.iter().map(|t| (t - stats.avg_turns).powi(2)).sum::<f64>() / n;
        stats.std_turns = variance.sqrt();
        stats.min_turns = results.iter().map(|r| r.turns).min().unwrap_or(0);
        stats.max_turns = results.iter().map(|r| r.turns).max().unwrap_or(0);

        stats
    }
}
