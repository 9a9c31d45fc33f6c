//! Find the first seed whose first unit draw lands in `[lo, hi)`.
//!
//! Usage: find-seed <lo> <hi> [start] [limit]
//!
//! With equal front preemption the first draw decides who opens; otherwise it
//! is the opening side's action selection, which makes this handy for
//! building fixtures that hit a specific slice of the action table.

use idle_battle::rng::BattleRng;
use std::env;

fn parse<T: std::str::FromStr>(arg: Option<&String>, default: T, name: &str) -> T {
    match arg {
        None => default,
        Some(s) => match s.parse() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("Invalid {}: {}", name, s);
                std::process::exit(2);
            }
        },
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <lo> <hi> [start] [limit]", args[0]);
        std::process::exit(2);
    }

    let lo: f64 = parse(args.get(1), 0.0, "lo");
    let hi: f64 = parse(args.get(2), 1.0, "hi");
    let start: u32 = parse(args.get(3), 1, "start");
    let limit: u32 = parse(args.get(4), 500_000, "limit");

    for seed in start..start.saturating_add(limit) {
        let r = BattleRng::new(seed).next_unit();
        if r >= lo && r < hi {
            println!("seed {} first draw {:.6}", seed, r);
            return;
        }
    }

    eprintln!("No seed in [{}, {}) within {} tries", start, start.saturating_add(limit), limit);
    std::process::exit(1);
}
