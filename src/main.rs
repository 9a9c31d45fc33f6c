//! CLI entry point for the battle engine

use clap::{Parser, ValueEnum};
use idle_battle::{
    combatant::SideState,
    config::{wrap_seed, BattleConfig, BattleFile},
    demo::{make_demo_team, make_stage_boss},
    error::Result,
    event::{BattleEvent, BattleResult, Side, Strike},
    replay::BattleRecord,
    roster::StatKind,
    selection::{build_action_table, total_chance},
    simulation::{run_and_aggregate, simulate},
    stats::AggregatedStats,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DemoOpponent {
    /// 25 demo heroes against 25 demo heroes
    Mirror,
    /// 25 demo heroes against the stage 1 boss
    Boss,
}

#[derive(Parser, Debug)]
#[command(name = "idle-battle")]
#[command(version)]
#[command(about = "Deterministic seeded battle simulator", long_about = None)]
struct Args {
    /// Path to the battle file (YAML or JSON)
    #[arg(short, long, required_unless_present_any = ["demo", "verify"])]
    config: Option<PathBuf>,

    /// Use the built-in demo rosters instead of a battle file
    #[arg(long, value_enum)]
    demo: Option<DemoOpponent>,

    /// Seed override, wrapped to 32 bits (a random one is drawn if neither this nor the file sets it)
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Turn cap override
    #[arg(short, long)]
    max_turns: Option<u32>,

    /// Number of battles to run; more than one runs a sweep
    #[arg(short, long, default_value = "1")]
    num_sims: usize,

    /// Master seed for the sweep's derived battle seeds
    #[arg(long)]
    master_seed: Option<u64>,

    /// Use parallel processing for sweeps
    #[arg(short, long, default_value = "false")]
    parallel: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Write a replay record of the battle to this path (single battles only)
    #[arg(long, conflicts_with_all = ["num_sims", "master_seed"])]
    record: Option<PathBuf>,

    /// Verify a replay record and exit
    #[arg(long)]
    verify: Option<PathBuf>,

    /// Show timing information
    #[arg(short, long, default_value = "false")]
    timing: bool,

    /// Debug: print effective stats and opening action tables
    #[arg(long, default_value = "false")]
    debug_table: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("idle_battle=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(path) = &args.verify {
        let record = BattleRecord::load(path)?;
        record.verify()?;
        println!("Record verified: seed {} winner {} after {} turns", record.seed, record.result.winner, record.result.turns);
        return Ok(());
    }

    let file = load_battle(&args)?;
    let seed = args.seed.map(wrap_seed).or(file.seed).unwrap_or_else(rand::random::<u32>);
    let mut config = file.config_or(seed);
    config.seed = seed;
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }

    if args.debug_table {
        print_tables(&file);
        return Ok(());
    }

    let start = Instant::now();

    if args.num_sims > 1 {
        let stats = run_and_aggregate(
            &file.team_a,
            &file.team_b,
            config.max_turns,
            args.num_sims,
            args.master_seed,
            args.parallel,
        );
        let elapsed = start.elapsed().as_secs_f64();
        match args.output {
            OutputFormat::Text => print_sweep(&stats),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        }
        if args.timing {
            println!();
            println!("--- Performance ---");
            println!("Total time: {:.3}s", elapsed);
            println!("Per battle: {:.3}ms", elapsed * 1000.0 / args.num_sims as f64);
            println!("Battles/sec: {:.0}", args.num_sims as f64 / elapsed);
            println!("Threads: {} ({} cores)", rayon::current_num_threads(), num_cpus::get());
        }
        return Ok(());
    }

    let result = if let Some(path) = &args.record {
        let record = BattleRecord::capture(file.team_a.clone(), file.team_b.clone(), config);
        record.save(path)?;
        tracing::info!(path = %path.display(), "replay record written");
        record.result
    } else {
        simulate(&file.team_a, &file.team_b, &config)
    };
    let elapsed = start.elapsed().as_secs_f64();

    match args.output {
        OutputFormat::Text => print_battle(&config, &result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    if args.timing {
        println!();
        println!("Battle time: {:.3}ms", elapsed * 1000.0);
    }
    Ok(())
}

fn load_battle(args: &Args) -> Result<BattleFile> {
    if let Some(opponent) = args.demo {
        let team_b = match opponent {
            DemoOpponent::Mirror => make_demo_team(Side::B),
            DemoOpponent::Boss => make_stage_boss(),
        };
        return Ok(BattleFile {
            team_a: make_demo_team(Side::A),
            team_b,
            seed: None,
            max_turns: None,
        });
    }
    match &args.config {
        Some(path) => BattleFile::from_file(path),
        None => Err(idle_battle::error::BattleError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no battle file given",
        ))),
    }
}

fn print_tables(file: &BattleFile) {
    for (label, roster) in [("A", &file.team_a), ("B", &file.team_b)] {
        let side = SideState::from_roster(roster);
        println!("============================================================");
        println!("SIDE {} ({} combatants)", label, side.combatants.len());
        println!("============================================================");
        for c in &side.combatants {
            println!(
                "  {:<12} hp {:>6}  atk {:>5}  def {:>4}  eva {:.3}  pre {:.3}  king {:.3}",
                c.id,
                c.hp,
                c.effective(StatKind::Atk),
                c.effective(StatKind::Def),
                c.effective(StatKind::Evasion),
                c.effective(StatKind::Preemption),
                c.effective(StatKind::KingPower),
            );
        }
        let table = build_action_table(&side);
        let total = total_chance(&table);
        println!();
        println!("Action table (total chance {:.4}{}):", total, if total >= 1.0 { ", no basic strikes" } else { "" });
        let mut lower = 0.0;
        for entry in &table {
            println!(
                "  [{:.4}, {:.4})  {:<16} owner {}",
                lower,
                lower + entry.chance,
                entry.action.id,
                side.combatants[entry.owner].id
            );
            lower += entry.chance;
        }
        println!();
    }
}

fn print_battle(config: &BattleConfig, result: &BattleResult) {
    println!("=== Battle (seed {}, cap {}) ===", config.seed, config.max_turns);
    for event in &result.log {
        match event {
            BattleEvent::TurnStart { turn, side } => println!("-- turn {} ({})", turn, side),
            BattleEvent::Action(a) => {
                let what = match &a.strike {
                    Strike::Basic => "strikes".to_string(),
                    Strike::Special { action_name, .. } => format!("uses {}", action_name),
                };
                if a.evaded {
                    println!("   {} {} -> {} evades", a.actor_name, what, a.target_name);
                } else {
                    println!(
                        "   {} {} -> {} takes {} (hp {})",
                        a.actor_name, what, a.target_name, a.damage, a.target_hp_after
                    );
                }
            }
            BattleEvent::Heal(h) => println!(
                "   {} uses {} -> {} heals {} (hp {})",
                h.actor_name, h.action_name, h.target_name, h.amount, h.target_hp_after
            ),
            BattleEvent::Buff(b) => println!(
                "   {} uses {} -> {} {:?} {:+} for {} turns",
                b.actor_name, b.action_name, b.target_name, b.stat, b.amount, b.duration_turns
            ),
            BattleEvent::CombatantDown { combatant_name, side, .. } => {
                println!("   {} ({}) is down", combatant_name, side)
            }
            BattleEvent::BattleEnd { winner, turns } => {
                println!();
                println!("Winner: {} after {} turns", winner, turns);
            }
        }
    }
}

fn print_sweep(stats: &AggregatedStats) {
    println!("=== Battle Sweep Results ===");
    println!("Battles: {} (master seed {})", stats.battles, stats.master_seed);
    println!();
    println!("Wins A: {} ({:.2}%)", stats.wins_a, stats.win_rate_a * 100.0);
    println!("Wins B: {} ({:.2}%)", stats.wins_b, stats.win_rate_b * 100.0);
    println!("Draws:  {} ({:.2}%)", stats.draws, stats.draw_rate * 100.0);
    println!();
    println!("Average Turns: {:.2} ± {:.2}", stats.avg_turns, stats.std_turns);
    println!("Turn Range: {} - {}", stats.min_turns, stats.max_turns);
    println!();
    for (label, side) in [("A", &stats.side_a), ("B", &stats.side_b)] {
        println!("--- Side {} ---", label);
        println!("Special rate: {:.2}%", side.special_rate() * 100.0);
        println!("Evaded by foe: {:.2}%", side.evade_rate() * 100.0);
        println!("Damage dealt: {}", side.damage_dealt);
        println!("Knockouts: {}", side.knockouts);
    }
}
