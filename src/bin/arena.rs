//! Arena CLI — run bot-vs-bot experiments from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 100 --p1 hard --p2 easy
//!   cargo run --release --bin arena -- --games 50 --p1 heuristic --p2 minimax_plain --size 3

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tictactoe_engine::engine::arena::run_arena;
use tictactoe_engine::engine::bot_profiles::{load_default_profiles, load_profiles};
use tictactoe_engine::engine::bot_strategy::Strategy;

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-vs-bot arena experiments for tic-tac-toe")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Board side length
    #[arg(long, default_value = "3")]
    size: usize,

    /// Alternate who moves first between games
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    alternate_seats: bool,

    /// Path to bot_profiles.toml
    #[arg(long, env = "TICTACTOE_BOT_PROFILES")]
    profiles: Option<PathBuf>,

    /// P1 profile, difficulty or strategy name
    #[arg(long, default_value = "hard")]
    p1: String,

    /// P1 display name (default: the profile name)
    #[arg(long)]
    p1_name: Option<String>,

    /// P2 profile, difficulty or strategy name
    #[arg(long, default_value = "easy")]
    p2: String,

    /// P2 display name (default: the profile name)
    #[arg(long)]
    p2_name: Option<String>,
}

fn print_config(label: &str, strategy: &Strategy) {
    match strategy {
        Strategy::Minimax(params) => eprintln!(
            "  {}: type={}, transposition_table={}",
            label,
            strategy.kind(),
            params.use_transposition_table
        ),
        other => eprintln!("  {}: type={}", label, other.kind()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let profiles = match &cli.profiles {
        Some(path) => load_profiles(path)?,
        None => load_default_profiles(),
    };

    let p1_name = cli.p1_name.clone().unwrap_or_else(|| cli.p1.clone());
    let mut p2_name = cli.p2_name.clone().unwrap_or_else(|| cli.p2.clone());
    if p1_name == p2_name {
        p2_name = format!("{}_2", p2_name);
    }

    let p1_strategy = profiles.resolve_strategy(&cli.p1)?;
    let p2_strategy = profiles.resolve_strategy(&cli.p2)?;

    eprintln!(
        "Arena: {} games, {}x{} board, seed={}, alternate_seats={}",
        cli.games, cli.size, cli.size, cli.seed, cli.alternate_seats
    );
    print_config(&p1_name, &p1_strategy);
    print_config(&p2_name, &p2_strategy);
    eprintln!();

    let mut strategies: HashMap<String, Strategy> = HashMap::new();
    strategies.insert(p1_name, p1_strategy);
    strategies.insert(p2_name, p2_strategy);

    let total = cli.games;
    let progress_cb = move |done: usize, _total: usize| {
        eprint!("\r  [{}/{}] games completed", done, total);
    };

    let result = run_arena(
        &strategies,
        cli.games,
        cli.seed,
        cli.size,
        cli.alternate_seats,
        Some(&progress_cb),
    )?;

    eprintln!("\r                                    "); // clear progress line
    println!("{}", result.summary());
    Ok(())
}
