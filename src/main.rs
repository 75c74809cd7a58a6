//! Terminal front end: play against a bot, or watch two bots play.
//!
//! Usage:
//!   cargo run -- --p2 hard
//!   cargo run -- --p1 normal --p2 hard --rounds 5 --seed 42
//!
//! During a human turn type `row col` (zero-based), or one of
//! `:name <id> <name>`, `:marker <id> <X|O>`, `:strategy <id> <name>`, `:quit`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tictactoe_engine::engine::bot_profiles::{load_default_profiles, load_profiles, BotProfilesFile};
use tictactoe_engine::engine::game_match::{Match, MatchObserver};
use tictactoe_engine::engine::models::{Marker, MatchConfig, Player};

#[derive(Parser)]
#[command(name = "tictactoe-engine", about = "Play N×N tic-tac-toe in the terminal")]
struct Cli {
    /// Board side length
    #[arg(short, long, default_value = "3")]
    size: usize,

    /// Random seed for reproducible bot play
    #[arg(long)]
    seed: Option<u64>,

    /// Path to bot_profiles.toml (default: auto-discover)
    #[arg(long, env = "TICTACTOE_BOT_PROFILES")]
    profiles: Option<PathBuf>,

    /// Player 1 display name
    #[arg(long, default_value = "Player 1")]
    p1_name: String,

    /// Player 1 strategy, profile or difficulty
    #[arg(long, default_value = "human")]
    p1: String,

    /// Player 1 marker (player 2 gets the other one)
    #[arg(long, default_value = "X")]
    p1_marker: Marker,

    /// Player 2 display name
    #[arg(long, default_value = "Player 2")]
    p2_name: String,

    /// Player 2 strategy, profile or difficulty
    #[arg(long, default_value = "hard")]
    p2: String,

    /// Number of rounds to play
    #[arg(long, default_value = "1")]
    rounds: usize,

    /// Print the final match state as JSON
    #[arg(long)]
    json: bool,
}

/// Prints every notification straight to stdout.
struct ConsoleObserver;

impl MatchObserver for ConsoleObserver {
    fn on_message(&mut self, text: &str) {
        println!("{}", text);
    }

    fn on_cell_changed(&mut self, row: usize, col: usize, marker: Marker) {
        println!("  {} -> ({}, {})", marker, row, col);
    }

    fn on_players_changed(&mut self, p1: &Player, p2: &Player) {
        for p in [p1, p2] {
            println!(
                "  {} [{}] {} plays {}",
                p.player_id,
                p.strategy.kind(),
                p.display_name,
                p.marker
            );
        }
    }
}

enum Input {
    Move(usize, usize),
    Name(String, String),
    Marker(String, Marker),
    Strategy(String, String),
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [":quit"] | [":q"] => Ok(Input::Quit),
        [":name", id, name @ ..] if !name.is_empty() => {
            Ok(Input::Name(id.to_string(), name.join(" ")))
        }
        [":marker", id, marker] => marker
            .parse()
            .map(|m| Input::Marker(id.to_string(), m))
            .map_err(|e: tictactoe_engine::engine::error::GameError| e.to_string()),
        [":strategy", id, name] => Ok(Input::Strategy(id.to_string(), name.to_string())),
        [row, col] => match (row.parse(), col.parse()) {
            (Ok(r), Ok(c)) => Ok(Input::Move(r, c)),
            _ => Err(format!("not a cell: {}", line.trim())),
        },
        _ => Err(format!("unrecognised input: {}", line.trim())),
    }
}

fn play_round(
    game: &mut Match<ConsoleObserver>,
    profiles: &BotProfilesFile,
    input: &mut impl BufRead,
) -> Result<bool, Box<dyn std::error::Error>> {
    while !game.is_over() {
        print!("\n{}> ", game.board());
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        let result = match parse_input(&line) {
            Ok(Input::Quit) => return Ok(false),
            Ok(Input::Move(row, col)) => game.activate_cell(row, col),
            Ok(Input::Name(id, name)) => game.set_player_name(&id, name),
            Ok(Input::Marker(id, marker)) => game.set_player_marker(&id, marker),
            Ok(Input::Strategy(id, name)) => profiles
                .resolve_strategy(&name)
                .and_then(|strategy| game.set_player_strategy(&id, strategy)),
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "input rejected");
            eprintln!("{}", e);
        }
    }
    println!("\n{}", game.board());
    Ok(true)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();

    let profiles = match &cli.profiles {
        Some(path) => load_profiles(path)?,
        None => load_default_profiles(),
    };

    let p1 = Player::new("p1", cli.p1_name.as_str(), cli.p1_marker, profiles.resolve_strategy(&cli.p1)?);
    let p2 = Player::new(
        "p2",
        cli.p2_name.as_str(),
        cli.p1_marker.opponent(),
        profiles.resolve_strategy(&cli.p2)?,
    );
    let config = MatchConfig {
        size: cli.size,
        random_seed: cli.seed,
    };
    let mut game = Match::new(config, p1, p2, ConsoleObserver)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    for round in 0..cli.rounds {
        if round == 0 {
            game.start()?;
        } else {
            println!("\n--- round {} ---", round + 1);
            game.new_round()?;
        }
        if !play_round(&mut game, &profiles, &mut input)? {
            break;
        }
    }

    for p in game.players() {
        println!("{}: {} win(s)", p.display_name, p.score);
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&game.to_view())?);
    }
    Ok(())
}
