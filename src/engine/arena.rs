//! Bot-vs-bot arena runner.
//!
//! Games are independent matches with their own seeded RNG, so they run in
//! parallel and a given `base_seed` always reproduces the same results.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::engine::bot_strategy::Strategy;
use crate::engine::error::{GameError, Result};
use crate::engine::game_match::{Match, NullObserver};
use crate::engine::models::*;

/// Aggregated results from an arena run.
#[derive(Debug, Clone)]
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: HashMap<String, usize>,
    pub draws: usize,
    pub game_durations_ms: Vec<f64>,
    pub moves_per_game: Vec<usize>,
}

impl ArenaResult {
    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn draw_rate(&self) -> f64 {
        self.draws as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_moves(&self) -> f64 {
        if self.moves_per_game.is_empty() {
            return 0.0;
        }
        self.moves_per_game.iter().sum::<usize>() as f64 / self.moves_per_game.len() as f64
    }

    /// Wilson score interval for the win rate.
    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        let mut names: Vec<&String> = self.wins.keys().collect();
        names.sort();
        for name in names {
            let wr = self.win_rate(name);
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]",
                name,
                self.wins[name],
                wr * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
            ));
        }
        lines.push(format!(
            "  {:>12}: {} ({:.1}%)",
            "Draws",
            self.draws,
            self.draw_rate() * 100.0
        ));
        lines.push(format!("  Avg moves per game: {:.1}", self.avg_moves()));
        if !self.game_durations_ms.is_empty() {
            let avg_ms = self.game_durations_ms.iter().sum::<f64>() / self.game_durations_ms.len() as f64;
            let total_s = self.game_durations_ms.iter().sum::<f64>() / 1000.0;
            lines.push(format!("  Avg game: {:.1}ms  |  Total: {:.1}s", avg_ms, total_s));
        }
        lines.join("\n")
    }
}

struct GameRecord {
    winner: Option<String>,
    moves: usize,
    elapsed_ms: f64,
}

/// Play `num_games` between exactly two bot strategies.
///
/// Game `i` uses seed `base_seed + i`. With `alternate_seats`, the strategies
/// swap markers every game so neither always moves first.
pub fn run_arena(
    strategies: &HashMap<String, Strategy>,
    num_games: usize,
    base_seed: u64,
    board_size: usize,
    alternate_seats: bool,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<ArenaResult> {
    let mut strategy_names: Vec<String> = strategies.keys().cloned().collect();
    strategy_names.sort();
    assert_eq!(strategy_names.len(), 2, "arena needs exactly two strategies");

    if let Some(name) = strategy_names.iter().find(|n| strategies[*n].is_human()) {
        return Err(GameError::HumanInArena(name.clone()));
    }

    let completed = AtomicUsize::new(0);
    let records = (0..num_games)
        .into_par_iter()
        .map(|game_idx| {
            let seed = base_seed + game_idx as u64;
            let (first, second) = if alternate_seats && game_idx % 2 == 1 {
                (&strategy_names[1], &strategy_names[0])
            } else {
                (&strategy_names[0], &strategy_names[1])
            };

            let record = play_one_game(
                (first.as_str(), strategies[first]),
                (second.as_str(), strategies[second]),
                seed,
                board_size,
            )?;

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress_callback {
                cb(done, num_games);
            }
            Ok(record)
        })
        .collect::<Result<Vec<GameRecord>>>()?;

    let mut result = ArenaResult {
        num_games,
        wins: strategy_names.iter().map(|n| (n.clone(), 0)).collect(),
        draws: 0,
        game_durations_ms: Vec::with_capacity(num_games),
        moves_per_game: Vec::with_capacity(num_games),
    };
    for record in records {
        match record.winner {
            Some(name) => *result.wins.entry(name).or_insert(0) += 1,
            None => result.draws += 1,
        }
        result.game_durations_ms.push(record.elapsed_ms);
        result.moves_per_game.push(record.moves);
    }

    tracing::info!(
        games = num_games,
        draws = result.draws,
        wins = ?result.wins,
        "arena finished"
    );
    Ok(result)
}

fn play_one_game(
    (x_name, x_strategy): (&str, Strategy),
    (o_name, o_strategy): (&str, Strategy),
    seed: u64,
    board_size: usize,
) -> Result<GameRecord> {
    let config = MatchConfig {
        size: board_size,
        random_seed: Some(seed),
    };
    let mut game = Match::new(
        config,
        Player::new("p1", x_name, Marker::X, x_strategy),
        Player::new("p2", o_name, Marker::O, o_strategy),
        NullObserver,
    )?;

    let t0 = Instant::now();
    game.start()?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    let board = game.board();
    Ok(GameRecord {
        winner: game.winner().map(|p| p.display_name.clone()),
        moves: board.size() * board.size() - board.empty_cells().len(),
        elapsed_ms,
    })
}
