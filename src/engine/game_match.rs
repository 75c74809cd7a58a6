//! Turn state machine for one match between two players.
//!
//! The match owns the board and both players. When the active player is a
//! bot, its move is computed and applied inside the call that handed it the
//! turn, so bot-vs-bot play runs to completion synchronously. A Human player
//! suspends the match until [`Match::activate_cell`] or [`Match::submit_move`]
//! is called from outside.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::board::Board;
use crate::engine::bot_strategy::Strategy;
use crate::engine::error::{GameError, MoveRejection, Result};
use crate::engine::minimax::MinimaxParams;
use crate::engine::models::*;

/// Receives notifications from a match. All methods default to doing nothing.
pub trait MatchObserver {
    fn on_message(&mut self, _text: &str) {}
    fn on_cell_changed(&mut self, _row: usize, _col: usize, _marker: Marker) {}
    fn on_players_changed(&mut self, _p1: &Player, _p2: &Player) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl MatchObserver for NullObserver {}

/// Observer that keeps every notification in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<MatchEvent>,
}

impl EventLog {
    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MatchEvent::Message { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn cell_changes(&self) -> Vec<(usize, usize, Marker)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MatchEvent::CellChanged { row, col, marker } => Some((*row, *col, *marker)),
                _ => None,
            })
            .collect()
    }

    pub fn players_changed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, MatchEvent::PlayersChanged { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl MatchObserver for EventLog {
    fn on_message(&mut self, text: &str) {
        self.events.push(MatchEvent::Message { text: text.to_string() });
    }

    fn on_cell_changed(&mut self, row: usize, col: usize, marker: Marker) {
        self.events.push(MatchEvent::CellChanged { row, col, marker });
    }

    fn on_players_changed(&mut self, p1: &Player, p2: &Player) {
        self.events.push(MatchEvent::PlayersChanged {
            players: vec![p1.clone(), p2.clone()],
        });
    }
}

/// Internal status; players are referenced by seat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    InProgress(usize),
    Won(usize),
    Draw,
}

pub struct Match<O: MatchObserver = NullObserver> {
    config: MatchConfig,
    board: Board,
    players: [Player; 2],
    status: Status,
    rng: StdRng,
    observer: O,
}

fn x_holder(players: &[Player; 2]) -> usize {
    if players[0].marker == Marker::X {
        0
    } else {
        1
    }
}

impl<O: MatchObserver> Match<O> {
    /// Create a match. Nothing is played until [`Match::start`].
    ///
    /// If both players were given the same marker, the second player is
    /// switched to the other one.
    pub fn new(config: MatchConfig, p1: Player, mut p2: Player, observer: O) -> Result<Self> {
        let board = Board::new(config.size)?;
        if p1.marker == p2.marker {
            tracing::warn!(
                p1 = %p1.player_id,
                p2 = %p2.player_id,
                marker = %p1.marker,
                "players share a marker, flipping the second"
            );
            p2.marker = p1.marker.opponent();
        }
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let players = [p1, p2];
        let status = Status::InProgress(x_holder(&players));
        Ok(Self {
            config,
            board,
            players,
            status,
            rng,
            observer,
        })
    }

    /// Human "Player 1" (X) against a Minimax "Player 2" (O) on a 3×3 board.
    pub fn with_defaults(observer: O) -> Result<Self> {
        Self::new(
            MatchConfig::default(),
            Player::new("p1", "Player 1", Marker::X, Strategy::Human),
            Player::new("p2", "Player 2", Marker::O, Strategy::Minimax(MinimaxParams::default())),
            observer,
        )
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn state(&self) -> MatchState {
        match self.status {
            Status::InProgress(idx) => MatchState::InProgress {
                active: self.players[idx].player_id.clone(),
            },
            Status::Won(idx) => MatchState::Won {
                winner: self.players[idx].player_id.clone(),
            },
            Status::Draw => MatchState::Draw,
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self.status, Status::InProgress(_))
    }

    pub fn active_player(&self) -> Option<&Player> {
        match self.status {
            Status::InProgress(idx) => Some(&self.players[idx]),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&Player> {
        match self.status {
            Status::Won(idx) => Some(&self.players[idx]),
            _ => None,
        }
    }

    fn seat(&self, player_id: &str) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.player_id == player_id)
            .ok_or_else(|| GameError::UnknownPlayerId(player_id.to_string()))
    }

    pub fn player(&self, player_id: &str) -> Result<&Player> {
        Ok(&self.players[self.seat(player_id)?])
    }

    /// Snapshot of the whole match for a presentation layer.
    pub fn to_view(&self) -> serde_json::Value {
        serde_json::json!({
            "board": self.board,
            "state": self.state(),
            "players": self.players,
        })
    }

    /// Hand the opening turn to the active player.
    pub fn start(&mut self) -> Result<()> {
        tracing::info!(
            size = self.board.size(),
            p1 = %self.players[0].display_name,
            p1_strategy = %self.players[0].strategy.kind(),
            p2 = %self.players[1].display_name,
            p2_strategy = %self.players[1].strategy.kind(),
            "match started"
        );
        self.take_turns()
    }

    /// Throw the board away and play again with the same players.
    /// The holder of X moves first; scores carry over.
    pub fn new_round(&mut self) -> Result<()> {
        self.board = Board::new(self.config.size)?;
        self.status = Status::InProgress(x_holder(&self.players));
        self.start()
    }

    /// Place the active player's marker, then let any bots that follow play.
    pub fn submit_move(&mut self, row: usize, col: usize) -> Result<()> {
        self.apply_move(row, col)?;
        self.take_turns()
    }

    /// A click on a cell. Only counts when a Human player is to move.
    pub fn activate_cell(&mut self, row: usize, col: usize) -> Result<()> {
        let human_to_move = self
            .active_player()
            .is_some_and(|p| p.strategy.is_human());
        if !human_to_move {
            tracing::debug!(row, col, "cell activation ignored: no human to move");
            return Ok(());
        }
        self.submit_move(row, col)
    }

    pub fn set_player_name(&mut self, player_id: &str, name: impl Into<String>) -> Result<()> {
        let seat = self.seat(player_id)?;
        self.players[seat].display_name = name.into();
        self.notify_players_changed();
        Ok(())
    }

    /// Give `player_id` `marker`; the other player takes the remaining one.
    pub fn set_player_marker(&mut self, player_id: &str, marker: Marker) -> Result<()> {
        let seat = self.seat(player_id)?;
        if self.players[seat].marker == marker {
            return Ok(());
        }
        self.players[seat].marker = marker;
        self.players[1 - seat].marker = marker.opponent();
        self.notify_players_changed();
        Ok(())
    }

    /// Rebind a strategy. If that player is to move, it moves now.
    pub fn set_player_strategy(&mut self, player_id: &str, strategy: Strategy) -> Result<()> {
        let seat = self.seat(player_id)?;
        self.players[seat].strategy = strategy;
        self.notify_players_changed();
        if self.status == Status::InProgress(seat) {
            self.take_turns()?;
        }
        Ok(())
    }

    fn notify_players_changed(&mut self) {
        self.observer
            .on_players_changed(&self.players[0], &self.players[1]);
    }

    fn apply_move(&mut self, row: usize, col: usize) -> Result<()> {
        let Status::InProgress(seat) = self.status else {
            return Err(GameError::InvalidMove(MoveRejection::MatchOver));
        };
        let marker = self.players[seat].marker;
        self.board
            .set_marker(row, col, marker)
            .map_err(GameError::into_invalid_move)?;
        tracing::debug!(player = %self.players[seat].player_id, row, col, %marker, "move applied");
        self.observer.on_cell_changed(row, col, marker);

        if self.board.winner() == Some(marker) {
            let winner = &mut self.players[seat];
            winner.score += 1;
            self.status = Status::Won(seat);
            tracing::info!(winner = %winner.player_id, score = winner.score, "match won");
            let message = format!("{} wins!", winner.display_name);
            self.observer.on_message(&message);
        } else if self.board.is_full() {
            self.status = Status::Draw;
            tracing::info!("match drawn");
            self.observer.on_message("It's a draw.");
        } else {
            self.status = Status::InProgress(1 - seat);
        }
        Ok(())
    }

    /// Play bot turns until a Human is to move or the match ends.
    fn take_turns(&mut self) -> Result<()> {
        while let Status::InProgress(seat) = self.status {
            let player = &self.players[seat];
            if player.strategy.is_human() {
                let message = format!("{}'s turn!", player.display_name);
                self.observer.on_message(&message);
                return Ok(());
            }

            let me = player.marker;
            let chosen = player
                .strategy
                .select_move(&self.board, me, me.opponent(), &mut self.rng)?;
            let Some(pos) = chosen else {
                return Err(GameError::IllegalStrategyResult {
                    player: player.player_id.clone(),
                });
            };
            tracing::debug!(
                player = %player.player_id,
                strategy = %player.strategy.kind(),
                %pos,
                "bot chose move"
            );
            self.apply_move(pos.row, pos.col)?;
        }
        Ok(())
    }
}
