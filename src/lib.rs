//! N×N tic-tac-toe engine with pluggable move strategies.
//!
//! The [`engine::game_match::Match`] state machine owns a
//! [`engine::board::Board`] and two players, each bound to a
//! [`engine::bot_strategy::Strategy`]. Presentation layers implement
//! [`engine::game_match::MatchObserver`] and forward clicks through
//! [`engine::game_match::Match::activate_cell`].

pub mod engine;
