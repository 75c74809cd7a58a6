pub mod error;
pub mod models;
pub mod board;
pub mod bot_strategy;
pub mod minimax;
pub mod game_match;
pub mod arena;
pub mod bot_profiles;
