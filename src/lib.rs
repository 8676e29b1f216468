//! Polyomino card game engine.
//!
//! Players collect polyomino pieces and cards, then fill each card's playable
//! cells with pieces. Every piece carries the precomputed set of all its
//! placements on the 5x5 grid, so a move is a bitmask check against the card.

pub mod action;
pub mod card;
pub mod config;
pub mod configurations;
pub mod error;
pub mod game;
pub mod geometry;
pub mod grid;
pub mod pieces;
pub mod strategy;

pub use action::{Action, ActionContext, ActionKind, Hand, ResolvedAction};
pub use card::{Card, Reward};
pub use config::{GameConfig, LogMode};
pub use configurations::{Configuration, ConfigurationSet};
pub use error::SetupError;
pub use game::{GameManager, GameOutcome, GameState, Player, Rules, Supply, TurnSummary};
pub use pieces::{Piece, Shape};
pub use strategy::{GreedyStrategy, RandomStrategy, Strategy, StrategyKind};
