//! Setup errors.
//!
//! Everything that can go wrong while turning configuration records into game
//! objects. These are fatal: the caller gets them back from a constructor and
//! nothing is retried. Invalid moves during play are plain `bool`s, and broken
//! invariants between validation and application panic.

use derive_more::{Display, Error};

/// Error raised while building pieces, cards or a game from configuration.
#[derive(Debug, Display, Error)]
pub enum SetupError {
    /// A matrix does not have the crate-wide grid dimensions.
    #[display("{what} must be {expected}x{expected}, got {rows} rows with a {cols}-wide row")]
    Dimensions {
        what: String,
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// A piece shape has no occupied cell.
    #[display("piece {name:?} has no occupied cell")]
    EmptyShape { name: String },

    /// A card mask has no playable cell.
    #[display("card {index} has no playable cell")]
    EmptyMask { index: usize },

    /// A card reward names a piece that is not in the catalogue.
    #[display("card {index} rewards unknown piece {piece:?}")]
    UnknownRewardPiece { index: usize, piece: String },

    /// A piece was asked for by name but is not in the catalogue.
    #[display("unknown piece {name:?}, known pieces: {known}")]
    UnknownPiece { name: String, known: String },

    /// A piece name is defined twice.
    #[display("piece {name:?} is defined more than once")]
    DuplicatePiece { name: String },

    /// The game needs exactly two players.
    #[display("expected 2 players, got {count}")]
    PlayerCount { count: usize },

    /// The supply has nothing to hand out for TakePiece.
    #[display("no level-1 piece in the catalogue")]
    NoStarterPiece,

    /// The supply has nothing to hand out for TakeCard.
    #[display("no card defined")]
    NoCards,

    /// A numeric game parameter is out of range.
    #[display("game parameter {name} must be at least 1")]
    Parameter { name: &'static str },

    /// The configuration file could not be read.
    #[display("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for a game.
    #[display("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        source: toml::de::Error,
    },
}
