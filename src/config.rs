//! Game configuration records.
//!
//! Plain serde records loaded from TOML. Nothing here knows about geometry;
//! `GameManager::new` turns the records into pieces, cards and players and
//! reports anything malformed as a `SetupError`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::SetupError;
use crate::strategy::StrategyKind;

/// Configuration embedded in the binary, used when no file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../configs/default.toml");

/// Complete game setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub game: GameParameters,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub players: Vec<PlayerDef>,
    pub pieces: Vec<PieceDef>,
    pub cards: Vec<CardDef>,
}

impl GameConfig {
    /// Parses a configuration from TOML text.
    ///
    /// `origin` names the source in error messages.
    pub fn from_toml(text: &str, origin: &str) -> Result<Self, SetupError> {
        toml::from_str(text).map_err(|source| SetupError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Loads a configuration file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        debug!("Loading config from file");
        let text = std::fs::read_to_string(path).map_err(|source| SetupError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml(&text, &path.display().to_string())?;
        info!(
            pieces = config.pieces.len(),
            cards = config.cards.len(),
            "Config loaded"
        );
        Ok(config)
    }

    /// The embedded default configuration.
    pub fn builtin() -> Result<Self, SetupError> {
        Self::from_toml(DEFAULT_CONFIG, "built-in configuration")
    }

    /// Looks up a piece definition by name.
    pub fn piece(&self, name: &str) -> Option<&PieceDef> {
        self.pieces.iter().find(|piece| piece.name == name)
    }
}

/// Turn and rule parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParameters {
    pub max_turns: u32,
    /// Seed for every random choice in the game; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_actions_per_turn")]
    pub actions_per_turn: u32,
    /// How many active cards a player may hold before TakeCard is refused.
    #[serde(default = "default_card_limit")]
    pub card_limit: usize,
    /// Bound on consecutive failed attempts within one turn.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_actions_per_turn() -> u32 {
    3
}

fn default_card_limit() -> usize {
    1
}

fn default_max_attempts() -> u32 {
    10
}

/// How much the game logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// Game start, per-turn summaries and the outcome.
    #[default]
    Normal,
    /// Adds every action attempt.
    Detailed,
    /// Adds action resolution and geometry internals.
    FullDebug,
}

impl LogMode {
    /// `EnvFilter` directive for this crate at this verbosity.
    pub fn filter_directive(self) -> &'static str {
        match self {
            LogMode::Normal => "polycard=info",
            LogMode::Detailed => "polycard=debug",
            LogMode::FullDebug => "polycard=trace",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub mode: LogMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDef {
    pub name: String,
    #[serde(default)]
    pub strategy: StrategyKind,
}

/// A piece as written in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceDef {
    pub name: String,
    pub level: u32,
    pub shape: Vec<Vec<Cell>>,
}

/// A card as written in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDef {
    pub mask: Vec<Vec<Cell>>,
    #[serde(default)]
    pub reward: RewardDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardDef {
    #[serde(default)]
    pub points: u32,
    /// Name of the piece granted on completion.
    #[serde(default)]
    pub piece: Option<String>,
}

/// One matrix entry; configs write either `0`/`1` or `true`/`false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Flag(bool),
    Count(u8),
}

impl Cell {
    pub fn is_set(self) -> bool {
        match self {
            Cell::Flag(flag) => flag,
            Cell::Count(count) => count != 0,
        }
    }
}

/// Converts a configured matrix into booleans.
pub fn cells_to_rows(matrix: &[Vec<Cell>]) -> Vec<Vec<bool>> {
    matrix
        .iter()
        .map(|row| row.iter().map(|cell| cell.is_set()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [game]
        max_turns = 4

        [[players]]
        name = "Ada"

        [[players]]
        name = "Grace"
        strategy = "random"

        [[pieces]]
        name = "square_1"
        level = 1
        shape = [[1, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0], [0, 0, 0, 0, 0]]

        [[cards]]
        mask = [
            [false, false, true, true, false],
            [false, false, true, true, false],
            [false, false, false, false, false],
            [false, false, false, false, false],
            [false, false, false, false, false],
        ]
        reward = { points = 2, piece = "square_1" }
    "#;

    #[test]
    fn test_parses_minimal_config_with_defaults() {
        let config = GameConfig::from_toml(MINIMAL, "test").unwrap();

        assert_eq!(config.game.max_turns, 4);
        assert_eq!(config.game.seed, None);
        assert_eq!(config.game.actions_per_turn, 3);
        assert_eq!(config.game.card_limit, 1);
        assert_eq!(config.game.max_attempts, 10);
        assert_eq!(config.logging.mode, LogMode::Normal);
        assert_eq!(config.players[0].strategy, StrategyKind::Greedy);
        assert_eq!(config.players[1].strategy, StrategyKind::Random);
        assert_eq!(config.cards[0].reward.points, 2);
        assert_eq!(config.cards[0].reward.piece.as_deref(), Some("square_1"));
        assert!(config.piece("square_1").is_some());
        assert!(config.piece("line_2").is_none());
    }

    #[test]
    fn test_cells_accept_flags_and_counts() {
        let config = GameConfig::from_toml(MINIMAL, "test").unwrap();

        let shape = cells_to_rows(&config.pieces[0].shape);
        assert!(shape[0][0]);
        assert!(!shape[0][1]);

        let mask = cells_to_rows(&config.cards[0].mask);
        assert_eq!(mask[0], vec![false, false, true, true, false]);
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = GameConfig::from_toml("[game]\nmax_turns = \"many\"", "broken.toml").unwrap_err();
        assert!(matches!(err, SetupError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse broken.toml"));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = GameConfig::from_file("/nonexistent/polycard.toml").unwrap_err();
        assert!(matches!(err, SetupError::Read { .. }));
    }

    #[test]
    fn test_builtin_config_parses() {
        let config = GameConfig::builtin().unwrap();
        assert_eq!(config.players.len(), 2);
        assert!(config.pieces.iter().any(|piece| piece.level == 1));
        assert!(!config.cards.is_empty());
    }

    #[test]
    fn test_log_mode_directives() {
        assert_eq!(LogMode::Normal.filter_directive(), "polycard=info");
        assert_eq!(LogMode::FullDebug.filter_directive(), "polycard=trace");
    }
}
