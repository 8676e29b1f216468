//! Polycard
//!
//! Plays a two-player polyomino card game from a TOML setup and prints the
//! final standings, or inspects the placement set of a single piece.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use polycard::config::{GameConfig, LogMode};
use polycard::grid::format_counts;
use polycard::pieces::{format_configurations, Piece};
use polycard::{GameManager, SetupError};

/// Plays a polyomino card game between two strategies.
#[derive(Parser)]
#[command(name = "polycard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a full game and print the outcome.
    Play(PlayArgs),
    /// Show every placement of a piece on the grid.
    Cube {
        /// Piece name from the configuration.
        piece: String,
        /// Game configuration file (built-in setup when omitted).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print each configuration instead of the per-cell sums.
        #[arg(long)]
        all: bool,
    },
}

#[derive(clap::Args, Default)]
struct PlayArgs {
    /// Game configuration file (built-in setup when omitted).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random choice.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of rounds to play.
    #[arg(long)]
    max_turns: Option<u32>,
    /// Log verbosity, overriding the configuration.
    #[arg(long, value_enum)]
    log_mode: Option<LogMode>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Play(args)) => run_game(args),
        Some(Command::Cube { piece, config, all }) => run_cube(&piece, config, all),
        None => run_game(PlayArgs::default()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<GameConfig, SetupError> {
    match path {
        Some(path) => GameConfig::from_file(path),
        None => GameConfig::builtin(),
    }
}

/// `RUST_LOG` wins over the configured mode.
fn init_tracing(mode: LogMode) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(mode.filter_directive())),
        )
        .with_target(false)
        .init();
}

fn run_game(args: PlayArgs) -> Result<(), SetupError> {
    let mut config = load_config(args.config)?;
    if let Some(seed) = args.seed {
        config.game.seed = Some(seed);
    }
    if let Some(max_turns) = args.max_turns {
        config.game.max_turns = max_turns;
    }
    init_tracing(args.log_mode.unwrap_or(config.logging.mode));

    let mut game = GameManager::new(&config)?;
    let outcome = game.run();
    println!("{outcome}");
    Ok(())
}

fn run_cube(name: &str, path: Option<PathBuf>, all: bool) -> Result<(), SetupError> {
    let config = load_config(path)?;
    init_tracing(config.logging.mode);

    let def = config.piece(name).ok_or_else(|| SetupError::UnknownPiece {
        name: name.to_string(),
        known: config
            .pieces
            .iter()
            .map(|def| def.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })?;
    let piece = Piece::from_def(def)?;
    print!("{}", cube_report(&piece, all));
    Ok(())
}

/// Configuration count and per-cell sums, or every configuration with `all`.
fn cube_report(piece: &Piece, all: bool) -> String {
    if all {
        return format_configurations(piece);
    }
    let configurations = piece.configurations();
    format!(
        "{} has {} configurations\n\nCell sums:\n{}",
        piece.name(),
        configurations.len(),
        format_counts(&configurations.cell_sums())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_piece(name: &str) -> Piece {
        let config = GameConfig::builtin().unwrap();
        Piece::from_def(config.piece(name).unwrap()).unwrap()
    }

    #[test]
    fn test_cube_report_for_line_2() {
        insta::assert_snapshot!(cube_report(&builtin_piece("line_2"), false), @r"
        line_2 has 40 configurations

        Cell sums:
        2 3 3 3 2
        3 4 4 4 3
        3 4 4 4 3
        3 4 4 4 3
        2 3 3 3 2
        ");
    }

    #[test]
    fn test_cube_report_lists_all_configurations() {
        let report = cube_report(&builtin_piece("big_square_4"), true);
        assert!(report.starts_with("big_square_4 has 16 configurations:"));
        assert_eq!(report.matches("Configuration ").count(), 16);
    }

    #[test]
    fn test_builtin_game_runs_with_seed() {
        let mut config = GameConfig::builtin().unwrap();
        config.game.seed = Some(3);
        config.game.max_turns = 5;

        let outcome = GameManager::new(&config).unwrap().run();
        assert_eq!(outcome.turns_played, 5);
        assert_eq!(outcome.players.len(), 2);
    }

    #[test]
    fn test_cli_parses_play_overrides() {
        let cli = Cli::parse_from(["polycard", "play", "--seed", "9", "--log-mode", "full-debug"]);
        let Some(Command::Play(args)) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.log_mode, Some(LogMode::FullDebug));
    }
}
