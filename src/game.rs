//! Game setup and the turn loop.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use tracing::{debug, info, instrument};

use crate::action::{ActionContext, Hand};
use crate::card::Card;
use crate::config::{GameConfig, GameParameters};
use crate::error::SetupError;
use crate::pieces::Piece;
use crate::strategy::Strategy;

/// Per-turn limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub actions_per_turn: u32,
    pub card_limit: usize,
    pub max_attempts: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            actions_per_turn: 3,
            card_limit: 1,
            max_attempts: 10,
        }
    }
}

impl Rules {
    /// Reads the limits from the game parameters, rejecting zeros.
    pub fn from_parameters(params: &GameParameters) -> Result<Self, SetupError> {
        if params.actions_per_turn == 0 {
            return Err(SetupError::Parameter {
                name: "actions_per_turn",
            });
        }
        if params.card_limit == 0 {
            return Err(SetupError::Parameter { name: "card_limit" });
        }
        if params.max_attempts == 0 {
            return Err(SetupError::Parameter {
                name: "max_attempts",
            });
        }
        Ok(Self {
            actions_per_turn: params.actions_per_turn,
            card_limit: params.card_limit,
            max_attempts: params.max_attempts,
        })
    }
}

/// Where new pieces and cards come from. Never runs out.
#[derive(Debug, Clone)]
pub struct Supply {
    catalogue: Vec<Piece>,
    /// Level-1 pieces, handed out by TakePiece. Never empty.
    starters: Vec<Piece>,
    /// Card templates, copied by TakeCard. Never empty.
    cards: Vec<Card>,
}

impl Supply {
    pub fn new(catalogue: Vec<Piece>, cards: Vec<Card>) -> Result<Self, SetupError> {
        let starters: Vec<Piece> = catalogue
            .iter()
            .filter(|piece| piece.level() == 1)
            .cloned()
            .collect();
        if starters.is_empty() {
            return Err(SetupError::NoStarterPiece);
        }
        if cards.is_empty() {
            return Err(SetupError::NoCards);
        }
        Ok(Self {
            catalogue,
            starters,
            cards,
        })
    }

    /// A random level-1 piece.
    pub fn draw_piece(&self, rng: &mut StdRng) -> Piece {
        self.starters[rng.random_range(0..self.starters.len())].clone()
    }

    /// A fresh copy of a random card template.
    pub fn draw_card(&self, rng: &mut StdRng) -> Card {
        self.cards[rng.random_range(0..self.cards.len())].clone()
    }

    /// The piece every player starts with: the first level-1 piece.
    pub fn starter(&self) -> &Piece {
        &self.starters[0]
    }

    pub fn piece_named(&self, name: &str) -> Option<&Piece> {
        self.catalogue.iter().find(|piece| piece.name() == name)
    }

    pub fn catalogue(&self) -> &[Piece] {
        &self.catalogue
    }
}

/// What one player did in one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    pub turn: u32,
    pub player: String,
    pub actions: u32,
    pub active_cards: usize,
    pub completed_cards: usize,
    pub points: u32,
}

impl fmt::Display for TurnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "turn {}: {} spent {} actions, {} active cards, {} completed, {} points",
            self.turn,
            self.player,
            self.actions,
            self.active_cards,
            self.completed_cards,
            self.points
        )
    }
}

pub struct Player {
    name: String,
    hand: Hand,
    strategy: Box<dyn Strategy>,
}

impl Player {
    /// A player holding one copy of the supply's starter piece.
    pub fn new(name: impl Into<String>, strategy: Box<dyn Strategy>, supply: &Supply) -> Self {
        Self {
            name: name.into(),
            hand: Hand::new(vec![supply.starter().clone()]),
            strategy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategy = strategy;
    }

    /// Plays one turn, collecting full cards before and after.
    pub fn play_turn(
        &mut self,
        turn: u32,
        supply: &Supply,
        rules: &Rules,
        rng: &mut StdRng,
    ) -> TurnSummary {
        self.hand.collect_full_cards(supply);
        let mut ctx = ActionContext::new(&mut self.hand, supply, rules, rng);
        let actions = self.strategy.play_turn(&mut ctx, rules.actions_per_turn);
        self.hand.collect_full_cards(supply);

        TurnSummary {
            turn,
            player: self.name.clone(),
            actions,
            active_cards: self.hand.cards.len(),
            completed_cards: self.hand.completed.len(),
            points: self.hand.points(),
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("strategy", &self.strategy.name())
            .field("hand", &self.hand)
            .finish()
    }
}

/// Turn counter. Turns are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    current_turn: u32,
    max_turns: u32,
}

impl GameState {
    pub fn new(max_turns: u32) -> Self {
        Self::with_turn(1, max_turns)
    }

    pub fn with_turn(current_turn: u32, max_turns: u32) -> Self {
        Self {
            current_turn,
            max_turns,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current_turn <= self.max_turns
    }

    pub fn next_turn(&mut self) {
        self.current_turn += 1;
    }

    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }
}

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerResult {
    pub name: String,
    pub completed_cards: usize,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub turns_played: u32,
    pub players: Vec<PlayerResult>,
}

impl GameOutcome {
    /// The player with the most points, or `None` on a tie for first.
    pub fn leader(&self) -> Option<&PlayerResult> {
        let best = self.players.iter().map(|player| player.points).max()?;
        let mut leaders = self.players.iter().filter(|player| player.points == best);
        let leader = leaders.next()?;
        leaders.next().is_none().then_some(leader)
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game over after {} turns", self.turns_played)?;
        for player in &self.players {
            writeln!(
                f,
                "  {}: {} cards completed, {} points",
                player.name, player.completed_cards, player.points
            )?;
        }
        match self.leader() {
            Some(leader) => write!(f, "Winner: {}", leader.name),
            None => write!(f, "Draw"),
        }
    }
}

/// Owns the players, the supply and the random source for one game.
#[derive(Debug)]
pub struct GameManager {
    players: Vec<Player>,
    supply: Supply,
    rules: Rules,
    state: GameState,
    rng: StdRng,
}

impl GameManager {
    /// Builds a game from configuration, validating every record.
    #[instrument(skip_all, fields(players = config.players.len(), pieces = config.pieces.len()))]
    pub fn new(config: &GameConfig) -> Result<Self, SetupError> {
        if config.players.len() != 2 {
            return Err(SetupError::PlayerCount {
                count: config.players.len(),
            });
        }
        if config.game.max_turns == 0 {
            return Err(SetupError::Parameter { name: "max_turns" });
        }
        let rules = Rules::from_parameters(&config.game)?;

        let mut names = FxHashSet::default();
        let mut catalogue = Vec::with_capacity(config.pieces.len());
        for def in &config.pieces {
            if !names.insert(def.name.as_str()) {
                return Err(SetupError::DuplicatePiece {
                    name: def.name.clone(),
                });
            }
            catalogue.push(Piece::from_def(def)?);
        }

        let mut cards = Vec::with_capacity(config.cards.len());
        for (index, def) in config.cards.iter().enumerate() {
            if let Some(piece) = &def.reward.piece {
                if !names.contains(piece.as_str()) {
                    return Err(SetupError::UnknownRewardPiece {
                        index,
                        piece: piece.clone(),
                    });
                }
            }
            cards.push(Card::from_def(def, index)?);
        }

        let supply = Supply::new(catalogue, cards)?;
        let rng = match config.game.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let players = config
            .players
            .iter()
            .map(|def| Player::new(def.name.clone(), def.strategy.build(), &supply))
            .collect();

        debug!(seed = ?config.game.seed, ?rules, "game configured");
        Ok(Self::from_parts(
            players,
            supply,
            rules,
            GameState::new(config.game.max_turns),
            rng,
        ))
    }

    /// Assembles a game from ready-made parts.
    pub fn from_parts(
        players: Vec<Player>,
        supply: Supply,
        rules: Rules,
        state: GameState,
        rng: StdRng,
    ) -> Self {
        Self {
            players,
            supply,
            rules,
            state,
            rng,
        }
    }

    /// Plays rounds until the turn limit and returns the final standings.
    #[instrument(skip(self), fields(max_turns = self.state.max_turns()))]
    pub fn run(&mut self) -> GameOutcome {
        info!(
            players = ?self.players.iter().map(Player::name).collect::<Vec<_>>(),
            "game started"
        );
        while self.state.is_running() {
            self.play_round();
        }

        let outcome = self.outcome();
        info!(leader = ?outcome.leader().map(|player| &player.name), "game finished");
        outcome
    }

    /// Lets every player take one turn, then advances the turn counter.
    pub fn play_round(&mut self) -> Vec<TurnSummary> {
        let turn = self.state.current_turn();
        let summaries = self
            .players
            .iter_mut()
            .map(|player| {
                let summary = player.play_turn(turn, &self.supply, &self.rules, &mut self.rng);
                info!("{summary}");
                summary
            })
            .collect();
        self.state.next_turn();
        summaries
    }

    /// Standings as of now.
    pub fn outcome(&self) -> GameOutcome {
        GameOutcome {
            turns_played: self.state.current_turn().saturating_sub(1),
            players: self
                .players
                .iter()
                .map(|player| PlayerResult {
                    name: player.name().to_string(),
                    completed_cards: player.hand().completed.len(),
                    points: player.hand().points(),
                })
                .collect(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn supply(&self) -> &Supply {
        &self.supply
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::tests::tall_card;
    use crate::strategy::{GreedyStrategy, RandomStrategy, StrategyKind};

    fn config(max_turns: u32) -> GameConfig {
        let mut config = GameConfig::builtin().unwrap();
        config.game.max_turns = max_turns;
        config.game.seed = Some(42);
        config
    }

    fn greedy_game(max_turns: u32) -> GameManager {
        let mut config = config(max_turns);
        for player in &mut config.players {
            player.strategy = StrategyKind::Greedy;
        }
        GameManager::new(&config).unwrap()
    }

    #[test]
    fn test_greedy_game_plays_every_turn() {
        let mut game = greedy_game(3);
        let mut turns = 0;
        while game.state().is_running() {
            let summaries = game.play_round();
            assert_eq!(summaries.len(), 2);
            turns += summaries.len();
        }

        assert_eq!(turns, 6);
        assert_eq!(game.state().current_turn(), 4);
        assert!(!game.state().is_running());
    }

    #[test]
    fn test_run_reports_outcome() {
        let mut game = greedy_game(3);
        let outcome = game.run();

        assert_eq!(outcome.turns_played, 3);
        assert_eq!(outcome.players.len(), 2);
        assert_eq!(outcome.players[0].name, "Ada");
        assert_eq!(game.state().current_turn(), 4);
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let first = GameManager::new(&config(8)).unwrap().run();
        let second = GameManager::new(&config(8)).unwrap().run();
        assert_eq!(first, second);
    }

    #[test]
    fn test_players_start_with_starter_piece() {
        let game = greedy_game(1);
        for player in game.players() {
            assert_eq!(player.hand().pieces.len(), 1);
            assert_eq!(player.hand().pieces[0].level(), 1);
            assert!(player.hand().cards.is_empty());
        }
    }

    #[test]
    fn test_player_count_is_checked() {
        let mut config = config(3);
        config.players.pop();
        assert!(matches!(
            GameManager::new(&config),
            Err(SetupError::PlayerCount { count: 1 })
        ));
    }

    #[test]
    fn test_zero_parameters_are_rejected() {
        let mut config = config(0);
        assert!(matches!(
            GameManager::new(&config),
            Err(SetupError::Parameter { name: "max_turns" })
        ));

        config.game.max_turns = 2;
        config.game.card_limit = 0;
        assert!(matches!(
            GameManager::new(&config),
            Err(SetupError::Parameter { name: "card_limit" })
        ));
    }

    #[test]
    fn test_duplicate_piece_is_rejected() {
        let mut config = config(3);
        let duplicate = config.pieces[0].clone();
        config.pieces.push(duplicate);
        assert!(matches!(
            GameManager::new(&config),
            Err(SetupError::DuplicatePiece { .. })
        ));
    }

    #[test]
    fn test_unknown_reward_piece_is_rejected() {
        let mut config = config(3);
        config.cards[1].reward.piece = Some("pentomino".to_string());
        let err = GameManager::new(&config).unwrap_err();
        assert_eq!(err.to_string(), "card 1 rewards unknown piece \"pentomino\"");
    }

    #[test]
    fn test_supply_needs_starter_and_cards() {
        let square = Piece::square();
        assert!(matches!(
            Supply::new(vec![square.clone()], Vec::new()),
            Err(SetupError::NoCards)
        ));
        assert!(matches!(
            Supply::new(Vec::new(), vec![tall_card()]),
            Err(SetupError::NoStarterPiece)
        ));

        let supply = Supply::new(vec![square], vec![tall_card()]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(supply.draw_piece(&mut rng).name(), "square_1");
        assert!(supply.draw_card(&mut rng).occupied_cells().is_empty());
        assert!(supply.piece_named("square_1").is_some());
        assert_eq!(supply.catalogue().len(), 1);
    }

    #[test]
    fn test_game_from_parts_with_custom_strategies() {
        let supply = Supply::new(vec![Piece::square()], vec![tall_card()]).unwrap();
        let players = vec![
            Player::new("Ada", Box::new(GreedyStrategy), &supply),
            Player::new("Grace", Box::new(RandomStrategy::new()), &supply),
        ];
        let mut game = GameManager::from_parts(
            players,
            supply,
            Rules::default(),
            GameState::new(6),
            StdRng::seed_from_u64(17),
        );
        game.players_mut()[1].set_strategy(Box::new(GreedyStrategy));
        assert_eq!(game.players()[1].strategy_name(), "greedy");

        let outcome = game.run();
        assert_eq!(outcome.turns_played, 6);
        // greedy fills a 6-cell card with squares within six turns
        assert!(outcome.players.iter().all(|player| player.completed_cards >= 1));
    }

    #[test]
    fn test_outcome_before_first_turn_counts_nothing() {
        let supply = Supply::new(vec![Piece::square()], vec![tall_card()]).unwrap();
        let players = vec![
            Player::new("Ada", Box::new(GreedyStrategy), &supply),
            Player::new("Grace", Box::new(GreedyStrategy), &supply),
        ];
        let game = GameManager::from_parts(
            players,
            supply,
            Rules::default(),
            GameState::with_turn(0, 3),
            StdRng::seed_from_u64(2),
        );
        assert_eq!(game.outcome().turns_played, 0);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = GameOutcome {
            turns_played: 3,
            players: vec![
                PlayerResult {
                    name: "Ada".to_string(),
                    completed_cards: 2,
                    points: 3,
                },
                PlayerResult {
                    name: "Grace".to_string(),
                    completed_cards: 1,
                    points: 1,
                },
            ],
        };
        insta::assert_snapshot!(outcome.to_string(), @r"
        Game over after 3 turns
          Ada: 2 cards completed, 3 points
          Grace: 1 cards completed, 1 points
        Winner: Ada
        ");
    }

    #[test]
    fn test_tied_outcome_has_no_leader() {
        let result = |name: &str| PlayerResult {
            name: name.to_string(),
            completed_cards: 0,
            points: 0,
        };
        let outcome = GameOutcome {
            turns_played: 1,
            players: vec![result("Ada"), result("Grace")],
        };
        assert!(outcome.leader().is_none());
        assert!(outcome.to_string().ends_with("Draw"));
    }
}
