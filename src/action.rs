//! Player actions.
//!
//! An action runs in three steps:
//! - `Action::resolve` fills in any piece or card the caller left unset, by
//!   random choice from the player's hand
//! - `ResolvedAction::is_valid` is a pure check against the hand and rules
//! - `ResolvedAction::perform` applies the action, and panics if it was not
//!   valid, since that means the check and the application disagree
//!
//! Strategies usually call `Action::execute`, which chains all three.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use strum::{Display, EnumIter};
use tracing::{debug, trace, warn};

use crate::card::Card;
use crate::configurations::Configuration;
use crate::game::{Rules, Supply};
use crate::pieces::Piece;

/// The five kinds of action a player can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ActionKind {
    #[strum(to_string = "take a piece")]
    TakePiece,
    #[strum(to_string = "place a piece")]
    PlacePiece,
    #[strum(to_string = "take a card")]
    TakeCard,
    #[strum(to_string = "upgrade a piece")]
    UpgradePiece,
    #[strum(to_string = "master")]
    Master,
}

/// Everything a player owns.
#[derive(Clone, Debug, Default)]
pub struct Hand {
    /// Pieces available to place; the last one is the most recently acquired.
    pub pieces: Vec<Piece>,
    /// Cards being filled.
    pub cards: Vec<Card>,
    /// Cards already completed.
    pub completed: Vec<Card>,
}

impl Hand {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self {
            pieces,
            ..Self::default()
        }
    }

    /// Points from completed cards.
    pub fn points(&self) -> u32 {
        self.completed.iter().map(|card| card.reward().points).sum()
    }

    /// Moves full cards to the completed pile.
    ///
    /// Pieces placed on a completed card come back to the hand, followed by
    /// the card's reward piece. Returns how many cards this call completed.
    pub fn collect_full_cards(&mut self, supply: &Supply) -> usize {
        let (full, active): (Vec<Card>, Vec<Card>) =
            std::mem::take(&mut self.cards).into_iter().partition(Card::is_full);
        self.cards = active;
        let collected = full.len();

        for mut card in full {
            self.pieces.extend(card.take_placed_pieces());
            if let Some(name) = card.reward().piece.as_deref() {
                match supply.piece_named(name) {
                    Some(piece) => self.pieces.push(piece.clone()),
                    None => warn!(piece = name, "reward piece not in catalogue"),
                }
            }
            debug!(points = card.reward().points, "card completed");
            self.completed.push(card);
        }

        collected
    }
}

/// What an action may touch, borrowed for one call.
pub struct ActionContext<'a> {
    pub hand: &'a mut Hand,
    pub supply: &'a Supply,
    pub rules: &'a Rules,
    pub rng: &'a mut StdRng,
}

impl<'a> ActionContext<'a> {
    pub fn new(hand: &'a mut Hand, supply: &'a Supply, rules: &'a Rules, rng: &'a mut StdRng) -> Self {
        Self {
            hand,
            supply,
            rules,
            rng,
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut *self.rng
    }
}

/// An action with optional, not yet resolved inputs.
///
/// Piece and card inputs are indices into the acting hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    TakePiece,
    PlacePiece {
        piece: Option<usize>,
        card: Option<usize>,
        configuration: Option<Configuration>,
    },
    TakeCard,
    /// Reserved for piece upgrades; never changes state.
    UpgradePiece { piece: Option<usize> },
    /// Reserved for end-game scoring; never changes state.
    Master,
}

impl Action {
    /// An action of `kind` with every input left to resolution.
    pub fn unresolved(kind: ActionKind) -> Self {
        match kind {
            ActionKind::TakePiece => Action::TakePiece,
            ActionKind::PlacePiece => Action::PlacePiece {
                piece: None,
                card: None,
                configuration: None,
            },
            ActionKind::TakeCard => Action::TakeCard,
            ActionKind::UpgradePiece => Action::UpgradePiece { piece: None },
            ActionKind::Master => Action::Master,
        }
    }

    /// Places hand piece `piece` on hand card `card`, at a random valid spot.
    pub fn place(piece: usize, card: usize) -> Self {
        Action::PlacePiece {
            piece: Some(piece),
            card: Some(card),
            configuration: None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::TakePiece => ActionKind::TakePiece,
            Action::PlacePiece { .. } => ActionKind::PlacePiece,
            Action::TakeCard => ActionKind::TakeCard,
            Action::UpgradePiece { .. } => ActionKind::UpgradePiece,
            Action::Master => ActionKind::Master,
        }
    }

    /// Picks a random piece and card from the hand for unset inputs.
    ///
    /// Returns `None` when an input cannot be picked because the hand has no
    /// piece or no card. Explicit inputs are kept as given, even out of range;
    /// validation rejects those.
    pub fn resolve(&self, hand: &Hand, rng: &mut StdRng) -> Option<ResolvedAction> {
        let resolved = match *self {
            Action::TakePiece => ResolvedAction::TakePiece,
            Action::PlacePiece {
                piece,
                card,
                configuration,
            } => ResolvedAction::PlacePiece {
                piece: pick_index(piece, hand.pieces.len(), rng)?,
                card: pick_index(card, hand.cards.len(), rng)?,
                configuration,
            },
            Action::TakeCard => ResolvedAction::TakeCard,
            Action::UpgradePiece { piece } => ResolvedAction::UpgradePiece {
                piece: pick_index(piece, hand.pieces.len(), rng)?,
            },
            Action::Master => ResolvedAction::Master,
        };
        trace!(action = %self, resolved = %resolved, "resolved action");
        Some(resolved)
    }

    /// Resolves the action and checks it, without applying it.
    pub fn is_valid(&self, ctx: &mut ActionContext<'_>) -> bool {
        self.resolve(ctx.hand, ctx.rng)
            .is_some_and(|resolved| resolved.is_valid(ctx.hand, ctx.rules))
    }

    /// Resolves, checks and applies the action.
    ///
    /// Returns true if the action was applied, false if it was not valid.
    pub fn execute(&self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(resolved) = self.resolve(ctx.hand, ctx.rng) else {
            debug!(action = %self, "nothing to act on");
            return false;
        };
        if !resolved.is_valid(ctx.hand, ctx.rules) {
            debug!(action = %resolved.describe(ctx.hand), "action not valid");
            return false;
        }

        debug!(action = %resolved.describe(ctx.hand), "performing");
        resolved.perform(ctx);
        true
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::PlacePiece {
                piece: Some(piece),
                card: Some(card),
                ..
            } => write!(f, "place piece {piece} on card {card}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Uses the explicit index if given, otherwise a random one below `len`.
fn pick_index(explicit: Option<usize>, len: usize, rng: &mut StdRng) -> Option<usize> {
    match explicit {
        Some(index) => Some(index),
        None if len == 0 => None,
        None => Some(rng.random_range(0..len)),
    }
}

/// An action whose inputs all point at concrete hand entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedAction {
    TakePiece,
    PlacePiece {
        piece: usize,
        card: usize,
        configuration: Option<Configuration>,
    },
    TakeCard,
    UpgradePiece { piece: usize },
    Master,
}

impl ResolvedAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            ResolvedAction::TakePiece => ActionKind::TakePiece,
            ResolvedAction::PlacePiece { .. } => ActionKind::PlacePiece,
            ResolvedAction::TakeCard => ActionKind::TakeCard,
            ResolvedAction::UpgradePiece { .. } => ActionKind::UpgradePiece,
            ResolvedAction::Master => ActionKind::Master,
        }
    }

    /// Checks the action against the current hand. Never changes anything.
    pub fn is_valid(&self, hand: &Hand, rules: &Rules) -> bool {
        match *self {
            ResolvedAction::TakePiece => true,
            ResolvedAction::PlacePiece {
                piece,
                card,
                configuration,
            } => {
                let (Some(piece), Some(card)) = (hand.pieces.get(piece), hand.cards.get(card))
                else {
                    return false;
                };
                match configuration {
                    Some(configuration) => {
                        piece.configurations().contains(configuration)
                            && card.placement_valid(configuration)
                    }
                    None => card.accepts_any(piece.configurations()),
                }
            }
            ResolvedAction::TakeCard => hand.cards.len() < rules.card_limit,
            ResolvedAction::UpgradePiece { piece } => piece < hand.pieces.len(),
            ResolvedAction::Master => true,
        }
    }

    /// Applies the action.
    ///
    /// # Panics
    ///
    /// If the action is not valid for `ctx`, or if a placement that was just
    /// checked is refused by the card.
    pub fn perform(self, ctx: &mut ActionContext<'_>) {
        assert!(
            self.is_valid(ctx.hand, ctx.rules),
            "performed an action that is not valid: {}",
            self.describe(ctx.hand)
        );

        match self {
            ResolvedAction::TakePiece => {
                let piece = ctx.supply.draw_piece(ctx.rng);
                trace!(piece = piece.name(), "took piece");
                ctx.hand.pieces.push(piece);
            }
            ResolvedAction::PlacePiece {
                piece,
                card,
                configuration,
            } => {
                let configuration = match configuration {
                    Some(configuration) => configuration,
                    None => {
                        let candidates: Vec<Configuration> = ctx.hand.cards[card]
                            .valid_configurations(ctx.hand.pieces[piece].configurations())
                            .collect();
                        let Some(&chosen) = candidates.choose(ctx.rng) else {
                            panic!("no valid configuration for a validated placement");
                        };
                        chosen
                    }
                };

                if !ctx.hand.cards[card].place_piece(configuration) {
                    panic!("card refused configuration {configuration:?} right after validation");
                }
                let placed = ctx.hand.pieces.remove(piece);
                trace!(piece = placed.name(), card, "placed piece");
                ctx.hand.cards[card].hold_piece(placed);
            }
            ResolvedAction::TakeCard => {
                let card = ctx.supply.draw_card(ctx.rng);
                trace!(%card, "took card");
                ctx.hand.cards.push(card);
            }
            // TODO: raise the piece level once the catalogue defines upgrade paths
            ResolvedAction::UpgradePiece { .. } => {}
            ResolvedAction::Master => {}
        }
    }

    /// Human-readable description, with piece names taken from the hand.
    pub fn describe(&self, hand: &Hand) -> String {
        match *self {
            ResolvedAction::PlacePiece { piece, card, .. } => {
                let name = hand.pieces.get(piece).map_or("?", |piece| piece.name());
                format!("place {name} on card {card}")
            }
            ResolvedAction::UpgradePiece { piece } => {
                let name = hand.pieces.get(piece).map_or("?", |piece| piece.name());
                format!("upgrade {name}")
            }
            other => other.kind().to_string(),
        }
    }
}

impl fmt::Display for ResolvedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedAction::PlacePiece { piece, card, .. } => {
                write!(f, "place piece {piece} on card {card}")
            }
            ResolvedAction::UpgradePiece { piece } => write!(f, "upgrade piece {piece}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}
