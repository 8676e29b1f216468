//! Turn policies.
//!
//! A strategy spends up to `budget` action slots per turn through an
//! `ActionContext` and reports how many it used.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, trace};

use crate::action::{Action, ActionContext, ActionKind};

pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Plays one turn and returns the number of action slots spent.
    fn play_turn(&mut self, ctx: &mut ActionContext<'_>, budget: u32) -> u32;
}

/// Strategy selection in the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Greedy,
    Random,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Greedy => Box::new(GreedyStrategy),
            StrategyKind::Random => Box::new(RandomStrategy::new()),
        }
    }
}

/// Samples action kinds uniformly and leaves every input to resolution.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    vocabulary: Vec<ActionKind>,
}

impl RandomStrategy {
    /// Samples from all five action kinds.
    pub fn new() -> Self {
        Self {
            vocabulary: ActionKind::iter().collect(),
        }
    }

    /// Samples only from `vocabulary`.
    pub fn with_vocabulary(vocabulary: Vec<ActionKind>) -> Self {
        Self { vocabulary }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn play_turn(&mut self, ctx: &mut ActionContext<'_>, budget: u32) -> u32 {
        let mut spent = 0;
        let mut failures = 0;

        while spent < budget {
            if failures >= ctx.rules.max_attempts {
                debug!(spent, failures, "giving up on the rest of the turn");
                break;
            }
            ctx.hand.collect_full_cards(ctx.supply);
            let Some(&kind) = self.vocabulary.choose(ctx.rng()) else {
                break;
            };

            if Action::unresolved(kind).execute(ctx) {
                spent += 1;
                failures = 0;
            } else {
                trace!(%kind, "sampled action not valid");
                failures += 1;
            }
        }
        spent
    }
}

/// Fills the first card with the newest piece, taking pieces and cards as
/// needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyStrategy;

impl GreedyStrategy {
    fn choose(ctx: &mut ActionContext<'_>) -> Action {
        let hand = &*ctx.hand;
        match (hand.pieces.len(), hand.cards.len()) {
            (0, _) => Action::TakePiece,
            (_, 0) => Action::TakeCard,
            (pieces, _) => {
                let place = Action::place(pieces - 1, 0);
                if place.is_valid(ctx) {
                    place
                } else {
                    Action::TakePiece
                }
            }
        }
    }
}

impl Strategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn play_turn(&mut self, ctx: &mut ActionContext<'_>, budget: u32) -> u32 {
        let mut spent = 0;

        for _ in 0..ctx.rules.max_attempts {
            if spent >= budget {
                break;
            }
            ctx.hand.collect_full_cards(ctx.supply);

            let action = Self::choose(ctx);
            if !action.execute(ctx) {
                debug!(%action, "no valid greedy move, ending turn");
                break;
            }
            spent += 1;
        }
        spent
    }
}
