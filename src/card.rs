//! Cards and piece placement.
//!
//! A card has a fixed mask of playable cells and an occupancy layout counting
//! how often each cell has been covered. `place_piece` is the only mutator of
//! the layout, and it either applies a whole configuration or nothing.

use std::fmt;

use tracing::trace;

use crate::config::{cells_to_rows, CardDef};
use crate::configurations::{Configuration, ConfigurationSet};
use crate::error::SetupError;
use crate::grid::{format_grid, CellSet, GRID_CELLS};
use crate::pieces::Piece;

/// What completing a card is worth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reward {
    pub points: u32,
    /// Name of the catalogue piece granted on completion.
    pub piece: Option<String>,
}

/// A card players fill with pieces.
#[derive(Clone, Debug)]
pub struct Card {
    mask: CellSet,
    /// Coverage count per cell, indexed like `CellSet` bits.
    layout: [u8; GRID_CELLS],
    reward: Reward,
    is_full: bool,
    placed: Vec<Piece>,
}

impl Card {
    /// Creates an empty card with the given playable cells.
    pub fn new(mask: CellSet, reward: Reward) -> Self {
        Self {
            mask,
            layout: [0; GRID_CELLS],
            reward,
            is_full: mask.is_empty(),
            placed: Vec::new(),
        }
    }

    /// Builds a card from its configuration record.
    ///
    /// `index` is the card's position in the configuration, for error messages.
    /// Reward piece names are checked by the caller, which owns the catalogue.
    pub fn from_def(def: &CardDef, index: usize) -> Result<Self, SetupError> {
        let mask = CellSet::from_rows(&cells_to_rows(&def.mask), format!("mask of card {index}"))?;
        if mask.is_empty() {
            return Err(SetupError::EmptyMask { index });
        }
        let reward = Reward {
            points: def.reward.points,
            piece: def.reward.piece.clone(),
        };
        Ok(Self::new(mask, reward))
    }

    /// Checks whether `configuration` can be placed right now.
    ///
    /// Every cell of the configuration must be playable, and adding it to the
    /// layout must leave no cell covered more than once.
    pub fn placement_valid(&self, configuration: Configuration) -> bool {
        if !configuration.is_subset(self.mask) {
            return false;
        }
        // one more cover on an already covered cell would make it 2
        configuration.indices().all(|idx| self.layout[idx] == 0)
    }

    /// Places `configuration` on the card if valid.
    ///
    /// Returns false and leaves the card untouched when the placement is
    /// invalid.
    pub fn place_piece(&mut self, configuration: Configuration) -> bool {
        if !self.placement_valid(configuration) {
            trace!(?configuration, "placement rejected");
            return false;
        }

        for idx in configuration.indices() {
            self.layout[idx] += 1;
        }
        self.is_full = self.occupied_cells() == self.mask;
        true
    }

    /// Configurations from `set` that are placeable right now.
    pub fn valid_configurations<'a>(
        &'a self,
        set: &'a ConfigurationSet,
    ) -> impl Iterator<Item = Configuration> + 'a {
        set.iter()
            .filter(move |&configuration| self.placement_valid(configuration))
    }

    /// Returns true if at least one configuration of `set` fits.
    pub fn accepts_any(&self, set: &ConfigurationSet) -> bool {
        self.valid_configurations(set).next().is_some()
    }

    pub fn mask(&self) -> CellSet {
        self.mask
    }

    /// Cells covered at least once.
    pub fn occupied_cells(&self) -> CellSet {
        let bits = self
            .layout
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .fold(0u32, |bits, (idx, _)| bits | 1 << idx);
        CellSet::from_bits(bits)
    }

    /// Playable cells still empty.
    pub fn free_cells(&self) -> CellSet {
        self.mask.difference(self.occupied_cells())
    }

    /// Coverage count of every cell.
    pub fn layout(&self) -> &[u8; GRID_CELLS] {
        &self.layout
    }

    pub fn is_full(&self) -> bool {
        self.is_full
    }

    pub fn reward(&self) -> &Reward {
        &self.reward
    }

    /// Keeps a placed piece until the card is completed.
    pub fn hold_piece(&mut self, piece: Piece) {
        self.placed.push(piece);
    }

    /// Pieces placed on this card so far.
    pub fn placed_pieces(&self) -> &[Piece] {
        &self.placed
    }

    /// Hands back every piece placed on the card.
    pub fn take_placed_pieces(&mut self) -> Vec<Piece> {
        std::mem::take(&mut self.placed)
    }

    /// Draws the card: `#` covered, `o` playable and free, `.` not playable.
    pub fn render(&self) -> String {
        let occupied = self.occupied_cells();
        format_grid(|row, col| {
            if occupied.contains(row, col) {
                '#'
            } else if self.mask.contains(row, col) {
                'o'
            } else {
                '.'
            }
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "card {}/{} filled, {} points",
            self.occupied_cells().len(),
            self.mask.len(),
            self.reward.points
        )
    }
}
