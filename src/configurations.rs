//! Placement enumeration for a single shape.
//!
//! A configuration set (the "cube") lists every way a shape can lie on the
//! grid: each distinct rotation stamped at each offset where it fits, with
//! exact duplicates removed. It is built once per piece and only read after.
//!
//! Key points:
//! - Placements are bitmasks, so deduplication is a hash of one `u32`
//! - Enumeration order is rotation order, then row-major offset
//! - No wraparound: a rotation is only stamped where all its cells fit

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::geometry::{all_orientations, extent, Coord};
use crate::grid::{CellCounts, CellSet, GRID_DIM};

/// One concrete placement of a shape on the grid.
pub type Configuration = CellSet;

/// The ordered, deduplicated placements of one shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationSet {
    configurations: Vec<Configuration>,
}

impl ConfigurationSet {
    /// Enumerates every in-grid placement of the shape given by `coords`.
    ///
    /// The coordinates may sit anywhere (even negative); only their relative
    /// positions matter. An empty shape produces an empty set.
    pub fn build(coords: &[Coord]) -> Self {
        let mut configurations = Vec::new();
        let mut seen: FxHashSet<Configuration> = FxHashSet::default();

        if coords.is_empty() {
            return Self { configurations };
        }

        for orientation in all_orientations(coords) {
            let (rows, cols) = extent(&orientation);
            let max_row_offset = GRID_DIM as i32 - rows;
            let max_col_offset = GRID_DIM as i32 - cols;

            // a rotation wider or taller than the grid has no offsets at all
            for row_offset in 0..=max_row_offset {
                for col_offset in 0..=max_col_offset {
                    let placement = CellSet::from_coords(
                        orientation
                            .iter()
                            .map(|&(row, col)| (row + row_offset, col + col_offset)),
                    );
                    if seen.insert(placement) {
                        configurations.push(placement);
                    }
                }
            }
        }

        trace!(
            cells = coords.len(),
            configurations = configurations.len(),
            "built configuration set"
        );
        Self { configurations }
    }

    /// Number of configurations.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Configuration at `index`, in enumeration order.
    pub fn get(&self, index: usize) -> Option<Configuration> {
        self.configurations.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.configurations.iter().copied()
    }

    pub fn as_slice(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Returns true if `configuration` is one of this shape's placements.
    pub fn contains(&self, configuration: Configuration) -> bool {
        self.configurations.contains(&configuration)
    }

    /// Sums all configurations cell by cell.
    ///
    /// Each entry counts how many placements cover that cell; the matrix is a
    /// compact checksum of the whole set.
    pub fn cell_sums(&self) -> CellCounts {
        let mut sums = CellCounts::default();
        for configuration in &self.configurations {
            for (row, col) in configuration.coords() {
                sums[row as usize][col as usize] += 1;
            }
        }
        sums
    }
}

impl<'a> IntoIterator for &'a ConfigurationSet {
    type Item = &'a Configuration;
    type IntoIter = std::slice::Iter<'a, Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.configurations.iter()
    }
}
