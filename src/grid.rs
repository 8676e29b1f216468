//! Grid representation shared by pieces and cards.
//!
//! Every piece and card lives on the same fixed `GRID_DIM x GRID_DIM` grid.
//! A set of cells is a bitmask where bit `row * GRID_DIM + col` is set for an
//! occupied cell, so containment and overlap checks are single AND operations.

use std::fmt;

use crate::error::SetupError;
use crate::geometry::Coord;

/// Cells per grid side.
pub const GRID_DIM: usize = 5;

/// Total cells in the grid.
pub const GRID_CELLS: usize = GRID_DIM * GRID_DIM;

/// Bitmask with every grid cell set (lowest 25 bits).
const ALL_CELLS: u32 = (1 << GRID_CELLS) - 1;

/// Per-cell integer counts, indexed `[row][col]`.
pub type CellCounts = [[u32; GRID_DIM]; GRID_DIM];

/// Converts (row, col) coordinates to a linear cell index.
///
/// Index order is row-major: `idx = row * GRID_DIM + col`.
#[inline(always)]
pub const fn coord_to_idx(row: i32, col: i32) -> usize {
    (row as usize) * GRID_DIM + (col as usize)
}

/// Converts a linear cell index to (row, col) coordinates.
#[inline(always)]
pub const fn idx_to_coord(cell_index: usize) -> Coord {
    ((cell_index / GRID_DIM) as i32, (cell_index % GRID_DIM) as i32)
}

/// Returns true if the coordinate lies inside the grid.
#[inline]
pub fn in_bounds((row, col): Coord) -> bool {
    (0..GRID_DIM as i32).contains(&row) && (0..GRID_DIM as i32).contains(&col)
}

/// A set of grid cells stored as a bitmask.
///
/// Used both for piece placements (configurations) and card masks.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellSet(u32);

impl CellSet {
    /// The set with no cells.
    pub const EMPTY: Self = Self(0);

    /// The set with every grid cell.
    pub const FULL: Self = Self(ALL_CELLS);

    /// Wraps a raw bitmask, dropping bits outside the grid.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & ALL_CELLS)
    }

    /// Raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds a set from in-grid coordinates.
    ///
    /// Panics if a coordinate lies outside the grid; callers translate shapes
    /// into the grid before stamping them.
    pub fn from_coords(coords: impl IntoIterator<Item = Coord>) -> Self {
        let mut bits = 0u32;
        for coord in coords {
            assert!(in_bounds(coord), "cell {coord:?} outside the grid");
            bits |= 1 << coord_to_idx(coord.0, coord.1);
        }
        Self(bits)
    }

    /// Parses a `GRID_DIM x GRID_DIM` boolean matrix.
    ///
    /// `what` names the matrix in the error message.
    pub fn from_rows(rows: &[Vec<bool>], what: impl Into<String>) -> Result<Self, SetupError> {
        let bad_row = rows.iter().find(|row| row.len() != GRID_DIM);
        if rows.len() != GRID_DIM || bad_row.is_some() {
            return Err(SetupError::Dimensions {
                what: what.into(),
                expected: GRID_DIM,
                rows: rows.len(),
                cols: bad_row.or(rows.first()).map_or(0, Vec::len),
            });
        }

        let mut bits = 0u32;
        for (row, cells) in rows.iter().enumerate() {
            for (col, &occupied) in cells.iter().enumerate() {
                if occupied {
                    bits |= 1 << coord_to_idx(row as i32, col as i32);
                }
            }
        }
        Ok(Self(bits))
    }

    /// Returns true if the cell at (row, col) is in the set.
    #[inline]
    pub fn contains(self, row: usize, col: usize) -> bool {
        row < GRID_DIM && col < GRID_DIM && self.0 & (1 << (row * GRID_DIM + col)) != 0
    }

    /// Number of cells in the set.
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every cell of `self` is also in `other`.
    #[inline]
    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Returns true if the two sets share a cell.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Cells in `self` that are not in `other`.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Cell indices in increasing order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..GRID_CELLS).filter(move |&idx| self.0 & (1 << idx) != 0)
    }

    /// Cell coordinates in row-major order.
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        self.indices().map(idx_to_coord)
    }

    /// Expands the set into a `[row][col]` boolean matrix.
    pub fn to_rows(self) -> [[bool; GRID_DIM]; GRID_DIM] {
        let mut rows = [[false; GRID_DIM]; GRID_DIM];
        for (row, col) in self.coords() {
            rows[row as usize][col as usize] = true;
        }
        rows
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellSet({:#027b})", self.0)
    }
}

impl fmt::Display for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cells(*self))
    }
}

/// Formats a cell set as a grid, `#` for occupied and `.` for empty.
pub fn format_cells(cells: CellSet) -> String {
    format_grid(|row, col| if cells.contains(row, col) { '#' } else { '.' })
}

/// Formats per-cell counts as a right-aligned number grid.
pub fn format_counts(counts: &CellCounts) -> String {
    let width = counts
        .iter()
        .flatten()
        .map(|count| count.to_string().len())
        .max()
        .unwrap_or(1);

    let mut output = String::new();
    for row in counts {
        let line: Vec<String> = row
            .iter()
            .map(|count| format!("{count:>width$}"))
            .collect();
        output.push_str(&line.join(" "));
        output.push('\n');
    }
    output
}

/// Formats one character per cell, one line per row.
pub(crate) fn format_grid(mut cell_char: impl FnMut(usize, usize) -> char) -> String {
    let mut output = String::with_capacity(GRID_CELLS + GRID_DIM);
    for row in 0..GRID_DIM {
        for col in 0..GRID_DIM {
            output.push(cell_char(row, col));
        }
        output.push('\n');
    }
    output
}
