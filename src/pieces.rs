//! Piece definitions.
//!
//! A `Shape` is the raw occupancy pattern from the configuration; a `Piece`
//! pairs it with its precomputed configuration set. Pieces are cloned freely
//! between the supply, hands and cards, and each clone owns its own set.

use std::fmt;

use tracing::debug;

use crate::config::{cells_to_rows, PieceDef};
use crate::configurations::ConfigurationSet;
use crate::error::SetupError;
use crate::geometry::Coord;
use crate::grid::{format_cells, CellSet};

/// Name of the single-cell piece every player starts with.
pub const SQUARE_NAME: &str = "square_1";

/// Occupancy pattern of a piece before placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    name: String,
    level: u32,
    cells: CellSet,
}

impl Shape {
    /// Builds a shape from a `GRID_DIM x GRID_DIM` boolean matrix.
    ///
    /// Fails on wrong dimensions or when no cell is occupied.
    pub fn new(name: impl Into<String>, level: u32, rows: &[Vec<bool>]) -> Result<Self, SetupError> {
        let name = name.into();
        let cells = CellSet::from_rows(rows, format!("shape of piece {name:?}"))?;
        if cells.is_empty() {
            return Err(SetupError::EmptyShape { name });
        }
        Ok(Self { name, level, cells })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn cells(&self) -> CellSet {
        self.cells
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Occupied cells as (row, col) coordinates.
    pub fn coords(&self) -> Vec<Coord> {
        self.cells.coords().collect()
    }
}

/// A piece a player can hold and place on a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    shape: Shape,
    configurations: ConfigurationSet,
}

impl Piece {
    /// Creates a piece and enumerates its placements.
    pub fn new(shape: Shape) -> Self {
        let configurations = ConfigurationSet::build(&shape.coords());
        debug!(
            piece = shape.name(),
            configurations = configurations.len(),
            "piece ready"
        );
        Self {
            shape,
            configurations,
        }
    }

    /// Builds a piece from its configuration record.
    pub fn from_def(def: &PieceDef) -> Result<Self, SetupError> {
        let shape = Shape::new(def.name.clone(), def.level, &cells_to_rows(&def.shape))?;
        Ok(Self::new(shape))
    }

    /// The level-1 single-cell square.
    pub fn square() -> Self {
        let shape = Shape {
            name: SQUARE_NAME.to_string(),
            level: 1,
            cells: CellSet::from_coords([(0, 0)]),
        };
        Self::new(shape)
    }

    pub fn name(&self) -> &str {
        self.shape.name()
    }

    pub fn level(&self) -> u32 {
        self.shape.level()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Every placement of this piece on an empty grid.
    pub fn configurations(&self) -> &ConfigurationSet {
        &self.configurations
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Formats every configuration of a piece, separated by blank lines.
pub fn format_configurations(piece: &Piece) -> String {
    let total = piece.configurations().len();
    let mut output = format!("{} has {} configurations:\n\n", piece.name(), total);
    for (index, configuration) in piece.configurations().iter().enumerate() {
        output.push_str(&format!("Configuration {}/{}:\n", index + 1, total));
        output.push_str(&format_cells(configuration));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cell;

    fn corner_rows() -> Vec<Vec<bool>> {
        let mut rows = vec![vec![false; 5]; 5];
        rows[0][0] = true;
        rows[1][0] = true;
        rows[1][1] = true;
        rows
    }

    #[test]
    fn test_shape_keeps_name_level_and_cells() {
        let shape = Shape::new("corner_3", 3, &corner_rows()).unwrap();
        assert_eq!(shape.name(), "corner_3");
        assert_eq!(shape.level(), 3);
        assert_eq!(shape.cell_count(), 3);
        assert_eq!(shape.coords(), vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_empty_shape_is_rejected() {
        let err = Shape::new("nothing", 1, &vec![vec![false; 5]; 5]).unwrap_err();
        assert!(matches!(err, SetupError::EmptyShape { name } if name == "nothing"));
    }

    #[test]
    fn test_wrong_dimensions_are_rejected() {
        let err = Shape::new("wide", 1, &vec![vec![true; 6]; 5]).unwrap_err();
        assert!(matches!(err, SetupError::Dimensions { cols: 6, .. }));
    }

    #[test]
    fn test_piece_configurations_preserve_cell_count() {
        let piece = Piece::new(Shape::new("corner_3", 3, &corner_rows()).unwrap());
        assert_eq!(piece.configurations().len(), 64);
        assert!(piece
            .configurations()
            .iter()
            .all(|configuration| configuration.len() == 3));
        assert!(piece.configurations().contains(piece.shape().cells()));
    }

    #[test]
    fn test_square_piece() {
        let square = Piece::square();
        assert_eq!(square.name(), SQUARE_NAME);
        assert_eq!(square.level(), 1);
        assert_eq!(square.configurations().len(), 25);
        assert_eq!(square.to_string(), "square_1");
    }

    #[test]
    fn test_piece_from_def() {
        let mut shape = vec![vec![Cell::Count(0); 5]; 5];
        shape[2][1] = Cell::Count(1);
        shape[2][2] = Cell::Flag(true);
        let def = PieceDef {
            name: "line_2".to_string(),
            level: 2,
            shape,
        };

        let piece = Piece::from_def(&def).unwrap();
        assert_eq!(piece.name(), "line_2");
        assert_eq!(piece.configurations().len(), 40);
    }

    #[test]
    fn test_format_configurations_lists_every_placement() {
        let output = format_configurations(&Piece::square());
        assert!(output.starts_with("square_1 has 25 configurations:"));
        assert!(output.contains("Configuration 25/25:\n....."));
    }
}
