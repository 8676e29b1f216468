//! 2D rotation utilities.
//!
//! A polyomino on a square grid has 4 orientations under rotation (the cyclic
//! group of quarter turns). Reflections are not legal moves in the game, so
//! mirror images are distinct pieces.

/// A 2D cell position as (row, col).
pub type Coord = (i32, i32);

/// All 4 quarter-turn rotations, clockwise.
///
/// Applied to raw coordinates; results are brought back to the origin by
/// `normalize_to_origin`.
pub const ROTATIONS: [fn(Coord) -> Coord; 4] = [
    |(row, col)| (row, col),   // 0 degrees
    |(row, col)| (col, -row),  // 90 degrees
    |(row, col)| (-row, -col), // 180 degrees
    |(row, col)| (-col, row),  // 270 degrees
];

/// Generates all distinct orientations of a shape.
///
/// Applies the 4 rotations in order, normalizes each result so that the
/// minimum coordinates are at the origin, and keeps the first occurrence of
/// each. Symmetric shapes have fewer than 4 orientations; the order follows
/// the rotation angle, so it is stable for a given input.
pub fn all_orientations(shape: &[Coord]) -> Vec<Vec<Coord>> {
    let mut orientations: Vec<Vec<Coord>> = Vec::with_capacity(ROTATIONS.len());

    for rotate in ROTATIONS {
        let rotated_coords: Vec<Coord> = shape.iter().map(|&coord| rotate(coord)).collect();
        let orientation = normalize_to_origin(rotated_coords);

        // symmetric shapes map onto an earlier rotation
        if !orientations.contains(&orientation) {
            orientations.push(orientation);
        }
    }

    orientations
}

/// Translates coordinates so the minimum row and column are zero, then sorts.
///
/// This trims the empty rows and columns around the shape, and the sort makes
/// two orientations that cover the same cells compare equal.
pub fn normalize_to_origin(mut coords: Vec<Coord>) -> Vec<Coord> {
    let Some(min_row) = coords.iter().map(|(row, _)| *row).min() else {
        return coords;
    };
    let min_col = coords.iter().map(|(_, col)| *col).min().unwrap_or(0);

    for (row, col) in &mut coords {
        *row -= min_row;
        *col -= min_col;
    }

    coords.sort_unstable();
    coords
}

/// Height and width of the bounding box of origin-normalized coordinates.
pub fn extent(coords: &[Coord]) -> (i32, i32) {
    let rows = coords.iter().map(|(row, _)| row + 1).max().unwrap_or(0);
    let cols = coords.iter().map(|(_, col)| col + 1).max().unwrap_or(0);
    (rows, cols)
}
