//! Test fixtures shared by unit tests, benches, and downstream crates.
//!
//! [`grid_catalogue`] builds a consistent puzzle of any size by labelling
//! the internal edges of a solved board and cutting it into pieces, so
//! every generated catalogue has at least one solution by construction.

use edgelace_core::{Pattern, Piece, PieceCatalogue};

/// Pattern id for the vertical edge between `(x, y)` and `(x + 1, y)`.
fn vertical(x: u8, y: u8) -> Pattern {
    Pattern::new(1 + (x + 2 * y) % 3)
}

/// Pattern id for the horizontal edge between `(x, y)` and `(x, y + 1)`.
fn horizontal(x: u8, y: u8) -> Pattern {
    Pattern::new(4 + (2 * x + y) % 3)
}

/// Builds a solvable `side_len`×`side_len` catalogue.
///
/// The pieces are listed in a fixed scrambled order (not solution order),
/// so tests exercise real piece lookup rather than accidental identity
/// between catalogue index and board position. Only three vertical and
/// three horizontal patterns are used: the heavy repetition keeps slots
/// ambiguous after a placement, so searches branch instead of cascading
/// straight to a solution.
///
/// # Panics
///
/// Panics if `side_len` is zero.
#[must_use]
pub fn grid_catalogue(side_len: u8) -> PieceCatalogue {
    assert!(side_len > 0, "side_len must be positive");
    let count = usize::from(side_len) * usize::from(side_len);
    let solution: Vec<Piece> = (0..count)
        .map(|index| {
            #[expect(clippy::cast_possible_truncation)]
            let (x, y) = (
                (index % usize::from(side_len)) as u8,
                (index / usize::from(side_len)) as u8,
            );
            let top = if y == 0 {
                Pattern::BORDER
            } else {
                horizontal(x, y - 1)
            };
            let right = if x + 1 == side_len {
                Pattern::BORDER
            } else {
                vertical(x, y)
            };
            let bottom = if y + 1 == side_len {
                Pattern::BORDER
            } else {
                horizontal(x, y)
            };
            let left = if x == 0 {
                Pattern::BORDER
            } else {
                vertical(x - 1, y)
            };
            Piece::new(top, right, bottom, left)
        })
        .collect();
    // Fixed scramble: catalogue index i holds the piece from solution cell
    // (7 i + 3) mod N. 7 is coprime with every square up to 256 except
    // multiples of 7, where 9 is used instead.
    let stride = if count % 7 == 0 { 9 } else { 7 };
    let pieces = (0..count)
        .map(|i| solution[(stride * i + 3) % count])
        .collect();
    PieceCatalogue::from_pieces(pieces).expect("square catalogue")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_catalogue_piece_census() {
        let catalogue = grid_catalogue(6);
        assert_eq!(catalogue.len(), 36);
        let corners = catalogue
            .pieces()
            .iter()
            .filter(|p| p.border_edge_count() == 2)
            .count();
        let edges = catalogue
            .pieces()
            .iter()
            .filter(|p| p.border_edge_count() == 1)
            .count();
        assert_eq!(corners, 4);
        assert_eq!(edges, 16);
    }
}
