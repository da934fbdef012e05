//! The piece catalogue: the ordered list of tiles making up one puzzle.

use std::num::ParseIntError;

use derive_more::{Display, Error};

use crate::{PATTERN_LIMIT, Pattern, PatternSet, Piece};

/// Errors raised while building a [`PieceCatalogue`].
#[derive(Debug, Display, Error)]
pub enum CatalogueError {
    /// A line did not contain exactly four edge patterns.
    #[display("line {line}: expected 4 edge patterns, found {found}")]
    FieldCount {
        /// One-based line number within the input.
        line: usize,
        /// Number of fields actually present.
        found: usize,
    },
    /// A field was not a valid integer.
    #[display("line {line}: invalid pattern id")]
    InvalidPattern {
        /// One-based line number within the input.
        line: usize,
        /// The underlying parse failure.
        source: ParseIntError,
    },
    /// A pattern identifier exceeded the supported range.
    #[display("line {line}: pattern id {id} is not below {PATTERN_LIMIT}")]
    PatternRange {
        /// One-based line number within the input.
        line: usize,
        /// The out-of-range identifier.
        id: u8,
    },
    /// The number of pieces is not a perfect square.
    #[display("piece count {count} is not a perfect square")]
    NotSquare {
        /// Number of pieces parsed.
        count: usize,
    },
    /// The catalogue contained no pieces at all.
    #[display("catalogue contains no pieces")]
    Empty,
}

/// An immutable, ordered collection of N pieces for an L×L board, L = √N.
///
/// Pieces are identified by their stable index `0..N`; the index, not the
/// piece value, is what slot constraints and placements refer to.
///
/// # Examples
///
/// ```
/// use edgelace_core::PieceCatalogue;
///
/// // A 2×2 puzzle: four corner pieces, border sentinel 0.
/// let catalogue = PieceCatalogue::parse_text(
///     "0 1 2 0\n\
///      0 0 2 1\n\
///      2 1 0 0\n\
///      2 0 0 1\n",
/// )?;
///
/// assert_eq!(catalogue.len(), 4);
/// assert_eq!(catalogue.side_len(), 2);
/// # Ok::<(), edgelace_core::CatalogueError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceCatalogue {
    pieces: Vec<Piece>,
    side_len: u8,
    patterns: PatternSet,
}

impl PieceCatalogue {
    /// Parses the plain-text catalogue format: one piece per line, four
    /// whitespace-separated pattern ids in top/right/bottom/left order.
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogueError`] describing the first malformed line, or
    /// a catalogue-level failure (empty input, non-square piece count).
    pub fn parse_text(input: &str) -> Result<Self, CatalogueError> {
        let mut pieces = Vec::new();
        for (line_index, line) in input.lines().enumerate() {
            let line_number = line_index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut patterns = [Pattern::BORDER; 4];
            let mut found = 0;
            for (i, field) in trimmed.split_whitespace().enumerate() {
                let id: u8 = field.parse().map_err(|source| {
                    CatalogueError::InvalidPattern {
                        line: line_number,
                        source,
                    }
                })?;
                if id >= PATTERN_LIMIT {
                    return Err(CatalogueError::PatternRange {
                        line: line_number,
                        id,
                    });
                }
                if i < 4 {
                    patterns[i] = Pattern::new(id);
                }
                found += 1;
            }
            if found != 4 {
                return Err(CatalogueError::FieldCount {
                    line: line_number,
                    found,
                });
            }
            pieces.push(Piece::new(patterns[0], patterns[1], patterns[2], patterns[3]));
        }
        Self::from_pieces(pieces)
    }

    /// Builds a catalogue from already-parsed pieces.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Empty`] for an empty list and
    /// [`CatalogueError::NotSquare`] when the count has no integer square
    /// root.
    pub fn from_pieces(pieces: Vec<Piece>) -> Result<Self, CatalogueError> {
        if pieces.is_empty() {
            return Err(CatalogueError::Empty);
        }
        let count = pieces.len();
        let mut side_len = 1usize;
        while side_len * side_len < count {
            side_len += 1;
        }
        if side_len * side_len != count {
            return Err(CatalogueError::NotSquare { count });
        }
        let patterns = pieces
            .iter()
            .flat_map(|piece| crate::Side::ALL.map(|side| piece.side(side)))
            .collect();
        #[expect(clippy::cast_possible_truncation)]
        let side_len = side_len as u8;
        Ok(Self {
            pieces,
            side_len,
            patterns,
        })
    }

    /// Returns the number of pieces, N.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns `false`; catalogues are never empty once constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the board side length L, with N = L².
    #[must_use]
    pub fn side_len(&self) -> u8 {
        self.side_len
    }

    /// Returns the piece at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`len`](Self::len).
    #[must_use]
    pub fn piece(&self, index: u16) -> Piece {
        self.pieces[index as usize]
    }

    /// Returns all pieces in catalogue order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Returns every pattern appearing on any piece edge, border sentinel
    /// included if present.
    #[must_use]
    pub fn patterns(&self) -> PatternSet {
        self.patterns
    }

    /// Returns the patterns that may legally appear between two adjacent
    /// tiles: everything in [`patterns`](Self::patterns) except the border
    /// sentinel.
    #[must_use]
    pub fn interior_patterns(&self) -> PatternSet {
        let mut interior = self.patterns;
        interior.remove(Pattern::BORDER);
        interior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
        # 2x2 sample\n\
        0 1 2 0\n\
        0 0 2 1\n\
        \n\
        2 1 0 0\n\
        2 0 0 1\n";

    #[test]
    fn test_parse_text_counts_and_order() {
        let catalogue = PieceCatalogue::parse_text(SAMPLE).unwrap();
        assert_eq!(catalogue.len(), 4);
        assert_eq!(catalogue.side_len(), 2);
        assert_eq!(catalogue.piece(0).side(crate::Side::Right), Pattern::new(1));
    }

    #[test]
    fn test_parse_rejects_field_count() {
        let result = PieceCatalogue::parse_text("1 2 3\n");
        assert!(matches!(
            result,
            Err(CatalogueError::FieldCount { line: 1, found: 3 })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_integer() {
        let result = PieceCatalogue::parse_text("1 2 x 4\n");
        assert!(matches!(
            result,
            Err(CatalogueError::InvalidPattern { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range_pattern() {
        let result = PieceCatalogue::parse_text("1 2 64 4\n");
        assert!(matches!(
            result,
            Err(CatalogueError::PatternRange { line: 1, id: 64 })
        ));
    }

    #[test]
    fn test_rejects_non_square_count() {
        let result = PieceCatalogue::parse_text("0 1 2 0\n0 0 2 1\n2 1 0 0\n");
        assert!(matches!(result, Err(CatalogueError::NotSquare { count: 3 })));
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(matches!(
            PieceCatalogue::parse_text("# nothing here\n"),
            Err(CatalogueError::Empty)
        ));
    }

    #[test]
    fn test_pattern_universe() {
        let catalogue = PieceCatalogue::parse_text(SAMPLE).unwrap();
        assert!(catalogue.patterns().contains(Pattern::BORDER));
        assert!(catalogue.patterns().contains(Pattern::new(1)));
        assert!(!catalogue.interior_patterns().contains(Pattern::BORDER));
        assert!(catalogue.interior_patterns().contains(Pattern::new(2)));
    }
}
