//! Puzzle pieces.

use crate::{Pattern, PatternSet, Rotation, RotationSet, Side};

/// The set of patterns a placement must show on each side, indexed by
/// [`Side::index`]. [`PatternSet::FULL`] acts as a wildcard.
pub type SideRequirements = [PatternSet; 4];

/// An immutable square tile: four edge patterns in canonical
/// top/right/bottom/left order.
///
/// Pieces are identified externally by their stable index in the
/// [`PieceCatalogue`](crate::PieceCatalogue); the piece value itself carries
/// only the edge patterns.
///
/// # Examples
///
/// ```
/// use edgelace_core::{Pattern, Piece, Rotation, Side};
///
/// let piece = Piece::new(
///     Pattern::new(1),
///     Pattern::new(2),
///     Pattern::new(3),
///     Pattern::new(4),
/// );
///
/// // Rotating 90° clockwise carries the top pattern onto the right side.
/// assert_eq!(piece.pattern_at(Side::Right, Rotation::R90), Pattern::new(1));
/// assert_eq!(piece.pattern_at(Side::Top, Rotation::R0), Pattern::new(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    top: Pattern,
    right: Pattern,
    bottom: Pattern,
    left: Pattern,
}

impl Piece {
    /// Creates a piece from its four canonical edge patterns.
    #[must_use]
    pub const fn new(top: Pattern, right: Pattern, bottom: Pattern, left: Pattern) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Returns the canonical (unrotated) pattern on `side`.
    #[must_use]
    pub const fn side(self, side: Side) -> Pattern {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Returns the pattern showing on `side` after rotating the piece
    /// clockwise by `rotation`.
    #[must_use]
    pub const fn pattern_at(self, side: Side, rotation: Rotation) -> Pattern {
        let canonical = (side.index() + 4 - rotation.quarter_turns()) % 4;
        self.side(Side::from_index(canonical))
    }

    /// Returns the number of border-sentinel edges (2 for corner pieces,
    /// 1 for edge pieces, 0 for interior pieces).
    #[must_use]
    pub fn border_edge_count(self) -> usize {
        Side::ALL
            .into_iter()
            .filter(|side| self.side(*side).is_border())
            .count()
    }

    /// Returns every rotation under which all four sides fall within the
    /// corresponding requirement set.
    #[must_use]
    pub fn rotations_matching(self, requirements: &SideRequirements) -> RotationSet {
        Rotation::ALL
            .into_iter()
            .filter(|rotation| {
                Side::ALL
                    .into_iter()
                    .all(|side| requirements[side.index()].contains(self.pattern_at(side, *rotation)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Piece {
        Piece::new(
            Pattern::new(1),
            Pattern::new(2),
            Pattern::new(3),
            Pattern::new(4),
        )
    }

    #[test]
    fn test_rotation_permutes_cyclically() {
        let piece = sample();
        // One clockwise quarter turn: top -> right -> bottom -> left -> top.
        assert_eq!(piece.pattern_at(Side::Right, Rotation::R90), Pattern::new(1));
        assert_eq!(piece.pattern_at(Side::Bottom, Rotation::R90), Pattern::new(2));
        assert_eq!(piece.pattern_at(Side::Left, Rotation::R90), Pattern::new(3));
        assert_eq!(piece.pattern_at(Side::Top, Rotation::R90), Pattern::new(4));
    }

    #[test]
    fn test_r0_is_canonical() {
        let piece = sample();
        for side in Side::ALL {
            assert_eq!(piece.pattern_at(side, Rotation::R0), piece.side(side));
        }
    }

    #[test]
    fn test_rotations_matching_wildcards() {
        let piece = sample();
        let requirements = [PatternSet::FULL; 4];
        assert_eq!(piece.rotations_matching(&requirements), RotationSet::all());
    }

    #[test]
    fn test_rotations_matching_pins_one_side() {
        let piece = sample();
        let mut requirements = [PatternSet::FULL; 4];
        requirements[Side::Top.index()] = PatternSet::singleton(Pattern::new(3));
        // Pattern 3 is canonically on the bottom, so only a 180° turn fits.
        assert_eq!(
            piece.rotations_matching(&requirements),
            RotationSet::singleton(Rotation::R180)
        );
    }

    #[test]
    fn test_rotations_matching_empty_when_impossible() {
        let piece = sample();
        let mut requirements = [PatternSet::FULL; 4];
        requirements[Side::Top.index()] = PatternSet::singleton(Pattern::new(9));
        assert!(piece.rotations_matching(&requirements).is_empty());
    }

    #[test]
    fn test_border_edge_count() {
        let corner = Piece::new(
            Pattern::BORDER,
            Pattern::new(1),
            Pattern::new(2),
            Pattern::BORDER,
        );
        assert_eq!(corner.border_edge_count(), 2);
        assert_eq!(sample().border_edge_count(), 0);
    }
}
