//! Per-slot constraint state and the slot-local fixed point.
//!
//! A [`SlotConstraint`] pairs the candidate pieces still assignable to one
//! grid position with the edge patterns each side of that position still
//! admits. The two halves constrain each other: a candidate needs at least
//! one rotation whose four sides all fall within the side sets, and a side
//! set only keeps patterns realizable by some surviving candidate. All
//! operations are pure and return new values; whole-board consistency is
//! the propagation queue's job (see [`propagate`](crate::propagate)).

use edgelace_core::{Pattern, PatternSet, PieceCatalogue, PieceSet, Position, Rotation, Side};

use crate::board::Placement;

/// Constraint state for a single grid position.
///
/// Invariant: every piece in `candidates` has at least one rotation whose
/// four side patterns are contained in the corresponding side sets. The
/// candidate set shrinks monotonically and must never legally become empty;
/// an empty set signals a contradiction and the enclosing board must be
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotConstraint {
    candidates: PieceSet,
    sides: [PatternSet; 4],
}

impl SlotConstraint {
    /// Builds the initial constraint for `position`: every piece is a
    /// candidate, border-facing sides admit only the sentinel, interior
    /// sides admit every interior pattern of the catalogue. The slot-local
    /// fixed point is applied once so the invariant holds from the start.
    #[must_use]
    pub fn initial(position: Position, catalogue: &PieceCatalogue) -> Self {
        let side_len = catalogue.side_len();
        let border = PatternSet::singleton(Pattern::BORDER);
        let interior = catalogue.interior_patterns();
        let sides = [Side::Top, Side::Right, Side::Bottom, Side::Left].map(|side| {
            if position.is_border_side(side, side_len) {
                border
            } else {
                interior
            }
        });
        #[expect(clippy::cast_possible_truncation)]
        let candidates = PieceSet::all(catalogue.len() as u16);
        let (candidates, sides) = fixed_point(candidates, sides, catalogue);
        Self { candidates, sides }
    }

    /// Assembles a slot from raw parts. Test-oriented; production slots are
    /// built by [`initial`](Self::initial) and the pure update operations.
    pub(crate) const fn from_parts(candidates: PieceSet, sides: [PatternSet; 4]) -> Self {
        Self { candidates, sides }
    }

    /// Returns the candidate pieces.
    #[must_use]
    pub fn candidates(&self) -> &PieceSet {
        &self.candidates
    }

    /// Returns the patterns still admitted on `side`.
    #[must_use]
    pub fn side(&self, side: Side) -> PatternSet {
        self.sides[side.index()]
    }

    /// Commits `placement` into the slot: candidates collapse to the placed
    /// piece, and each side set is intersected with the patterns that piece
    /// shows under any of the placement's surviving rotations.
    #[must_use]
    pub fn with_placement(&self, placement: Placement, catalogue: &PieceCatalogue) -> Self {
        let piece = catalogue.piece(placement.piece);
        let mut sides = self.sides;
        for side in Side::ALL {
            let mut shown = PatternSet::EMPTY;
            for rotation in placement.rotations.rotations() {
                shown.insert(piece.pattern_at(side, rotation));
            }
            sides[side.index()] &= shown;
        }
        Self {
            candidates: PieceSet::singleton(placement.piece),
            sides,
        }
    }

    /// Intersects one side set with `allowed`, then restores the slot-local
    /// fixed point. A constraint that is already a superset is a no-op
    /// returning a value sharing storage with `self`.
    #[must_use]
    pub fn with_side_constrained(
        &self,
        side: Side,
        allowed: PatternSet,
        catalogue: &PieceCatalogue,
    ) -> Self {
        let narrowed = self.sides[side.index()] & allowed;
        if narrowed == self.sides[side.index()] {
            return self.clone();
        }
        let mut sides = self.sides;
        sides[side.index()] = narrowed;
        let (candidates, sides) = fixed_point(self.candidates.clone(), sides, catalogue);
        Self { candidates, sides }
    }

    /// Removes one candidate piece and re-derives the side sets from the
    /// reduced candidate set (the cheap direction of the fixed point).
    #[must_use]
    pub fn with_candidate_removed(&self, piece: u16, catalogue: &PieceCatalogue) -> Self {
        let candidates = self.candidates.remove(piece);
        if candidates.ptr_eq(&self.candidates) {
            return self.clone();
        }
        let sides = shrink_sides(&candidates, self.sides, catalogue);
        Self { candidates, sides }
    }

    /// Contents comparison with an identity short-circuit on the candidate
    /// storage, since most propagation steps change nothing.
    #[must_use]
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        (self.candidates.ptr_eq(&other.candidates) || self.candidates == other.candidates)
            && self.sides == other.sides
    }
}

/// Drops candidates without a supporting rotation, then shrinks each side
/// set to the patterns some surviving candidate can actually show there,
/// alternating until both halves are stable.
fn fixed_point(
    mut candidates: PieceSet,
    mut sides: [PatternSet; 4],
    catalogue: &PieceCatalogue,
) -> (PieceSet, [PatternSet; 4]) {
    loop {
        let supported = drop_unsupported(&candidates, sides, catalogue);
        let shrunk = shrink_sides(&supported, sides, catalogue);
        let stable = supported.ptr_eq(&candidates) && shrunk == sides;
        candidates = supported;
        sides = shrunk;
        if stable {
            return (candidates, sides);
        }
    }
}

fn drop_unsupported(
    candidates: &PieceSet,
    sides: [PatternSet; 4],
    catalogue: &PieceCatalogue,
) -> PieceSet {
    let mut reduced = candidates.clone();
    for index in candidates {
        if catalogue.piece(index).rotations_matching(&sides).is_empty() {
            reduced = reduced.remove(index);
        }
    }
    reduced
}

/// For each side, unions the pattern each candidate shows there under every
/// rotation satisfying the other three sides, then intersects with the
/// current side set.
fn shrink_sides(
    candidates: &PieceSet,
    sides: [PatternSet; 4],
    catalogue: &PieceCatalogue,
) -> [PatternSet; 4] {
    let mut shrunk = [PatternSet::EMPTY; 4];
    for index in candidates {
        let piece = catalogue.piece(index);
        for rotation in Rotation::ALL {
            for side in Side::ALL {
                let others_ok = Side::ALL.into_iter().all(|other| {
                    other == side
                        || sides[other.index()].contains(piece.pattern_at(other, rotation))
                });
                if others_ok {
                    shrunk[side.index()].insert(piece.pattern_at(side, rotation));
                }
            }
        }
    }
    [Side::Top, Side::Right, Side::Bottom, Side::Left]
        .map(|side| shrunk[side.index()] & sides[side.index()])
}

#[cfg(test)]
mod tests {
    use edgelace_core::{Piece, RotationSet};

    use super::*;
    use crate::testing::grid_catalogue;

    fn corner_requirement_sides() -> [PatternSet; 4] {
        [
            PatternSet::singleton(Pattern::BORDER),
            PatternSet::FULL,
            PatternSet::FULL,
            PatternSet::singleton(Pattern::BORDER),
        ]
    }

    #[test]
    fn test_initial_corner_slot_keeps_only_corner_pieces() {
        let catalogue = grid_catalogue(4);
        let slot = SlotConstraint::initial(Position::new(0, 0), &catalogue);
        for index in slot.candidates() {
            assert_eq!(
                catalogue.piece(index).border_edge_count(),
                2,
                "piece {index} is not a corner piece"
            );
        }
        assert_eq!(slot.candidates().len(), 4);
    }

    #[test]
    fn test_initial_interior_slot_excludes_border_pieces() {
        let catalogue = grid_catalogue(4);
        let slot = SlotConstraint::initial(Position::new(1, 1), &catalogue);
        for index in slot.candidates() {
            assert_eq!(catalogue.piece(index).border_edge_count(), 0);
        }
        assert_eq!(slot.candidates().len(), 4);
    }

    #[test]
    fn test_initial_edge_slot_patterns() {
        let catalogue = grid_catalogue(4);
        let slot = SlotConstraint::initial(Position::new(1, 0), &catalogue);
        assert_eq!(slot.side(Side::Top), PatternSet::singleton(Pattern::BORDER));
        assert!(!slot.side(Side::Bottom).contains(Pattern::BORDER));
    }

    #[test]
    fn test_with_placement_collapses_candidates() {
        let catalogue = grid_catalogue(4);
        let slot = SlotConstraint::initial(Position::new(0, 0), &catalogue);
        let piece = slot.candidates().iter().next().unwrap();
        let sides = corner_requirement_sides();
        let mut requirements = [PatternSet::FULL; 4];
        requirements[Side::Top.index()] = sides[0];
        requirements[Side::Left.index()] = sides[3];
        let rotations = catalogue.piece(piece).rotations_matching(&requirements);
        let placed = slot.with_placement(
            Placement {
                piece,
                rotations,
            },
            &catalogue,
        );
        assert_eq!(placed.candidates().as_single(), Some(piece));
        // The right side now admits only the placed piece's facing pattern.
        let rotation = rotations.as_single().unwrap();
        let facing = catalogue.piece(piece).pattern_at(Side::Right, rotation);
        assert_eq!(placed.side(Side::Right), PatternSet::singleton(facing));
    }

    #[test]
    fn test_constrain_side_is_noop_for_superset() {
        let catalogue = grid_catalogue(4);
        let slot = SlotConstraint::initial(Position::new(1, 1), &catalogue);
        let widened = slot.with_side_constrained(Side::Top, PatternSet::FULL, &catalogue);
        assert!(widened.is_equivalent_to(&slot));
    }

    #[test]
    fn test_constrain_side_drops_unsupported_candidates() {
        let catalogue = grid_catalogue(4);
        let slot = SlotConstraint::initial(Position::new(1, 1), &catalogue);
        let admitted = slot.side(Side::Left);
        let keep = admitted.iter().next().unwrap();
        let constrained =
            slot.with_side_constrained(Side::Left, PatternSet::singleton(keep), &catalogue);
        assert!(constrained.candidates().len() < slot.candidates().len());
        for index in constrained.candidates() {
            let piece = catalogue.piece(index);
            let has_support = Rotation::ALL.into_iter().any(|rotation| {
                Side::ALL.into_iter().all(|side| {
                    constrained.side(side).contains(piece.pattern_at(side, rotation))
                })
            });
            assert!(has_support, "candidate {index} lost all rotations");
        }
    }

    #[test]
    fn test_remove_candidate_is_noop_for_non_member() {
        let catalogue = grid_catalogue(4);
        let slot = SlotConstraint::initial(Position::new(0, 0), &catalogue);
        let interior_piece = (0..catalogue.len() as u16)
            .find(|i| catalogue.piece(*i).border_edge_count() == 0)
            .unwrap();
        let unchanged = slot.with_candidate_removed(interior_piece, &catalogue);
        assert!(unchanged.is_equivalent_to(&slot));
    }

    #[test]
    fn test_fixed_point_on_impossible_side_empties_candidates() {
        let pieces = vec![
            Piece::new(Pattern::BORDER, Pattern::new(1), Pattern::new(2), Pattern::BORDER);
            4
        ];
        let catalogue = PieceCatalogue::from_pieces(pieces).unwrap();
        let slot = SlotConstraint::initial(Position::new(0, 0), &catalogue);
        let constrained = slot.with_side_constrained(
            Side::Right,
            PatternSet::singleton(Pattern::new(9)),
            &catalogue,
        );
        assert!(constrained.candidates().is_empty());
    }

    #[test]
    fn test_placement_with_ambiguous_rotations_keeps_union() {
        // A piece with identical opposite edges stays rotationally ambiguous.
        let symmetric = Piece::new(
            Pattern::new(1),
            Pattern::new(2),
            Pattern::new(1),
            Pattern::new(2),
        );
        let pieces = vec![symmetric; 4];
        let catalogue = PieceCatalogue::from_pieces(pieces).unwrap();
        let slot = SlotConstraint {
            candidates: PieceSet::all(4),
            sides: [catalogue.patterns(); 4],
        };
        let placed = slot.with_placement(
            Placement {
                piece: 0,
                rotations: RotationSet::R0 | RotationSet::R90,
            },
            &catalogue,
        );
        // Under R0 the top shows 1, under R90 it shows 2: both stay admitted.
        assert!(placed.side(Side::Top).contains(Pattern::new(1)));
        assert!(placed.side(Side::Top).contains(Pattern::new(2)));
    }
}
