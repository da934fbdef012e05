//! Full-board state: slot constraints plus committed placements.

use std::sync::Arc;

use edgelace_core::{PieceCatalogue, PieceSet, Position, RotationSet};

use crate::{
    propagate::{SlotMutation, WorkQueue, process_queue},
    slot::SlotConstraint,
};

/// A committed (or tentatively committed) assignment of one piece to one
/// position, together with the set of rotations still consistent with the
/// neighbor evidence seen so far. Ambiguity is preserved until forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Catalogue index of the placed piece.
    pub piece: u16,
    /// Rotations still consistent with current neighbor evidence.
    pub rotations: RotationSet,
}

/// The aggregate board: one [`SlotConstraint`] per position, the committed
/// placements, and used-piece bookkeeping.
///
/// `Board` is a persistent value: [`set_placement`](Self::set_placement)
/// returns a new, internally consistent board (or `None` when propagation
/// rejects the move) and never mutates `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    catalogue: Arc<PieceCatalogue>,
    slots: Vec<SlotConstraint>,
    placements: Vec<Option<Placement>>,
    /// Pieces not yet committed anywhere; the complement is exactly the set
    /// of used pieces.
    free: PieceSet,
}

impl Board {
    /// Creates the empty board for `catalogue`, with border-facing sides
    /// already pinned to the sentinel pattern.
    #[must_use]
    pub fn new(catalogue: Arc<PieceCatalogue>) -> Self {
        let slots = Position::grid(catalogue.side_len())
            .map(|position| SlotConstraint::initial(position, &catalogue))
            .collect();
        let count = catalogue.len();
        #[expect(clippy::cast_possible_truncation)]
        let free = PieceSet::all(count as u16);
        Self {
            placements: vec![None; count],
            slots,
            free,
            catalogue,
        }
    }

    /// Returns the piece catalogue this board is solving.
    #[must_use]
    pub fn catalogue(&self) -> &Arc<PieceCatalogue> {
        &self.catalogue
    }

    /// Returns the board side length L.
    #[must_use]
    pub fn side_len(&self) -> u8 {
        self.catalogue.side_len()
    }

    /// Returns the constraint state of the slot at `position`.
    #[must_use]
    pub fn slot(&self, position: Position) -> &SlotConstraint {
        &self.slots[position.index(self.side_len())]
    }

    /// Returns the committed placement at `position`, if any.
    #[must_use]
    pub fn placement_at(&self, position: Position) -> Option<Placement> {
        self.placements[position.index(self.side_len())]
    }

    /// Returns `true` when `piece` is committed somewhere on the board.
    #[must_use]
    pub fn is_used(&self, piece: u16) -> bool {
        !self.free.contains(piece)
    }

    /// Returns the number of filled positions.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.placements.iter().filter(|p| p.is_some()).count()
    }

    /// Returns `true` when every position holds a committed placement.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.placements.iter().all(Option::is_some)
    }

    /// Iterates `(position, placement)` for every filled position in
    /// row-major order.
    pub fn placements(&self) -> impl Iterator<Item = (Position, Placement)> + '_ {
        let side_len = self.side_len();
        self.placements
            .iter()
            .enumerate()
            .filter_map(move |(index, placement)| {
                placement.map(|p| (Position::from_index(index, side_len), p))
            })
    }

    /// Commits `placement` at `position` and propagates to a fixed point.
    ///
    /// Returns `None` when propagation finds the move inconsistent; the
    /// receiver is left untouched either way. Re-committing the same piece
    /// with a narrower rotation set is allowed and is how rotation evidence
    /// is refined.
    ///
    /// # Panics
    ///
    /// Panics on caller contract violations: committing a *different* piece
    /// at an already-filled position, or a piece already used at another
    /// position. The placement algorithm is responsible for never making
    /// such calls, so these indicate a bug, not a search dead end.
    #[must_use]
    pub fn set_placement(&self, position: Position, placement: Placement) -> Option<Self> {
        let index = position.index(self.side_len());
        if let Some(existing) = self.placements[index] {
            assert_eq!(
                existing.piece, placement.piece,
                "position {position} already holds piece {}",
                existing.piece
            );
        } else {
            assert!(
                !self.is_used(placement.piece),
                "piece {} is already used at another position",
                placement.piece
            );
        }

        let mut queue = WorkQueue::new();
        queue.push_back((position, SlotMutation::Place(placement)));
        for other in Position::grid(self.side_len()) {
            if other != position {
                queue.push_back((other, SlotMutation::RemoveCandidate(placement.piece)));
            }
        }

        let mut slots = self.slots.clone();
        if !process_queue(&mut slots, queue, &self.catalogue) {
            return None;
        }

        let mut placements = self.placements.clone();
        placements[index] = Some(placement);
        Some(Self {
            catalogue: Arc::clone(&self.catalogue),
            slots,
            placements,
            free: self.free.remove(placement.piece),
        })
    }
}

#[cfg(test)]
mod tests {
    use edgelace_core::{Pattern, PatternSet, RotationSet, Side};

    use super::*;
    use crate::testing::grid_catalogue;

    fn new_board(side_len: u8) -> Board {
        Board::new(Arc::new(grid_catalogue(side_len)))
    }

    fn corner_placement(board: &Board, position: Position) -> Placement {
        let mut requirements = [PatternSet::FULL; 4];
        for side in Side::ALL {
            if position.is_border_side(side, board.side_len()) {
                requirements[side.index()] = PatternSet::singleton(Pattern::BORDER);
            }
        }
        let piece = board
            .slot(position)
            .candidates()
            .iter()
            .next()
            .expect("corner slot has candidates");
        Placement {
            piece,
            rotations: board.catalogue().piece(piece).rotations_matching(&requirements),
        }
    }

    #[test]
    fn test_new_board_is_unfilled() {
        let board = new_board(4);
        assert!(!board.is_complete());
        assert_eq!(board.filled_count(), 0);
        assert_eq!(board.placements().count(), 0);
        for piece in 0..16 {
            assert!(!board.is_used(piece));
        }
    }

    #[test]
    fn test_set_placement_commits_and_marks_used() {
        let board = new_board(4);
        let target = Position::new(0, 0);
        let placement = corner_placement(&board, target);
        let next = board.set_placement(target, placement).expect("legal move");

        assert_eq!(next.placement_at(target), Some(placement));
        assert!(next.is_used(placement.piece));
        assert_eq!(next.filled_count(), 1);
        // The original is untouched.
        assert_eq!(board.filled_count(), 0);
        assert!(!board.is_used(placement.piece));
        // No other slot still lists the piece.
        for position in Position::grid(4) {
            if position != target {
                assert!(!next.slot(position).candidates().contains(placement.piece));
            }
        }
    }

    #[test]
    fn test_recommit_same_piece_narrower_rotations() {
        let board = new_board(4);
        let target = Position::new(0, 0);
        let placement = corner_placement(&board, target);
        let next = board.set_placement(target, placement).expect("legal move");
        // Re-committing the identical placement must stay legal.
        let again = next.set_placement(target, placement).expect("idempotent");
        assert_eq!(again.placement_at(target), Some(placement));
    }

    #[test]
    #[should_panic(expected = "already holds piece")]
    fn test_different_piece_at_filled_position_panics() {
        let board = new_board(4);
        let target = Position::new(0, 0);
        let placement = corner_placement(&board, target);
        let next = board.set_placement(target, placement).expect("legal move");
        let other = Placement {
            piece: placement.piece + 1,
            rotations: RotationSet::all(),
        };
        let _ = next.set_placement(target, other);
    }

    #[test]
    #[should_panic(expected = "already used")]
    fn test_reusing_piece_elsewhere_panics() {
        let board = new_board(4);
        let target = Position::new(0, 0);
        let placement = corner_placement(&board, target);
        let next = board.set_placement(target, placement).expect("legal move");
        let _ = next.set_placement(Position::new(2, 2), placement);
    }
}
