//! Whole-board arc-consistency propagation.
//!
//! [`process_queue`] drains a FIFO worklist of per-slot mutations until the
//! board reaches a fixed point or a contradiction surfaces. Propagation
//! failure means the caller's attempted move is illegal; it is reported by
//! returning `false`, never by panicking, so the search can treat it as an
//! ordinary dead end.

use std::collections::VecDeque;
use std::mem;

use edgelace_core::{PatternSet, PieceCatalogue, PieceSet, Position, Side};
use log::trace;

use crate::{board::Placement, slot::SlotConstraint};

/// One pending update to a single slot.
#[derive(Debug, Clone)]
pub(crate) enum SlotMutation {
    /// Commit a placement into the slot.
    Place(Placement),
    /// Intersect one side's admitted patterns.
    ConstrainSide {
        /// Side of the *target* slot to constrain.
        side: Side,
        /// Patterns the neighbor across that side still shows.
        allowed: PatternSet,
    },
    /// Drop a piece from the slot's candidates.
    RemoveCandidate(u16),
}

/// FIFO worklist of slot mutations.
pub(crate) type WorkQueue = VecDeque<(Position, SlotMutation)>;

/// Drains `queue` against `slots`, propagating side shrinkage to neighbors,
/// broadcasting forced singletons, and applying naked-pair elimination.
///
/// Returns `false` when any slot's candidate set empties or three or more
/// slots compete for the same two-piece candidate set; the caller must then
/// discard the mutated `slots`.
pub(crate) fn process_queue(
    slots: &mut [SlotConstraint],
    mut queue: WorkQueue,
    catalogue: &PieceCatalogue,
) -> bool {
    let side_len = catalogue.side_len();
    let mut pair_watch: Vec<Position> = Vec::new();

    loop {
        while let Some((position, mutation)) = queue.pop_front() {
            let index = position.index(side_len);
            let updated = match &mutation {
                SlotMutation::Place(placement) => slots[index].with_placement(*placement, catalogue),
                SlotMutation::ConstrainSide { side, allowed } => {
                    slots[index].with_side_constrained(*side, *allowed, catalogue)
                }
                SlotMutation::RemoveCandidate(piece) => {
                    slots[index].with_candidate_removed(*piece, catalogue)
                }
            };
            if updated.is_equivalent_to(&slots[index]) {
                continue;
            }
            if updated.candidates().is_empty() {
                trace!("slot {position} lost every candidate; rejecting");
                return false;
            }
            let before_len = slots[index].candidates().len();
            let after_len = updated.candidates().len();
            if after_len == 1 && before_len > 1 {
                if let Some(forced) = updated.candidates().as_single() {
                    for other in Position::grid(side_len) {
                        if other != position {
                            queue.push_back((other, SlotMutation::RemoveCandidate(forced)));
                        }
                    }
                }
            }
            if after_len == 2 && before_len > 2 {
                pair_watch.push(position);
            }
            for side in Side::ALL {
                if updated.side(side) != slots[index].side(side) {
                    if let Some(neighbor) = position.neighbor(side, side_len) {
                        queue.push_back((
                            neighbor,
                            SlotMutation::ConstrainSide {
                                side: side.opposite(),
                                allowed: updated.side(side),
                            },
                        ));
                    }
                }
            }
            slots[index] = updated;
        }

        if !naked_pair_pass(slots, &mut queue, mem::take(&mut pair_watch), side_len) {
            return false;
        }
        if queue.is_empty() {
            return true;
        }
    }
}

/// For every watched slot still holding exactly two candidates, looks for
/// other slots with the identical pair. One match: the pair is owned by
/// those two slots, so both pieces are enqueued for removal everywhere
/// else. More than one match: three slots competing for two pieces, a
/// contradiction.
fn naked_pair_pass(
    slots: &[SlotConstraint],
    queue: &mut WorkQueue,
    watch: Vec<Position>,
    side_len: u8,
) -> bool {
    for position in watch {
        let pair: &PieceSet = slots[position.index(side_len)].candidates();
        if pair.len() != 2 {
            continue;
        }
        let matches: Vec<Position> = Position::grid(side_len)
            .filter(|other| {
                *other != position && slots[other.index(side_len)].candidates() == pair
            })
            .collect();
        match matches.as_slice() {
            [] => {}
            [partner] => {
                trace!("naked pair at {position} and {partner}");
                for third in Position::grid(side_len) {
                    if third != position && third != *partner {
                        for piece in pair {
                            queue.push_back((third, SlotMutation::RemoveCandidate(piece)));
                        }
                    }
                }
            }
            _ => {
                trace!("naked pair at {position} matched {} slots; rejecting", matches.len());
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use edgelace_core::{Pattern, Piece, Rotation};

    use super::*;
    use crate::testing::grid_catalogue;

    fn initial_slots(catalogue: &PieceCatalogue) -> Vec<SlotConstraint> {
        Position::grid(catalogue.side_len())
            .map(|position| SlotConstraint::initial(position, catalogue))
            .collect()
    }

    fn corner_placement(catalogue: &PieceCatalogue) -> Placement {
        let mut requirements = [PatternSet::FULL; 4];
        requirements[Side::Top.index()] = PatternSet::singleton(Pattern::BORDER);
        requirements[Side::Left.index()] = PatternSet::singleton(Pattern::BORDER);
        let piece = (0..u16::try_from(catalogue.len()).unwrap())
            .find(|i| !catalogue.piece(*i).rotations_matching(&requirements).is_empty())
            .unwrap();
        Placement {
            piece,
            rotations: catalogue.piece(piece).rotations_matching(&requirements),
        }
    }

    #[test]
    fn test_place_seeds_neighbor_constraints() {
        let catalogue = grid_catalogue(4);
        let mut slots = initial_slots(&catalogue);
        let placement = corner_placement(&catalogue);
        let target = Position::new(0, 0);

        let mut queue = WorkQueue::new();
        queue.push_back((target, SlotMutation::Place(placement)));
        for other in Position::grid(4) {
            if other != target {
                queue.push_back((other, SlotMutation::RemoveCandidate(placement.piece)));
            }
        }
        assert!(process_queue(&mut slots, queue, &catalogue));

        // The placed slot collapsed and its right neighbor only admits the
        // facing pattern on its left side.
        assert_eq!(slots[0].candidates().as_single(), Some(placement.piece));
        let rotation = placement.rotations.as_single().unwrap();
        let facing = catalogue.piece(placement.piece).pattern_at(Side::Right, rotation);
        let neighbor = &slots[Position::new(1, 0).index(4)];
        assert!(neighbor.side(Side::Left).is_subset(PatternSet::singleton(facing)));
        // No other slot still lists the placed piece.
        for position in Position::grid(4) {
            if position != target {
                assert!(!slots[position.index(4)].candidates().contains(placement.piece));
            }
        }
    }

    #[test]
    fn test_arc_consistency_invariant_after_propagation() {
        let catalogue = grid_catalogue(4);
        let mut slots = initial_slots(&catalogue);
        let placement = corner_placement(&catalogue);

        let mut queue = WorkQueue::new();
        queue.push_back((Position::new(0, 0), SlotMutation::Place(placement)));
        for other in Position::grid(4) {
            if other != Position::new(0, 0) {
                queue.push_back((other, SlotMutation::RemoveCandidate(placement.piece)));
            }
        }
        assert!(process_queue(&mut slots, queue, &catalogue));

        for position in Position::grid(4) {
            let slot = &slots[position.index(4)];
            for index in slot.candidates() {
                let piece = catalogue.piece(index);
                let supported = Rotation::ALL.into_iter().any(|rotation| {
                    Side::ALL
                        .into_iter()
                        .all(|side| slot.side(side).contains(piece.pattern_at(side, rotation)))
                });
                assert!(supported, "piece {index} unsupported at {position}");
            }
        }
    }

    #[test]
    fn test_contradictory_constraint_returns_false() {
        let catalogue = grid_catalogue(4);
        let mut slots = initial_slots(&catalogue);
        let mut queue = WorkQueue::new();
        queue.push_back((
            Position::new(1, 1),
            SlotMutation::ConstrainSide {
                side: Side::Left,
                allowed: PatternSet::EMPTY,
            },
        ));
        assert!(!process_queue(&mut slots, queue, &catalogue));
    }

    #[test]
    fn test_three_identical_pairs_rejected() {
        // Four identical interior pieces on a 2x2 of wildcard-ish slots:
        // force three slots down to the same two candidates.
        let piece = Piece::new(
            Pattern::new(1),
            Pattern::new(1),
            Pattern::new(1),
            Pattern::new(1),
        );
        let catalogue = PieceCatalogue::from_pieces(vec![piece; 4]).unwrap();
        let mut slots: Vec<SlotConstraint> = Position::grid(2)
            .map(|_| {
                SlotConstraint::from_parts(
                    edgelace_core::PieceSet::all(4),
                    [catalogue.patterns(); 4],
                )
            })
            .collect();
        let mut queue = WorkQueue::new();
        for position in [Position::new(0, 0), Position::new(1, 0), Position::new(0, 1)] {
            queue.push_back((position, SlotMutation::RemoveCandidate(0)));
            queue.push_back((position, SlotMutation::RemoveCandidate(1)));
        }
        assert!(!process_queue(&mut slots, queue, &catalogue));
    }

    #[test]
    fn test_single_naked_pair_eliminates_elsewhere() {
        let piece = Piece::new(
            Pattern::new(1),
            Pattern::new(1),
            Pattern::new(1),
            Pattern::new(1),
        );
        let catalogue = PieceCatalogue::from_pieces(vec![piece; 9]).unwrap();
        let mut slots: Vec<SlotConstraint> = Position::grid(3)
            .map(|_| {
                SlotConstraint::from_parts(
                    edgelace_core::PieceSet::all(9),
                    [catalogue.patterns(); 4],
                )
            })
            .collect();
        // Slots (0,0) and (1,0) each keep only pieces {7, 8}.
        let mut queue = WorkQueue::new();
        for position in [Position::new(0, 0), Position::new(1, 0)] {
            for piece in 0..7u16 {
                queue.push_back((position, SlotMutation::RemoveCandidate(piece)));
            }
        }
        assert!(process_queue(&mut slots, queue, &catalogue));
        for position in Position::grid(3) {
            let candidates = slots[position.index(3)].candidates();
            if position == Position::new(0, 0) || position == Position::new(1, 0) {
                assert_eq!(candidates.len(), 2);
            } else {
                assert!(!candidates.contains(7));
                assert!(!candidates.contains(8));
                assert_eq!(candidates.len(), 7);
            }
        }
    }

    #[test]
    fn test_rotation_narrowing_placement_is_applied() {
        let catalogue = grid_catalogue(4);
        let mut slots = initial_slots(&catalogue);
        let placement = corner_placement(&catalogue);
        let mut queue = WorkQueue::new();
        queue.push_back((Position::new(0, 0), SlotMutation::Place(placement)));
        assert!(process_queue(&mut slots, queue, &catalogue));

        // Re-committing the identical placement is a no-op.
        let mut slots_again = slots.clone();
        let mut queue = WorkQueue::new();
        queue.push_back((Position::new(0, 0), SlotMutation::Place(placement)));
        assert!(process_queue(&mut slots_again, queue, &catalogue));
        for (before, after) in slots.iter().zip(&slots_again) {
            assert!(before.is_equivalent_to(after));
        }
    }
}
