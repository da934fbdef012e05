//! The piece-placement algorithm.
//!
//! [`try_add_piece`] is the single point where global move acceptance is
//! decided. It computes the rotations a piece can survive at a position,
//! commits through the board's propagation, narrows the rotation sets of
//! ambiguous neighbors against the new evidence, and then follows the
//! forced-singleton cascade: any unfilled slot left with exactly one
//! candidate must receive that piece before the move is considered
//! complete. The cascade is an explicit loop rather than recursion since a
//! forced chain can run across most of the board.

use derive_more::{Display, Error};
use edgelace_core::{Pattern, PatternSet, Position, Side, SideRequirements};
use log::trace;

use crate::board::{Board, Placement};

/// Invariant violations surfaced by the placement algorithm.
///
/// These indicate a bug in the propagation engine, not an ordinary search
/// dead end; expected search failure is reported as `Ok(None)`.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    /// A previously validated placement lost every rotation when re-checked
    /// against updated neighbor evidence.
    #[display("placed piece at {position} has no surviving rotation")]
    RotationContradiction {
        /// Position of the placement that became impossible.
        position: Position,
    },
    /// An unfilled slot with an empty candidate set survived propagation.
    /// Propagation must reject such boards before they are ever returned.
    #[display("unfilled slot {position} has an empty candidate set")]
    EmptySlotEscaped {
        /// Position of the over-constrained slot.
        position: Position,
    },
}

/// Attempts to commit `piece` at `position`, cascading forced placements.
///
/// Returns the accepted board, `Ok(None)` when the move is illegal, or a
/// [`SolverError`] when an invariant violation is detected.
///
/// # Errors
///
/// Returns [`SolverError::RotationContradiction`] if a committed neighbor
/// loses every rotation after a supposedly validated placement, and
/// [`SolverError::EmptySlotEscaped`] if an over-constrained slot survives
/// propagation; the constraint engine should have rejected either branch
/// earlier.
pub fn try_add_piece(
    board: &Board,
    position: Position,
    piece: u16,
) -> Result<Option<Board>, SolverError> {
    let mut current = board.clone();
    let mut next = Some((position, piece));

    while let Some((target, candidate)) = next.take() {
        let Some(accepted) = place_once(&current, target, candidate)? else {
            return Ok(None);
        };
        current = accepted;

        // Forced-singleton scan: any unfilled slot down to one candidate
        // must take it next. Two slots forced to the same piece cannot both
        // be satisfied.
        let mut forced: Vec<(Position, u16)> = Vec::new();
        for slot_position in Position::grid(current.side_len()) {
            if current.placement_at(slot_position).is_some() {
                continue;
            }
            let candidates = current.slot(slot_position).candidates();
            if candidates.is_empty() {
                return Err(SolverError::EmptySlotEscaped {
                    position: slot_position,
                });
            }
            if let Some(single) = candidates.as_single() {
                forced.push((slot_position, single));
            }
        }
        let mut forced_pieces: Vec<u16> = forced.iter().map(|(_, piece)| *piece).collect();
        forced_pieces.sort_unstable();
        if forced_pieces.windows(2).any(|pair| pair[0] == pair[1]) {
            trace!("two slots forced to the same piece; rejecting");
            return Ok(None);
        }
        next = forced.first().copied();
    }

    Ok(Some(current))
}

/// One placement attempt without the cascade: rotation selection, commit,
/// and neighbor rotation narrowing.
fn place_once(
    board: &Board,
    position: Position,
    piece: u16,
) -> Result<Option<Board>, SolverError> {
    if let Some(existing) = board.placement_at(position) {
        if existing.piece == piece {
            return Ok(Some(board.clone()));
        }
        return Ok(None);
    }
    if !board.slot(position).candidates().contains(piece) || board.is_used(piece) {
        return Ok(None);
    }

    let requirements = side_requirements(board, position);
    let rotations = board.catalogue().piece(piece).rotations_matching(&requirements);
    if rotations.is_empty() {
        return Ok(None);
    }

    let Some(committed) = board.set_placement(position, Placement { piece, rotations }) else {
        return Ok(None);
    };

    narrow_neighbor_rotations(committed, position)
}

/// Re-checks every ambiguous placed neighbor of `position` against the
/// updated evidence, re-committing with a narrower rotation set when the
/// recomputation shrinks it.
fn narrow_neighbor_rotations(
    mut board: Board,
    position: Position,
) -> Result<Option<Board>, SolverError> {
    let side_len = board.side_len();
    for side in Side::ALL {
        let Some(neighbor) = position.neighbor(side, side_len) else {
            continue;
        };
        let Some(placement) = board.placement_at(neighbor) else {
            continue;
        };
        if placement.rotations.len() <= 1 {
            continue;
        }
        let requirements = side_requirements(&board, neighbor);
        let surviving = board
            .catalogue()
            .piece(placement.piece)
            .rotations_matching(&requirements)
            & placement.rotations;
        if surviving.is_empty() {
            return Err(SolverError::RotationContradiction { position: neighbor });
        }
        if surviving != placement.rotations {
            let narrowed = Placement {
                piece: placement.piece,
                rotations: surviving,
            };
            let Some(updated) = board.set_placement(neighbor, narrowed) else {
                return Ok(None);
            };
            board = updated;
        }
    }
    Ok(Some(board))
}

/// Computes the pattern requirement for each side of `position`: the border
/// sentinel on outward-facing sides, the facing patterns of a committed
/// neighbor under each of its surviving rotations, and a wildcard
/// otherwise.
fn side_requirements(board: &Board, position: Position) -> SideRequirements {
    let side_len = board.side_len();
    let mut requirements = [PatternSet::FULL; 4];
    for side in Side::ALL {
        let Some(neighbor) = position.neighbor(side, side_len) else {
            requirements[side.index()] = PatternSet::singleton(Pattern::BORDER);
            continue;
        };
        let Some(placement) = board.placement_at(neighbor) else {
            continue;
        };
        let neighbor_piece = board.catalogue().piece(placement.piece);
        let mut facing = PatternSet::EMPTY;
        for rotation in placement.rotations.rotations() {
            facing.insert(neighbor_piece.pattern_at(side.opposite(), rotation));
        }
        requirements[side.index()] = facing;
    }
    requirements
}
