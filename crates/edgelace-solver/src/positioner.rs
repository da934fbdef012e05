//! Strategies choosing which slot to fill next.
//!
//! A [`Positioner`] is a persistent value: [`next_position`](Positioner::next_position)
//! returns the chosen position together with a successor positioner that
//! already excludes it, so search tree nodes can each hold their own
//! selection state without interfering with siblings.

use std::sync::Arc;

use edgelace_core::{Position, Side};
use tinyvec::ArrayVec;

use crate::board::Board;

/// A persistent slot-selection strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positioner {
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Fixed clockwise ring order from the top-left corner.
    Spiral {
        order: Arc<[Position]>,
        cursor: usize,
    },
    /// Minimum-remaining-candidates over every unvisited position.
    MinCandidates { visited: Vec<bool> },
    /// Minimum-remaining-candidates restricted to unvisited neighbors of
    /// visited positions, falling back to the full scan when that frontier
    /// is empty.
    FrontierMinCandidates {
        visited: Vec<bool>,
        frontier: Vec<bool>,
    },
}

impl Positioner {
    /// Creates the fixed spiral strategy for a `side_len` board: the outer
    /// ring clockwise starting at the top-left corner, then each inner ring
    /// in turn.
    #[must_use]
    pub fn spiral(side_len: u8) -> Self {
        Self {
            kind: Kind::Spiral {
                order: spiral_order(side_len),
                cursor: 0,
            },
        }
    }

    /// Creates the minimum-remaining-candidates strategy.
    #[must_use]
    pub fn min_candidates() -> Self {
        Self {
            kind: Kind::MinCandidates {
                visited: Vec::new(),
            },
        }
    }

    /// Creates the frontier-restricted minimum-remaining-candidates
    /// strategy.
    #[must_use]
    pub fn frontier_min_candidates() -> Self {
        Self {
            kind: Kind::FrontierMinCandidates {
                visited: Vec::new(),
                frontier: Vec::new(),
            },
        }
    }

    /// Picks the next position to fill on `board`.
    ///
    /// Returns the position and the successor positioner, or `None` once
    /// every position has been handed out.
    #[must_use]
    pub fn next_position(&self, board: &Board) -> Option<(Position, Self)> {
        let side_len = board.side_len();
        let total = usize::from(side_len) * usize::from(side_len);
        match &self.kind {
            Kind::Spiral { order, cursor } => {
                let position = *order.get(*cursor)?;
                let next = Self {
                    kind: Kind::Spiral {
                        order: Arc::clone(order),
                        cursor: cursor + 1,
                    },
                };
                Some((position, next))
            }
            Kind::MinCandidates { visited } => {
                let mut visited = resized(visited, total);
                let position = scan_min_candidates(board, &visited, None)?;
                visited[position.index(side_len)] = true;
                Some((
                    position,
                    Self {
                        kind: Kind::MinCandidates { visited },
                    },
                ))
            }
            Kind::FrontierMinCandidates { visited, frontier } => {
                let mut visited = resized(visited, total);
                let mut frontier = resized(frontier, total);
                let position = scan_min_candidates(board, &visited, Some(&frontier))
                    .or_else(|| scan_min_candidates(board, &visited, None))?;
                visited[position.index(side_len)] = true;
                frontier[position.index(side_len)] = false;
                let mut neighbors: ArrayVec<[Position; 4]> = ArrayVec::new();
                for side in Side::ALL {
                    if let Some(neighbor) = position.neighbor(side, side_len) {
                        neighbors.push(neighbor);
                    }
                }
                for neighbor in neighbors {
                    if !visited[neighbor.index(side_len)] {
                        frontier[neighbor.index(side_len)] = true;
                    }
                }
                Some((
                    position,
                    Self {
                        kind: Kind::FrontierMinCandidates { visited, frontier },
                    },
                ))
            }
        }
    }
}

fn resized(flags: &[bool], total: usize) -> Vec<bool> {
    let mut flags = flags.to_vec();
    flags.resize(total, false);
    flags
}

/// Scans unvisited positions (optionally restricted to `frontier`) for the
/// fewest remaining candidates, breaking ties by row-major traversal order
/// and short-circuiting on a count of one.
fn scan_min_candidates(
    board: &Board,
    visited: &[bool],
    frontier: Option<&[bool]>,
) -> Option<Position> {
    let side_len = board.side_len();
    let mut best: Option<(usize, Position)> = None;
    for position in Position::grid(side_len) {
        let index = position.index(side_len);
        if visited[index] {
            continue;
        }
        if let Some(frontier) = frontier {
            if !frontier[index] {
                continue;
            }
        }
        let count = board.slot(position).candidates().len();
        if count == 1 {
            return Some(position);
        }
        if best.is_none_or(|(fewest, _)| count < fewest) {
            best = Some((count, position));
        }
    }
    best.map(|(_, position)| position)
}

/// Precomputes the clockwise ring order: top edge left to right, right edge
/// top to bottom, bottom edge right to left, left edge bottom to top, then
/// the next ring inward.
fn spiral_order(side_len: u8) -> Arc<[Position]> {
    let mut order = Vec::with_capacity(usize::from(side_len) * usize::from(side_len));
    for ring in 0..side_len.div_ceil(2) {
        let low = ring;
        let high = side_len - 1 - ring;
        for x in low..=high {
            order.push(Position::new(x, low));
        }
        for y in (low + 1)..=high {
            order.push(Position::new(high, y));
        }
        if high > low {
            for x in (low..high).rev() {
                order.push(Position::new(x, high));
            }
            for y in ((low + 1)..high).rev() {
                order.push(Position::new(low, y));
            }
        }
    }
    order.into()
}
