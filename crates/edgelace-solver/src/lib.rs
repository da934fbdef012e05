//! Constraint propagation and piece placement for edge-matching puzzles.
//!
//! The crate is layered bottom-up:
//!
//! - [`slot`]: [`SlotConstraint`], the per-position candidate and
//!   side-pattern state with its local fixed point.
//! - [`board`]: [`Board`], the whole-grid aggregate whose
//!   [`set_placement`](Board::set_placement) commits a move and propagates
//!   to global arc consistency.
//! - [`place`]: [`try_add_piece`], the placement algorithm with rotation
//!   selection, neighbor rotation narrowing, and the forced-singleton
//!   cascade.
//! - [`positioner`]: [`Positioner`] strategies choosing which slot a search
//!   should fill next.
//!
//! Boards are persistent values: committing a move never mutates the
//! original, so search code can keep as many alternative boards alive as it
//! needs.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use edgelace_solver::{Board, Positioner, testing::grid_catalogue, try_add_piece};
//!
//! let board = Board::new(Arc::new(grid_catalogue(4)));
//! let (position, _) = Positioner::spiral(4).next_position(&board).unwrap();
//! let piece = board.slot(position).candidates().iter().next().unwrap();
//!
//! let next = try_add_piece(&board, position, piece).unwrap();
//! assert!(next.is_some());
//! assert_eq!(board.filled_count(), 0);
//! ```

pub mod board;
pub mod place;
pub mod positioner;
mod propagate;
pub mod slot;
pub mod testing;

pub use self::{
    board::{Board, Placement},
    place::{SolverError, try_add_piece},
    positioner::Positioner,
    slot::SlotConstraint,
};
