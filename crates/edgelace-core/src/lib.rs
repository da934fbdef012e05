//! Core data structures for edge-matching puzzle solving.
//!
//! This crate provides the vocabulary shared by the solver and search
//! layers: edge patterns, pieces and their rotations, grid geometry, the
//! persistent candidate bitset, and the piece catalogue.
//!
//! # Overview
//!
//! - [`pattern`]: edge-pattern identifiers and [`PatternSet`], including the
//!   reserved border sentinel.
//! - [`side`] / [`rotation`]: the four tile sides and quarter-turn
//!   rotations, with [`RotationSet`] preserving rotation ambiguity.
//! - [`piece`]: immutable four-edge tiles and rotated side lookups.
//! - [`position`]: grid coordinates and neighbor geometry.
//! - [`piece_set`]: [`PieceSet`], the persistent copy-on-write candidate
//!   set with a fast inline singleton representation.
//! - [`catalogue`]: the ordered piece list defining one puzzle, with the
//!   plain-text parsing format and the perfect-square board contract.
//!
//! # Examples
//!
//! ```
//! use edgelace_core::{Pattern, PatternSet, Piece, Rotation, Side};
//!
//! let piece = Piece::new(
//!     Pattern::BORDER,
//!     Pattern::new(3),
//!     Pattern::new(5),
//!     Pattern::BORDER,
//! );
//!
//! // A top-left corner slot demands the sentinel on top and left.
//! let mut requirements = [PatternSet::FULL; 4];
//! requirements[Side::Top.index()] = PatternSet::singleton(Pattern::BORDER);
//! requirements[Side::Left.index()] = PatternSet::singleton(Pattern::BORDER);
//!
//! let rotations = piece.rotations_matching(&requirements);
//! assert_eq!(rotations.len(), 1);
//! assert!(rotations.has(Rotation::R0));
//! ```

pub mod catalogue;
pub mod pattern;
pub mod piece;
pub mod piece_set;
pub mod position;
pub mod rotation;
pub mod side;

pub use self::{
    catalogue::{CatalogueError, PieceCatalogue},
    pattern::{PATTERN_LIMIT, Pattern, PatternSet},
    piece::{Piece, SideRequirements},
    piece_set::{PieceIter, PieceSet},
    position::Position,
    rotation::{Rotation, RotationSet},
    side::Side,
};
