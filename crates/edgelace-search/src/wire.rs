//! Serializable encodings for boards, trees, and job messages.
//!
//! The tree encoding deliberately carries only the shape of the search:
//! board states are never serialized per node. Decoding replays
//! [`TreeNode::generate_child`] in child order against a fresh initial tree
//! built from the same catalogue, which deterministically regenerates every
//! board. Only solution boards travel as explicit placement lists.

use std::sync::Arc;

use derive_more::{Display, Error, From};
use edgelace_core::{
    CatalogueError, PATTERN_LIMIT, Pattern, Piece, PieceCatalogue, Position, RotationSet, Side,
};
use edgelace_solver::{Board, Placement, SolverError};
use serde::{Deserialize, Serialize};

use crate::tree::TreeNode;

/// Errors produced while decoding wire data.
#[derive(Debug, Display, Error, From)]
pub enum WireError {
    /// The encoded tree's node kinds diverge from what replay produces.
    #[display("replayed node kind does not match the encoded tree")]
    #[from(ignore)]
    ReplayMismatch,
    /// A rotation byte uses bits outside the four rotation flags.
    #[display("invalid rotation bits {bits:#06b}")]
    #[from(ignore)]
    InvalidRotationBits {
        /// The offending byte.
        bits: u8,
    },
    /// A pattern id at or above the pattern limit.
    #[display("pattern id {id} out of range")]
    #[from(ignore)]
    InvalidPattern {
        /// The offending id.
        id: u8,
    },
    /// An encoded placement list does not describe a consistent board.
    #[display("encoded placements do not form a consistent board")]
    #[from(ignore)]
    InconsistentPlacements,
    /// The encoded piece list does not form a valid catalogue.
    #[display("invalid piece catalogue: {_0}")]
    Catalogue(CatalogueError),
    /// Replay tripped a solver invariant.
    #[display("replay failed: {_0}")]
    Solver(SolverError),
}

/// One committed placement of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDto {
    /// Catalogue index of the placed piece.
    pub piece: u16,
    /// Column of the position.
    pub x: u8,
    /// Row of the position.
    pub y: u8,
    /// Surviving rotation set, as its flag bits.
    pub rotations: u8,
}

/// Wire form of a search tree: node kinds and child order only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeDto {
    /// A branch not yet attempted.
    Unexplored,
    /// A terminal dead end.
    FailedPlacement,
    /// A terminal, completely searched subtree with its solutions.
    FullyExplored {
        /// Exact number of materialized nodes in the subtree.
        nodes_explored: u64,
        /// Solutions, each as its placement list.
        solutions: Vec<Vec<PlacementDto>>,
    },
    /// An interior node; boards are regenerated by replay.
    PartiallyExplored {
        /// Children in candidate order.
        children: Vec<TreeDto>,
    },
}

/// A job handed to one worker: the puzzle plus the subtree to deepen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAssignmentDto {
    /// Pieces as `[top, right, bottom, left]` pattern ids, in catalogue
    /// order.
    pub pieces: Vec<[u8; 4]>,
    /// Index path from the tree root to the assigned subtree.
    pub path: Vec<u32>,
}

/// A periodic snapshot emitted while a worker is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReportDto {
    /// Identifier of the job this report belongs to.
    pub job_id: u64,
    /// Current state of the worker's tree.
    pub tree: TreeDto,
}

impl JobAssignmentDto {
    /// Encodes a catalogue and job path.
    #[must_use]
    pub fn new(catalogue: &PieceCatalogue, path: &[usize]) -> Self {
        let pieces = catalogue
            .pieces()
            .iter()
            .map(|piece| {
                [
                    piece.side(Side::Top).id(),
                    piece.side(Side::Right).id(),
                    piece.side(Side::Bottom).id(),
                    piece.side(Side::Left).id(),
                ]
            })
            .collect();
        #[expect(clippy::cast_possible_truncation)]
        let path = path.iter().map(|index| *index as u32).collect();
        Self { pieces, path }
    }

    /// Rebuilds the piece catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidPattern`] for out-of-range pattern ids
    /// and [`WireError::Catalogue`] when the piece list is not a valid
    /// square catalogue.
    pub fn catalogue(&self) -> Result<PieceCatalogue, WireError> {
        let pieces = self
            .pieces
            .iter()
            .map(|&[top, right, bottom, left]| {
                let mut sides = [Pattern::BORDER; 4];
                for (slot, id) in sides.iter_mut().zip([top, right, bottom, left]) {
                    if id >= PATTERN_LIMIT {
                        return Err(WireError::InvalidPattern { id });
                    }
                    *slot = Pattern::new(id);
                }
                let [top, right, bottom, left] = sides;
                Ok(Piece::new(top, right, bottom, left))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PieceCatalogue::from_pieces(pieces)?)
    }

    /// The job path as child indices.
    #[must_use]
    pub fn job_path(&self) -> Vec<usize> {
        self.path.iter().map(|index| *index as usize).collect()
    }
}

/// Encodes a board as its committed placements in row-major order.
#[must_use]
pub fn encode_board(board: &Board) -> Vec<PlacementDto> {
    board
        .placements()
        .map(|(position, placement)| PlacementDto {
            piece: placement.piece,
            x: position.x(),
            y: position.y(),
            rotations: placement.rotations.bits(),
        })
        .collect()
}

/// Rebuilds a board by committing the encoded placements in order.
///
/// # Errors
///
/// Returns [`WireError::InvalidRotationBits`] for malformed rotation bytes
/// and [`WireError::InconsistentPlacements`] when the placements repeat a
/// piece or position, or propagation rejects a commit.
pub fn decode_board(
    catalogue: &Arc<PieceCatalogue>,
    placements: &[PlacementDto],
) -> Result<Board, WireError> {
    let mut board = Board::new(Arc::clone(catalogue));
    for dto in placements {
        let rotations = RotationSet::from_bits(dto.rotations)
            .ok_or(WireError::InvalidRotationBits { bits: dto.rotations })?;
        let position = Position::new(dto.x, dto.y);
        if board.placement_at(position).is_some() || board.is_used(dto.piece) {
            return Err(WireError::InconsistentPlacements);
        }
        board = board
            .set_placement(
                position,
                Placement {
                    piece: dto.piece,
                    rotations,
                },
            )
            .ok_or(WireError::InconsistentPlacements)?;
    }
    Ok(board)
}

/// Encodes a tree as node kinds and child order.
#[must_use]
pub fn encode_tree(node: &TreeNode) -> TreeDto {
    match node {
        TreeNode::Unexplored => TreeDto::Unexplored,
        TreeNode::FailedPlacement => TreeDto::FailedPlacement,
        TreeNode::FullyExplored {
            solutions,
            nodes_explored,
        } => TreeDto::FullyExplored {
            nodes_explored: *nodes_explored,
            solutions: solutions.iter().map(encode_board).collect(),
        },
        TreeNode::PartiallyExplored(_) => TreeDto::PartiallyExplored {
            children: node.children().iter().map(|c| encode_tree(c)).collect(),
        },
    }
}

/// Rebuilds an equivalent tree by replaying child generation against a
/// fresh initial tree for `catalogue`.
///
/// # Errors
///
/// Returns [`WireError::ReplayMismatch`] when replay produces a node kind
/// different from the encoded one, and propagates solver errors from
/// materialization.
pub fn decode_tree(
    dto: &TreeDto,
    catalogue: &Arc<PieceCatalogue>,
) -> Result<Arc<TreeNode>, WireError> {
    replay(TreeNode::initial_tree(Arc::clone(catalogue)), dto, catalogue)
}

fn replay(
    node: Arc<TreeNode>,
    dto: &TreeDto,
    catalogue: &Arc<PieceCatalogue>,
) -> Result<Arc<TreeNode>, WireError> {
    match dto {
        TreeDto::Unexplored => match &*node {
            TreeNode::Unexplored => Ok(node),
            _ => Err(WireError::ReplayMismatch),
        },
        TreeDto::FailedPlacement => match &*node {
            TreeNode::FailedPlacement => Ok(node),
            _ => Err(WireError::ReplayMismatch),
        },
        TreeDto::FullyExplored {
            nodes_explored,
            solutions,
        } => match &*node {
            TreeNode::FullyExplored { .. } => Ok(node),
            // A promoted subtree discarded its child list at promotion
            // time, so there is nothing to replay into the regenerated
            // node; the encoded aggregate and solutions are all the node
            // ever held.
            TreeNode::PartiallyExplored(_) => {
                let solutions = solutions
                    .iter()
                    .map(|placements| decode_board(catalogue, placements))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Arc::new(TreeNode::FullyExplored {
                    solutions,
                    nodes_explored: *nodes_explored,
                }))
            }
            _ => Err(WireError::ReplayMismatch),
        },
        TreeDto::PartiallyExplored { children } => {
            if !matches!(*node, TreeNode::PartiallyExplored(_))
                || node.children().len() != children.len()
            {
                return Err(WireError::ReplayMismatch);
            }
            let mut current = node;
            for (index, child_dto) in children.iter().enumerate() {
                // A well-formed encoding keeps at least one open child, so
                // promotion can only strike here on corrupt input.
                if !matches!(*current, TreeNode::PartiallyExplored(_)) {
                    return Err(WireError::ReplayMismatch);
                }
                if matches!(child_dto, TreeDto::Unexplored) {
                    if !matches!(*current.children()[index], TreeNode::Unexplored) {
                        return Err(WireError::ReplayMismatch);
                    }
                    continue;
                }
                let materialized = current.generate_child(index)?;
                let replayed = replay(materialized, child_dto, catalogue)?;
                current = current.replace_child(index, replayed);
            }
            if current.is_terminal() {
                return Err(WireError::ReplayMismatch);
            }
            Ok(current)
        }
    }
}
