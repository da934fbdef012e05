//! The persistent search tree.
//!
//! Every explored branch of the search is recorded as an immutable
//! [`TreeNode`]; "mutation" is path copying through
//! [`replace_child`](TreeNode::replace_child), which rebuilds the spine from
//! the changed child up to the root while sharing every untouched subtree
//! through [`Arc`]. Two workers can therefore hold the same ancestor and
//! derive different descendants without coordination.

use std::sync::Arc;

use edgelace_core::{PieceCatalogue, Position};
use edgelace_solver::{Board, Positioner, SolverError, try_add_piece};

/// A board together with the strategy that decides its next position.
///
/// Converting a `StackEntry` into a node is the only way fresh tree
/// structure is created.
#[derive(Debug, Clone, PartialEq)]
pub struct StackEntry {
    /// The board reached at this point of the search.
    pub board: Board,
    /// Selection strategy for the position to fill next.
    pub positioner: Positioner,
}

/// One node of the persistent search tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// A branch not yet attempted.
    Unexplored,
    /// A terminal dead end: the placement that would have produced this
    /// node violated a constraint.
    FailedPlacement,
    /// A terminal, completely searched subtree.
    FullyExplored {
        /// Every complete board found beneath this point.
        solutions: Vec<Board>,
        /// Exact number of materialized nodes in the subtree.
        nodes_explored: u64,
    },
    /// An interior node with at least one Unexplored or PartiallyExplored
    /// descendant.
    PartiallyExplored(PartialNode),
}

/// Payload of [`TreeNode::PartiallyExplored`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartialNode {
    entry: StackEntry,
    next_position: Position,
    next_positioner: Positioner,
    candidates: Vec<u16>,
    children: Vec<Arc<TreeNode>>,
    nodes_explored: u64,
    estimated_total: Option<f64>,
    solutions: Vec<Board>,
}

impl TreeNode {
    /// Converts a search state into a node.
    ///
    /// A complete board becomes `FullyExplored` with itself as the single
    /// solution. Otherwise the positioner picks the next position and the
    /// node becomes `PartiallyExplored` with one `Unexplored` child per
    /// candidate piece at that position, in candidate-iteration order.
    #[must_use]
    pub fn from_entry(entry: StackEntry) -> Self {
        if entry.board.is_complete() {
            return Self::FullyExplored {
                solutions: vec![entry.board],
                nodes_explored: 1,
            };
        }
        let Some((next_position, next_positioner)) = entry.positioner.next_position(&entry.board)
        else {
            // The positioner ran dry with unfilled slots left; nothing
            // below this point can complete the board.
            return Self::FullyExplored {
                solutions: Vec::new(),
                nodes_explored: 1,
            };
        };
        let candidates: Vec<u16> = entry.board.slot(next_position).candidates().iter().collect();
        let children = vec![Arc::new(Self::Unexplored); candidates.len()];
        Self::PartiallyExplored(PartialNode {
            entry,
            next_position,
            next_positioner,
            candidates,
            children,
            nodes_explored: 1,
            estimated_total: None,
            solutions: Vec::new(),
        })
    }

    /// Builds the root node for an untouched board, seeded with the spiral
    /// positioner.
    #[must_use]
    pub fn initial_tree(catalogue: Arc<PieceCatalogue>) -> Arc<Self> {
        let side_len = catalogue.side_len();
        Arc::new(Self::from_entry(StackEntry {
            board: Board::new(catalogue),
            positioner: Positioner::spiral(side_len),
        }))
    }

    /// Materializes the `Unexplored` child at `index` by attempting the
    /// corresponding candidate piece at this node's next position.
    ///
    /// A rejected placement becomes a `FailedPlacement` leaf; an accepted
    /// one becomes a fresh node via [`from_entry`](Self::from_entry).
    ///
    /// # Errors
    ///
    /// Propagates [`SolverError`] from the placement algorithm.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not `PartiallyExplored` or the child at `index`
    /// is not `Unexplored`.
    pub fn generate_child(&self, index: usize) -> Result<Arc<Self>, SolverError> {
        let Self::PartiallyExplored(node) = self else {
            panic!("generate_child called on a node without children");
        };
        assert!(
            matches!(*node.children[index], Self::Unexplored),
            "child {index} is already materialized"
        );
        let piece = node.candidates[index];
        let child = match try_add_piece(&node.entry.board, node.next_position, piece)? {
            None => Self::FailedPlacement,
            Some(board) => Self::from_entry(StackEntry {
                board,
                positioner: node.next_positioner.clone(),
            }),
        };
        Ok(Arc::new(child))
    }

    /// Replaces the child at `index`, rebuilding this node with recomputed
    /// aggregates.
    ///
    /// Handing back the existing child is an identity no-op. When no child
    /// remains `Unexplored` or `PartiallyExplored`, the rebuilt node is
    /// promoted to `FullyExplored`.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not `PartiallyExplored`.
    #[must_use]
    pub fn replace_child(self: &Arc<Self>, index: usize, new_child: Arc<Self>) -> Arc<Self> {
        let Self::PartiallyExplored(node) = &**self else {
            panic!("replace_child called on a node without children");
        };
        if Arc::ptr_eq(&node.children[index], &new_child) {
            return Arc::clone(self);
        }

        let mut children = node.children.clone();
        children[index] = new_child;

        let nodes_explored = 1 + children.iter().map(|c| c.nodes_explored()).sum::<u64>();
        let solutions: Vec<Board> = children
            .iter()
            .flat_map(|c| c.solutions().iter().cloned())
            .collect();

        let exhausted = children.iter().all(|c| c.is_terminal());
        if exhausted {
            return Arc::new(Self::FullyExplored {
                solutions,
                nodes_explored,
            });
        }

        // Scale the contributed estimates up by the share of children that
        // could contribute one; a node with only Unexplored children has no
        // estimate at all.
        let contributors = children.iter().filter(|c| c.estimate().is_some()).count();
        let estimated_total = if contributors == 0 {
            None
        } else {
            let sum: f64 = children.iter().filter_map(|c| c.estimate()).sum();
            #[expect(clippy::cast_precision_loss)]
            let scale = children.len() as f64 / contributors as f64;
            Some(sum * scale)
        };

        Arc::new(Self::PartiallyExplored(PartialNode {
            entry: node.entry.clone(),
            next_position: node.next_position,
            next_positioner: node.next_positioner.clone(),
            candidates: node.candidates.clone(),
            children,
            nodes_explored,
            estimated_total,
            solutions,
        }))
    }

    /// Number of materialized nodes in this subtree.
    #[must_use]
    pub fn nodes_explored(&self) -> u64 {
        match self {
            Self::Unexplored => 0,
            Self::FailedPlacement => 1,
            Self::FullyExplored { nodes_explored, .. } => *nodes_explored,
            Self::PartiallyExplored(node) => node.nodes_explored,
        }
    }

    /// Estimated total number of nodes in this subtree once fully explored,
    /// or `None` when nothing beneath it has been materialized yet.
    #[must_use]
    pub fn estimate(&self) -> Option<f64> {
        match self {
            Self::Unexplored => None,
            Self::FailedPlacement => Some(1.0),
            #[expect(clippy::cast_precision_loss)]
            Self::FullyExplored { nodes_explored, .. } => Some(*nodes_explored as f64),
            Self::PartiallyExplored(node) => node.estimated_total,
        }
    }

    /// Complete boards found in this subtree.
    #[must_use]
    pub fn solutions(&self) -> &[Board] {
        match self {
            Self::Unexplored | Self::FailedPlacement => &[],
            Self::FullyExplored { solutions, .. } => solutions,
            Self::PartiallyExplored(node) => &node.solutions,
        }
    }

    /// Returns `true` when nothing beneath this node remains to explore.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FailedPlacement | Self::FullyExplored { .. })
    }

    /// Ordered children of a `PartiallyExplored` node; empty otherwise.
    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        match self {
            Self::PartiallyExplored(node) => &node.children,
            _ => &[],
        }
    }

    /// The position this node's children compete for, if any.
    #[must_use]
    pub fn next_position(&self) -> Option<Position> {
        match self {
            Self::PartiallyExplored(node) => Some(node.next_position),
            _ => None,
        }
    }

    /// Candidate piece indices, one per child, in child order.
    #[must_use]
    pub fn candidates(&self) -> &[u16] {
        match self {
            Self::PartiallyExplored(node) => &node.candidates,
            _ => &[],
        }
    }
}
