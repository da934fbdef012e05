//! Distributed search orchestration for edge-matching puzzles.
//!
//! The crate records every explored branch in a persistent [`TreeNode`]
//! tree, partitions that tree's frontier into independent jobs, and deepens
//! one job at a time while streaming progress snapshots:
//!
//! - [`tree`]: the immutable search tree with path-copying updates and
//!   bottom-up aggregate recomputation.
//! - [`jobs`]: [`divide_into_jobs`], the breadth-first partitioner
//!   producing disjoint root-to-frontier paths.
//! - [`worker`]: [`step`] / [`run_job`], single-advance deepening with
//!   cooperative cancellation and an unbounded progress channel.
//! - [`wire`]: serde encodings for boards, trees, and job messages; trees
//!   travel as shape only and are rebuilt by replay.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use edgelace_search::{TreeNode, divide_into_jobs};
//! use edgelace_solver::testing::grid_catalogue;
//!
//! let root = TreeNode::initial_tree(Arc::new(grid_catalogue(4)));
//! let (root, paths) = divide_into_jobs(root, 3).unwrap();
//! assert_eq!(paths.len(), 3);
//! assert!(!root.is_terminal());
//! ```

pub mod jobs;
pub mod tree;
pub mod wire;
pub mod worker;

pub use self::{
    jobs::{JobPath, divide_into_jobs, resolve},
    tree::{PartialNode, StackEntry, TreeNode},
    wire::{
        JobAssignmentDto, PlacementDto, ProgressReportDto, TreeDto, WireError, decode_board,
        decode_tree, encode_board, encode_tree,
    },
    worker::{WorkHandle, run_job, step},
};
