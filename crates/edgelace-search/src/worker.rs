//! Incremental deepening of one tree branch.
//!
//! A worker owns its tree value exclusively for the duration of a job and
//! publishes progress as immutable root snapshots on an unbounded channel,
//! so producers never block on a slow consumer. Cancellation is
//! cooperative and checked once per step; propagation inside a single
//! placement always runs to completion first.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use edgelace_solver::SolverError;
use futures_channel::mpsc::UnboundedSender;
use log::{debug, trace};

use crate::tree::TreeNode;

/// Cooperative cancellation handle shared between a running job and its
/// controller.
#[derive(Debug, Clone, Default)]
pub struct WorkHandle {
    cancel: Arc<AtomicBool>,
}

impl WorkHandle {
    /// Creates a handle in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; the job stops before its next step.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Advances the branch under `guide` by materializing exactly one
/// `Unexplored` node.
///
/// The guide path is followed first; beyond it, the first child still
/// `Unexplored` or `PartiallyExplored` (in child order) is chosen. Returns
/// the new root and whether an advance happened; `false` means the branch
/// is exhausted.
///
/// # Errors
///
/// Propagates [`SolverError`] from materializing a node.
pub fn step(
    root: &Arc<TreeNode>,
    guide: &[usize],
) -> Result<(Arc<TreeNode>, bool), SolverError> {
    if !matches!(**root, TreeNode::PartiallyExplored(_)) {
        return Ok((Arc::clone(root), false));
    }
    if let [index, rest @ ..] = guide {
        let child = &root.children()[*index];
        match &**child {
            TreeNode::Unexplored => {
                let new_child = root.generate_child(*index)?;
                Ok((root.replace_child(*index, new_child), true))
            }
            TreeNode::PartiallyExplored(_) => {
                let (new_child, advanced) = step(child, rest)?;
                if advanced {
                    Ok((root.replace_child(*index, new_child), true))
                } else {
                    Ok((Arc::clone(root), false))
                }
            }
            TreeNode::FailedPlacement | TreeNode::FullyExplored { .. } => {
                Ok((Arc::clone(root), false))
            }
        }
    } else {
        for (index, child) in root.children().iter().enumerate() {
            match &**child {
                TreeNode::Unexplored => {
                    let new_child = root.generate_child(index)?;
                    return Ok((root.replace_child(index, new_child), true));
                }
                TreeNode::PartiallyExplored(_) => {
                    let (new_child, advanced) = step(child, &[])?;
                    if advanced {
                        return Ok((root.replace_child(index, new_child), true));
                    }
                    return Ok((Arc::clone(root), false));
                }
                TreeNode::FailedPlacement | TreeNode::FullyExplored { .. } => {}
            }
        }
        Ok((Arc::clone(root), false))
    }
}

/// Repeatedly [`step`]s the branch under `guide`, emitting each advanced
/// root on `sender`, until the branch exhausts, cancellation is observed,
/// or the receiver is dropped.
///
/// # Errors
///
/// Propagates [`SolverError`] from a failed step; the job dies, the
/// process does not.
pub fn run_job(
    root: Arc<TreeNode>,
    guide: &[usize],
    handle: &WorkHandle,
    sender: &UnboundedSender<Arc<TreeNode>>,
) -> Result<Arc<TreeNode>, SolverError> {
    let mut root = root;
    let mut advances = 0u64;
    loop {
        if handle.is_cancelled() {
            debug!("job cancelled after {advances} advances");
            break;
        }
        let (next, advanced) = step(&root, guide)?;
        root = next;
        if !advanced {
            debug!("branch exhausted after {advances} advances");
            break;
        }
        advances += 1;
        trace!("advance {advances}: {} nodes explored", root.nodes_explored());
        if sender.unbounded_send(Arc::clone(&root)).is_err() {
            debug!("progress receiver dropped after {advances} advances");
            break;
        }
    }
    Ok(root)
}
