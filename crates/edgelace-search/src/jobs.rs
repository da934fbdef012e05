//! Breadth-first partitioning of the search tree into worker jobs.

use std::collections::VecDeque;
use std::sync::Arc;

use edgelace_solver::SolverError;
use log::debug;

use crate::tree::TreeNode;

/// A sequence of child indices from the tree root to one frontier node.
pub type JobPath = Vec<usize>;

/// Expands the tree's frontier breadth-first until at least `required`
/// independent branches exist, then returns the (possibly updated) root
/// together with at most `required` pairwise-distinct paths.
///
/// A terminal root yields no jobs. Fewer paths than requested are returned
/// when the frontier exhausts first; callers distribute what exists.
///
/// # Errors
///
/// Propagates [`SolverError`] from materializing frontier nodes.
pub fn divide_into_jobs(
    root: Arc<TreeNode>,
    required: usize,
) -> Result<(Arc<TreeNode>, Vec<JobPath>), SolverError> {
    if root.is_terminal() {
        return Ok((root, Vec::new()));
    }

    let mut root = root;
    let mut queue: VecDeque<(JobPath, Arc<TreeNode>)> = VecDeque::new();
    queue.push_back((Vec::new(), Arc::clone(&root)));

    while queue.len() < required {
        let Some((path, node)) = queue.pop_front() else {
            break;
        };
        match &*node {
            TreeNode::Unexplored => {
                root = materialize(&root, &path)?;
                // Materializing the last open child promotes ancestors to
                // FullyExplored, in which case the path no longer resolves
                // and the subtree holds nothing left to assign.
                if let Some(node) = try_resolve(&root, &path) {
                    for (index, child) in node.children().iter().enumerate() {
                        let mut child_path = path.clone();
                        child_path.push(index);
                        queue.push_back((child_path, Arc::clone(child)));
                    }
                }
            }
            TreeNode::PartiallyExplored(_) => {
                for (index, child) in node.children().iter().enumerate() {
                    if !child.is_terminal() {
                        let mut child_path = path.clone();
                        child_path.push(index);
                        queue.push_back((child_path, Arc::clone(child)));
                    }
                }
            }
            TreeNode::FailedPlacement | TreeNode::FullyExplored { .. } => {}
        }
    }

    let paths: Vec<JobPath> = queue
        .into_iter()
        .take(required)
        .map(|(path, _)| path)
        .collect();
    debug!(
        "partitioned tree into {} of {required} requested jobs",
        paths.len()
    );
    Ok((root, paths))
}

/// Materializes the `Unexplored` node at `path`, splicing the result back
/// up to a new root.
fn materialize(root: &Arc<TreeNode>, path: &[usize]) -> Result<Arc<TreeNode>, SolverError> {
    let [index, rest @ ..] = path else {
        panic!("cannot materialize the root itself");
    };
    let new_child = if rest.is_empty() {
        root.generate_child(*index)?
    } else {
        materialize(&root.children()[*index], rest)?
    };
    Ok(root.replace_child(*index, new_child))
}

/// Follows `path` down from `root`.
///
/// # Panics
///
/// Panics if the path walks off the tree; paths returned by
/// [`divide_into_jobs`] always resolve against the root they were produced
/// with.
#[must_use]
pub fn resolve(root: &Arc<TreeNode>, path: &[usize]) -> Arc<TreeNode> {
    let mut node = Arc::clone(root);
    for index in path {
        node = Arc::clone(&node.children()[*index]);
    }
    node
}

/// [`resolve`], but `None` when a promoted ancestor swallowed the path.
fn try_resolve(root: &Arc<TreeNode>, path: &[usize]) -> Option<Arc<TreeNode>> {
    let mut node = Arc::clone(root);
    for index in path {
        node = Arc::clone(node.children().get(*index)?);
    }
    Some(node)
}
