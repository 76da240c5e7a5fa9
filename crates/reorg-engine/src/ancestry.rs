//! Ancestry check: the sole cycle-prevention mechanism.
//!
//! Runs before any move is accepted. Walks down the candidate's subtree
//! rather than up parent chains, so it needs nothing beyond the owned
//! `children` lists already in the snapshot.

use org_console_types::{HierarchyNode, NodeId};

use crate::index::TreeIndex;

/// True if `candidate` is `target` itself or one of its ancestors.
///
/// The identity case is deliberately included: a node may not be dropped
/// onto itself. An unknown `candidate` id is nobody's ancestor.
pub fn is_ancestor_or_self(index: &TreeIndex<'_>, candidate: NodeId, target: NodeId) -> bool {
    if candidate == target {
        return true;
    }
    let Some(root) = index.find_node(candidate) else {
        return false;
    };

    let mut stack: Vec<&HierarchyNode> = root.children.iter().collect();
    while let Some(node) = stack.pop() {
        if node.id == target {
            return true;
        }
        stack.extend(node.children.iter());
    }
    false
}
