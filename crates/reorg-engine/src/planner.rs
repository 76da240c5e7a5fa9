//! Move planning: turn a resolved drop into a minimal parent patch, or
//! reject it before anything touches the network.

use thiserror::Error;

use org_console_types::{NodeId, ParentPatch, ParentRef};

use crate::ancestry::is_ancestor_or_self;
use crate::index::TreeIndex;
use crate::resolver::{DropCandidate, DropTarget};

/// Local rejection of a proposed move. Both variants are recoverable and
/// scoped to one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    /// Nothing to do: no resolved target, unknown ids, or the target is
    /// already the node's parent. Silently ignored, no network call.
    #[error("drop resolved to nothing actionable")]
    NoOp,

    /// Target is the dragged node itself or one of its descendants.
    #[error("a unit cannot be moved into its own subtree")]
    CycleDetected,
}

/// Accepted move: reassign `node`'s parent reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub node: NodeId,
    pub new_parent: ParentRef,
}

impl MovePlan {
    /// Wire patch for this plan. Sets exactly one parent field and clears
    /// the other.
    pub fn patch(&self) -> ParentPatch {
        ParentPatch::from(self.new_parent)
    }
}

/// Combine the ancestry check with the resolved drop target.
///
/// Rejections, in order: no target or unknown ids (`NoOp`), dropping into
/// the dragged node's own subtree (`CycleDetected`), target identical to
/// the current parent (`NoOp`).
pub fn plan_move(
    index: &TreeIndex<'_>,
    dragged: NodeId,
    resolved: Option<&DropCandidate>,
) -> Result<MovePlan, MoveRejected> {
    let Some(candidate) = resolved else {
        return Err(MoveRejected::NoOp);
    };
    let Some(node) = index.find_node(dragged) else {
        return Err(MoveRejected::NoOp);
    };

    let new_parent = match candidate.target {
        DropTarget::Assembly(assembly) => {
            if index.find_assembly(assembly).is_none() {
                return Err(MoveRejected::NoOp);
            }
            ParentRef::Assembly(assembly)
        }
        DropTarget::Node(target) => {
            if index.find_node(target).is_none() {
                return Err(MoveRejected::NoOp);
            }
            if is_ancestor_or_self(index, dragged, target) {
                return Err(MoveRejected::CycleDetected);
            }
            ParentRef::Node(target)
        }
    };

    if node.parent == new_parent {
        return Err(MoveRejected::NoOp);
    }

    Ok(MovePlan {
        node: dragged,
        new_parent,
    })
}
