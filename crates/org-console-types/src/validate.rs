//! Snapshot validation.
//!
//! Snapshots MUST be validated before indexing. Validation enforces the
//! invariants the reorganization engine depends on: globally unique ids
//! and a parent reference on every node that agrees with the node's
//! position in the owning tree.

use std::collections::HashSet;

use thiserror::Error;

use crate::hierarchy::{HierarchyNode, ParentRef, Snapshot};
use crate::ids::{AssemblyId, NodeId};

/// Structural violations in a fetched snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("duplicate node id {0} in snapshot")]
    DuplicateNodeId(NodeId),

    #[error("duplicate assembly id {0} in snapshot")]
    DuplicateAssemblyId(AssemblyId),

    #[error("root {node} of assembly {assembly} carries parent {parent:?}")]
    RootParentMismatch {
        node: NodeId,
        assembly: AssemblyId,
        parent: ParentRef,
    },

    #[error("child {child} of node {parent} carries parent {actual:?}")]
    ChildParentMismatch {
        child: NodeId,
        parent: NodeId,
        actual: ParentRef,
    },
}

/// Trait for validatable types.
pub trait Validate {
    /// Validate the object, returning the first violation found.
    fn validate(&self) -> Result<(), SnapshotError>;
}

impl Validate for Snapshot {
    fn validate(&self) -> Result<(), SnapshotError> {
        let mut assembly_ids: HashSet<AssemblyId> = HashSet::new();
        for assembly in &self.assemblies {
            if !assembly_ids.insert(assembly.assembly.id) {
                return Err(SnapshotError::DuplicateAssemblyId(assembly.assembly.id));
            }
        }

        // Node ids are unique across the entire snapshot, not per assembly.
        let mut node_ids: HashSet<NodeId> = HashSet::new();
        for node in self.nodes() {
            if !node_ids.insert(node.id) {
                return Err(SnapshotError::DuplicateNodeId(node.id));
            }
        }

        for assembly in &self.assemblies {
            for root in &assembly.roots {
                if root.parent != ParentRef::Assembly(assembly.assembly.id) {
                    return Err(SnapshotError::RootParentMismatch {
                        node: root.id,
                        assembly: assembly.assembly.id,
                        parent: root.parent,
                    });
                }
                validate_subtree(root)?;
            }
        }

        Ok(())
    }
}

fn validate_subtree(node: &HierarchyNode) -> Result<(), SnapshotError> {
    for child in &node.children {
        if child.parent != ParentRef::Node(node.id) {
            return Err(SnapshotError::ChildParentMismatch {
                child: child.id,
                parent: node.id,
                actual: child.parent,
            });
        }
        validate_subtree(child)?;
    }
    Ok(())
}
