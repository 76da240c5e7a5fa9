//! Parent-reference patch: the update payload for a reparent.
//!
//! The backend contract is `{ parentId: number|null, parentAssemblyId:
//! number|null }` with exactly one side non-null. Constructors make the
//! invalid states unrepresentable at call sites; [`ParentPatch::parent_ref`]
//! re-checks at the boundary for payloads built elsewhere.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hierarchy::ParentRef;
use crate::ids::{AssemblyId, NodeId};

/// Violations of the mutual-exclusion parent encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("patch sets neither parentId nor parentAssemblyId")]
    MissingParent,

    #[error("patch sets both parentId and parentAssemblyId")]
    AmbiguousParent,
}

/// Wire payload reassigning a node's parent reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPatch {
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub parent_assembly_id: Option<AssemblyId>,
}

impl ParentPatch {
    /// Patch moving the node under another node.
    pub fn node(parent: NodeId) -> Self {
        Self {
            parent_id: Some(parent),
            parent_assembly_id: None,
        }
    }

    /// Patch moving the node directly under an Assembly anchor.
    pub fn assembly(anchor: AssemblyId) -> Self {
        Self {
            parent_id: None,
            parent_assembly_id: Some(anchor),
        }
    }

    /// Decode the patch into a typed parent reference, enforcing mutual
    /// exclusion.
    pub fn parent_ref(&self) -> Result<ParentRef, PatchError> {
        match (self.parent_id, self.parent_assembly_id) {
            (Some(node), None) => Ok(ParentRef::Node(node)),
            (None, Some(assembly)) => Ok(ParentRef::Assembly(assembly)),
            (None, None) => Err(PatchError::MissingParent),
            (Some(_), Some(_)) => Err(PatchError::AmbiguousParent),
        }
    }
}

impl From<ParentRef> for ParentPatch {
    fn from(parent: ParentRef) -> Self {
        match parent {
            ParentRef::Node(id) => Self::node(id),
            ParentRef::Assembly(id) => Self::assembly(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_exactly_one_side_set() {
        let patch = ParentPatch::node(NodeId(7));
        assert_eq!(patch.parent_ref(), Ok(ParentRef::Node(NodeId(7))));

        let patch = ParentPatch::assembly(AssemblyId(3));
        assert_eq!(patch.parent_ref(), Ok(ParentRef::Assembly(AssemblyId(3))));
    }

    #[test]
    fn test_invalid_combinations_rejected() {
        let neither = ParentPatch {
            parent_id: None,
            parent_assembly_id: None,
        };
        assert_eq!(neither.parent_ref(), Err(PatchError::MissingParent));

        let both = ParentPatch {
            parent_id: Some(NodeId(1)),
            parent_assembly_id: Some(AssemblyId(2)),
        };
        assert_eq!(both.parent_ref(), Err(PatchError::AmbiguousParent));
    }

    #[test]
    fn test_wire_shape_keeps_cleared_side_null() {
        let value = serde_json::to_value(ParentPatch::assembly(AssemblyId(3))).unwrap();
        assert_eq!(
            value,
            json!({ "parentId": null, "parentAssemblyId": 3 })
        );
    }
}
