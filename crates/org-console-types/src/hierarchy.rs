//! Hierarchy domain model and wire format.
//!
//! A snapshot is the full tree set for one `(state, party)` scope, fetched
//! wholesale and treated as immutable until the next fetch. Nodes own their
//! children; the only back-reference is the typed parent.

use serde::{Deserialize, Serialize};

use crate::ids::{AssemblyId, NodeId};
use crate::patch::PatchError;

/// Scope of a hierarchy fetch: one state, one party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyScope {
    pub state_id: i64,
    pub party_id: i64,
}

/// Where a node hangs: directly off a fixed Assembly anchor, or off
/// another hierarchy node. Exactly one - never both, never neither.
///
/// On the wire this is the `parentId` / `parentAssemblyId` option pair;
/// decoding enforces mutual exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ParentRefWire", into = "ParentRefWire")]
pub enum ParentRef {
    /// Node hangs directly off an Assembly anchor (it is a root).
    Assembly(AssemblyId),
    /// Node hangs off another hierarchy node.
    Node(NodeId),
}

/// Wire form of [`ParentRef`]. Both fields are always present in JSON,
/// with the unused side null.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParentRefWire {
    #[serde(default)]
    parent_id: Option<NodeId>,
    #[serde(default)]
    parent_assembly_id: Option<AssemblyId>,
}

impl From<ParentRef> for ParentRefWire {
    fn from(parent: ParentRef) -> Self {
        match parent {
            ParentRef::Assembly(id) => Self {
                parent_id: None,
                parent_assembly_id: Some(id),
            },
            ParentRef::Node(id) => Self {
                parent_id: Some(id),
                parent_assembly_id: None,
            },
        }
    }
}

impl TryFrom<ParentRefWire> for ParentRef {
    type Error = PatchError;

    fn try_from(wire: ParentRefWire) -> Result<Self, Self::Error> {
        match (wire.parent_id, wire.parent_assembly_id) {
            (Some(node), None) => Ok(ParentRef::Node(node)),
            (None, Some(assembly)) => Ok(ParentRef::Assembly(assembly)),
            (None, None) => Err(PatchError::MissingParent),
            (Some(_), Some(_)) => Err(PatchError::AmbiguousParent),
        }
    }
}

/// A draggable, reparentable organizational unit below an Assembly.
///
/// `level_name` is an open-ended tier tag (Block, Mandal, PollingCenter,
/// Booth, ...); tiers are configurable per party, so this is deliberately
/// not an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: NodeId,
    pub level_name: String,
    pub display_name: String,
    #[serde(flatten)]
    pub parent: ParentRef,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

/// A fixed, non-draggable top-level organizational unit. Not a
/// [`HierarchyNode`]; anchors never move and have no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyAnchor {
    pub id: AssemblyId,
    pub level_name: String,
    pub display_name: String,
}

/// One Assembly anchor plus the subtrees hanging directly off it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyHierarchy {
    pub assembly: AssemblyAnchor,
    #[serde(default)]
    pub roots: Vec<HierarchyNode>,
}

/// The full hierarchy tree set for one `(state, party)` scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state_id: i64,
    pub party_id: i64,
    #[serde(default)]
    pub assemblies: Vec<AssemblyHierarchy>,
}

impl Snapshot {
    /// Scope this snapshot was fetched for.
    pub fn scope(&self) -> HierarchyScope {
        HierarchyScope {
            state_id: self.state_id,
            party_id: self.party_id,
        }
    }

    /// Depth-first iterator over every node in every assembly subtree.
    pub fn nodes(&self) -> Nodes<'_> {
        let mut stack: Vec<&HierarchyNode> = Vec::new();
        for assembly in self.assemblies.iter().rev() {
            for root in assembly.roots.iter().rev() {
                stack.push(root);
            }
        }
        Nodes { stack }
    }

    /// Total node count across all assemblies.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }
}

/// Depth-first node iterator, pre-order, assembly by assembly.
pub struct Nodes<'a> {
    stack: Vec<&'a HierarchyNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a HierarchyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
