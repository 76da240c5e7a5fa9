//! Tree index: fast lookups over one snapshot.
//!
//! Built by a single depth-first traversal and cached for the render
//! cycle; the snapshot is immutable until the next fetch, so the index is
//! never incrementally patched. An absent id yields `None`, which callers
//! treat as a no-op.

use std::collections::HashMap;

use org_console_types::{AssemblyHierarchy, AssemblyId, HierarchyNode, NodeId, Snapshot};

/// Lookup structures over a hierarchy snapshot.
#[derive(Debug)]
pub struct TreeIndex<'a> {
    node_by_id: HashMap<NodeId, &'a HierarchyNode>,
    assembly_by_id: HashMap<AssemblyId, &'a AssemblyHierarchy>,
    /// Containing assembly for every node, however deep.
    assembly_of: HashMap<NodeId, AssemblyId>,
}

impl<'a> TreeIndex<'a> {
    /// Build the index with one pass over all assemblies' root trees.
    pub fn build(snapshot: &'a Snapshot) -> Self {
        let mut node_by_id = HashMap::with_capacity(snapshot.node_count());
        let mut assembly_by_id = HashMap::with_capacity(snapshot.assemblies.len());
        let mut assembly_of = HashMap::with_capacity(node_by_id.capacity());

        for assembly in &snapshot.assemblies {
            assembly_by_id.insert(assembly.assembly.id, assembly);

            let mut stack: Vec<&HierarchyNode> = assembly.roots.iter().collect();
            while let Some(node) = stack.pop() {
                node_by_id.insert(node.id, node);
                assembly_of.insert(node.id, assembly.assembly.id);
                stack.extend(node.children.iter());
            }
        }

        Self {
            node_by_id,
            assembly_by_id,
            assembly_of,
        }
    }

    /// O(1) node lookup.
    pub fn find_node(&self, id: NodeId) -> Option<&'a HierarchyNode> {
        self.node_by_id.get(&id).copied()
    }

    /// O(1) assembly lookup.
    pub fn find_assembly(&self, id: AssemblyId) -> Option<&'a AssemblyHierarchy> {
        self.assembly_by_id.get(&id).copied()
    }

    /// Assembly a node currently lives under (the server re-derives this
    /// on reparent; the index only reflects the last snapshot).
    pub fn assembly_of(&self, id: NodeId) -> Option<AssemblyId> {
        self.assembly_of.get(&id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.node_by_id.len()
    }
}
