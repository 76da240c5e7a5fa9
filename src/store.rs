//! In-memory hierarchy store.
//!
//! Backs the mock REST backend and the engine integration tests. Holds
//! the flat truth (one record per node, typed parent) and assembles
//! nested snapshots on demand, re-validating updates the way the real
//! backend does - including its own cycle check, so the client's local
//! guard can be exercised against a server that also says no.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use org_console_types::{
    AssemblyAnchor, AssemblyHierarchy, AssemblyId, HierarchyNode, HierarchyScope, NodeId,
    ParentPatch, ParentRef, PatchError, Snapshot,
};
use reorg_engine::{BackendError, HierarchyBackend};

/// Server-side rejection reasons. Their display text is what the real
/// backend would send in a 4xx body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("unknown assembly {0}")]
    UnknownAssembly(AssemblyId),

    #[error("node {0} already exists")]
    DuplicateNode(NodeId),

    #[error(transparent)]
    InvalidPatch(#[from] PatchError),

    #[error("moving node {node} under {target} would create a cycle")]
    CycleDetected { node: NodeId, target: NodeId },
}

/// Flat record for one node.
#[derive(Debug, Clone)]
struct StoredNode {
    id: NodeId,
    level_name: String,
    display_name: String,
    parent: ParentRef,
}

/// Flat, mutable hierarchy for one `(state, party)` scope.
#[derive(Debug)]
pub struct HierarchyStore {
    state_id: i64,
    party_id: i64,
    assemblies: Vec<AssemblyAnchor>,
    nodes: HashMap<NodeId, StoredNode>,
}

impl HierarchyStore {
    pub fn scope(&self) -> HierarchyScope {
        HierarchyScope {
            state_id: self.state_id,
            party_id: self.party_id,
        }
    }

    pub fn new(state_id: i64, party_id: i64) -> Self {
        Self {
            state_id,
            party_id,
            assemblies: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    pub fn add_assembly(&mut self, id: i64, display_name: &str) -> AssemblyId {
        let id = AssemblyId(id);
        self.assemblies.push(AssemblyAnchor {
            id,
            level_name: "Assembly".to_string(),
            display_name: display_name.to_string(),
        });
        id
    }

    pub fn add_node(
        &mut self,
        id: i64,
        level_name: &str,
        display_name: &str,
        parent: ParentRef,
    ) -> Result<NodeId, StoreError> {
        let id = NodeId(id);
        if self.nodes.contains_key(&id) {
            return Err(StoreError::DuplicateNode(id));
        }
        self.check_parent_exists(parent)?;
        self.nodes.insert(
            id,
            StoredNode {
                id,
                level_name: level_name.to_string(),
                display_name: display_name.to_string(),
                parent,
            },
        );
        Ok(id)
    }

    fn check_parent_exists(&self, parent: ParentRef) -> Result<(), StoreError> {
        match parent {
            ParentRef::Assembly(id) => {
                if !self.assemblies.iter().any(|a| a.id == id) {
                    return Err(StoreError::UnknownAssembly(id));
                }
            }
            ParentRef::Node(id) => {
                if !self.nodes.contains_key(&id) {
                    return Err(StoreError::UnknownNode(id));
                }
            }
        }
        Ok(())
    }

    /// Apply a parent patch with full server-side re-validation.
    pub fn update_parent(&mut self, node: NodeId, patch: &ParentPatch) -> Result<(), StoreError> {
        let new_parent = patch.parent_ref()?;
        if !self.nodes.contains_key(&node) {
            return Err(StoreError::UnknownNode(node));
        }
        self.check_parent_exists(new_parent)?;

        // Walk up from the proposed parent; reaching the moved node means
        // the patch would close a loop.
        if let ParentRef::Node(target) = new_parent {
            let mut cursor = target;
            loop {
                if cursor == node {
                    return Err(StoreError::CycleDetected { node, target });
                }
                match self.nodes.get(&cursor).map(|record| record.parent) {
                    Some(ParentRef::Node(parent)) => cursor = parent,
                    Some(ParentRef::Assembly(_)) | None => break,
                }
            }
        }

        self.nodes
            .get_mut(&node)
            .ok_or(StoreError::UnknownNode(node))?
            .parent = new_parent;
        Ok(())
    }

    /// Assemble the nested snapshot. Children are ordered by id so the
    /// output is stable across calls.
    pub fn snapshot(&self) -> Snapshot {
        let mut children_of: HashMap<ParentRef, Vec<&StoredNode>> = HashMap::new();
        for record in self.nodes.values() {
            children_of.entry(record.parent).or_default().push(record);
        }
        for bucket in children_of.values_mut() {
            bucket.sort_by_key(|record| record.id);
        }

        let assemblies = self
            .assemblies
            .iter()
            .map(|anchor| AssemblyHierarchy {
                assembly: anchor.clone(),
                roots: children_of
                    .get(&ParentRef::Assembly(anchor.id))
                    .map(|roots| {
                        roots
                            .iter()
                            .map(|record| self.build_subtree(record, &children_of))
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Snapshot {
            state_id: self.state_id,
            party_id: self.party_id,
            assemblies,
        }
    }

    fn build_subtree(
        &self,
        record: &StoredNode,
        children_of: &HashMap<ParentRef, Vec<&StoredNode>>,
    ) -> HierarchyNode {
        HierarchyNode {
            id: record.id,
            level_name: record.level_name.clone(),
            display_name: record.display_name.clone(),
            parent: record.parent,
            children: children_of
                .get(&ParentRef::Node(record.id))
                .map(|children| {
                    children
                        .iter()
                        .map(|child| self.build_subtree(child, children_of))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Small two-assembly hierarchy for demos and tests.
    pub fn sample() -> Self {
        let mut store = Self::new(1, 1);
        let north = store.add_assembly(1, "Assembly North");
        let south = store.add_assembly(2, "Assembly South");

        let block = store
            .add_node(100, "Block", "Block Alpha", ParentRef::Assembly(north))
            .expect("fresh store");
        let mandal = store
            .add_node(200, "Mandal", "Mandal One", ParentRef::Node(block))
            .expect("fresh store");
        store
            .add_node(300, "Booth", "Booth 12", ParentRef::Node(mandal))
            .expect("fresh store");
        store
            .add_node(101, "Block", "Block Beta", ParentRef::Assembly(south))
            .expect("fresh store");
        store
    }
}

/// [`HierarchyBackend`] over a [`HierarchyStore`], with call counters and
/// injectable failures for tests.
#[derive(Debug)]
pub struct InMemoryBackend {
    store: RwLock<HierarchyStore>,
    fetch_calls: AtomicUsize,
    update_calls: AtomicUsize,
    fail_next_fetch: Mutex<Option<BackendError>>,
    fail_next_update: Mutex<Option<BackendError>>,
}

impl InMemoryBackend {
    pub fn new(store: HierarchyStore) -> Self {
        Self {
            store: RwLock::new(store),
            fetch_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            fail_next_fetch: Mutex::new(None),
            fail_next_update: Mutex::new(None),
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Make the next fetch fail once.
    pub fn fail_next_fetch(&self, err: BackendError) {
        *self.fail_next_fetch.lock().unwrap() = Some(err);
    }

    /// Make the next update fail once.
    pub fn fail_next_update(&self, err: BackendError) {
        *self.fail_next_update.lock().unwrap() = Some(err);
    }

    /// Inspect the current server-side truth.
    pub fn current_snapshot(&self) -> Snapshot {
        self.store.read().unwrap().snapshot()
    }
}

#[async_trait]
impl HierarchyBackend for InMemoryBackend {
    async fn fetch_hierarchy(&self, _scope: HierarchyScope) -> Result<Snapshot, BackendError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_next_fetch.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.store.read().unwrap().snapshot())
    }

    async fn update_parent_ref(
        &self,
        node: NodeId,
        patch: &ParentPatch,
    ) -> Result<(), BackendError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_next_update.lock().unwrap().take() {
            return Err(err);
        }
        self.store
            .write()
            .unwrap()
            .update_parent(node, patch)
            .map_err(|err| BackendError::Remote(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use org_console_types::Validate;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sample_snapshot_is_valid_and_nested() {
        let store = HierarchyStore::sample();
        let snapshot = store.snapshot();

        snapshot.validate().unwrap();
        assert_eq!(snapshot.assemblies.len(), 2);
        let north = &snapshot.assemblies[0];
        assert_eq!(north.roots.len(), 1);
        assert_eq!(north.roots[0].children[0].id, NodeId(200));
        assert_eq!(north.roots[0].children[0].children[0].id, NodeId(300));
    }

    #[test]
    fn test_update_parent_moves_subtree() {
        let mut store = HierarchyStore::sample();
        // Move Mandal One (with its booth) under Block Beta.
        store
            .update_parent(NodeId(200), &ParentPatch::node(NodeId(101)))
            .unwrap();

        let snapshot = store.snapshot();
        snapshot.validate().unwrap();
        let south = &snapshot.assemblies[1];
        let beta = &south.roots[0];
        assert_eq!(beta.children[0].id, NodeId(200));
        assert_eq!(beta.children[0].children[0].id, NodeId(300));
    }

    #[test]
    fn test_update_parent_rejects_cycles() {
        let mut store = HierarchyStore::sample();
        // Block Alpha under its own grandchild booth.
        let err = store
            .update_parent(NodeId(100), &ParentPatch::node(NodeId(300)))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::CycleDetected {
                node: NodeId(100),
                target: NodeId(300),
            }
        );
    }

    #[test]
    fn test_update_parent_rejects_self() {
        let mut store = HierarchyStore::sample();
        let err = store
            .update_parent(NodeId(100), &ParentPatch::node(NodeId(100)))
            .unwrap_err();
        assert!(matches!(err, StoreError::CycleDetected { .. }));
    }

    #[test]
    fn test_update_parent_rejects_unknown_ids() {
        let mut store = HierarchyStore::sample();
        assert_eq!(
            store.update_parent(NodeId(999), &ParentPatch::node(NodeId(100))),
            Err(StoreError::UnknownNode(NodeId(999)))
        );
        assert_eq!(
            store.update_parent(NodeId(100), &ParentPatch::assembly(AssemblyId(99))),
            Err(StoreError::UnknownAssembly(AssemblyId(99)))
        );
    }

    #[test]
    fn test_update_parent_rejects_ambiguous_patch() {
        let mut store = HierarchyStore::sample();
        let both = ParentPatch {
            parent_id: Some(NodeId(101)),
            parent_assembly_id: Some(AssemblyId(1)),
        };
        assert_eq!(
            store.update_parent(NodeId(200), &both),
            Err(StoreError::InvalidPatch(PatchError::AmbiguousParent))
        );
    }
}
