//! Engine controller: snapshot owner, drag phase, reparent execution.
//!
//! ## Reconciliation policy
//!
//! Every commit attempt, success or failure, ends in either "no call was
//! made" or "a fresh snapshot was loaded". The engine never patches the
//! tree locally and rolls back: the server may apply cascading side
//! effects (re-deriving a node's effective assembly when its parent moves
//! to a different lineage) that the client cannot predict from the patch
//! alone. Whole-snapshot reload after both outcomes keeps the client
//! read-after-write consistent with the one shared mutable resource, the
//! server-side hierarchy.

use std::sync::Arc;

use tracing::{debug, warn};

use org_console_types::{HierarchyScope, NodeId, Snapshot, Validate};

use crate::backend::HierarchyBackend;
use crate::error::EngineError;
use crate::gesture::DragPhase;
use crate::index::TreeIndex;
use crate::planner::{plan_move, MovePlan};
use crate::resolver::DropCandidate;

/// Single owner of the in-memory hierarchy and the drag lifecycle.
pub struct ReorgEngine {
    backend: Arc<dyn HierarchyBackend>,
    scope: HierarchyScope,
    snapshot: Option<Snapshot>,
    phase: DragPhase,
    stale: bool,
}

impl ReorgEngine {
    pub fn new(backend: Arc<dyn HierarchyBackend>, scope: HierarchyScope) -> Self {
        Self {
            backend,
            scope,
            snapshot: None,
            phase: DragPhase::Idle,
            stale: false,
        }
    }

    /// Fetch, validate, and install a fresh snapshot.
    pub async fn load(&mut self) -> Result<(), EngineError> {
        match self.backend.fetch_hierarchy(self.scope).await {
            Ok(snapshot) => {
                snapshot.validate()?;
                debug!(nodes = snapshot.node_count(), "hierarchy snapshot installed");
                self.snapshot = Some(snapshot);
                self.stale = false;
                Ok(())
            }
            Err(err) => {
                self.stale = self.snapshot.is_some();
                Err(err.into())
            }
        }
    }

    /// Last installed snapshot, if any.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Lookup index over the current snapshot. Rebuilt per call; cache it
    /// for the duration of one render cycle, no longer.
    pub fn index(&self) -> Result<TreeIndex<'_>, EngineError> {
        let snapshot = self.snapshot.as_ref().ok_or(EngineError::NotLoaded)?;
        Ok(TreeIndex::build(snapshot))
    }

    pub fn scope(&self) -> HierarchyScope {
        self.scope
    }

    /// Current drag phase, observable for rendering and tests.
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// True while a reparent round-trip is outstanding.
    pub fn is_updating(&self) -> bool {
        self.phase.is_updating()
    }

    /// True when the last reconciling fetch failed and the view no longer
    /// reflects known server state. Cleared by the next successful load.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Start dragging a node. Unknown ids are a no-op rejection; a new
    /// gesture supersedes an abandoned one.
    pub fn begin_drag(&mut self, node: NodeId) -> Result<(), EngineError> {
        if self.is_updating() {
            return Err(EngineError::Busy);
        }
        if self.index()?.find_node(node).is_none() {
            return Err(crate::planner::MoveRejected::NoOp.into());
        }
        self.phase = DragPhase::Dragging { node };
        Ok(())
    }

    /// Abandon the current gesture. No side effects: nothing was
    /// committed yet.
    pub fn cancel_drag(&mut self) {
        if let DragPhase::Dragging { .. } = self.phase {
            self.phase = DragPhase::Idle;
        }
    }

    /// Plan a move for the node currently being dragged.
    pub fn plan(&self, resolved: Option<&DropCandidate>) -> Result<MovePlan, EngineError> {
        let DragPhase::Dragging { node } = self.phase else {
            return Err(crate::planner::MoveRejected::NoOp.into());
        };
        let index = self.index()?;
        plan_move(&index, node, resolved).map_err(EngineError::from)
    }

    /// Commit a plan: one serialized round-trip, then reconcile by
    /// reloading the snapshot regardless of outcome.
    pub async fn execute(&mut self, plan: &MovePlan) -> Result<(), EngineError> {
        if self.is_updating() {
            return Err(EngineError::Busy);
        }
        self.phase = DragPhase::Committing { node: plan.node };

        let patch = plan.patch();
        debug!(node = %plan.node, ?patch, "committing reparent");
        let update = self.backend.update_parent_ref(plan.node, &patch).await;

        let reload = self.load().await;
        self.phase = DragPhase::Idle;

        match (update, reload) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(fetch)) => Err(EngineError::Stale(Box::new(fetch))),
            (Err(remote), Ok(())) => Err(remote.into()),
            (Err(remote), Err(fetch)) => {
                warn!(%fetch, "reconciling fetch failed after rejected update");
                Err(remote.into())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn force_phase(&mut self, phase: DragPhase) {
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use org_console_types::{
        AssemblyAnchor, AssemblyHierarchy, AssemblyId, HierarchyNode, NodeId, ParentPatch,
        ParentRef,
    };
    use pretty_assertions::assert_eq;

    use crate::backend::BackendError;
    use crate::planner::MoveRejected;

    use super::*;

    /// Scripted backend: serves a fixed snapshot, counts calls, fails on
    /// demand.
    #[derive(Default)]
    struct StubBackend {
        snapshot: Mutex<Option<Snapshot>>,
        fetch_calls: AtomicUsize,
        update_calls: AtomicUsize,
        fail_update: Mutex<Option<BackendError>>,
        fail_fetch: Mutex<Option<BackendError>>,
    }

    impl StubBackend {
        fn with_snapshot(snapshot: Snapshot) -> Self {
            Self {
                snapshot: Mutex::new(Some(snapshot)),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl HierarchyBackend for StubBackend {
        async fn fetch_hierarchy(&self, _scope: HierarchyScope) -> Result<Snapshot, BackendError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_fetch.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self.snapshot.lock().unwrap().clone().expect("no snapshot scripted"))
        }

        async fn update_parent_ref(
            &self,
            _node: NodeId,
            _patch: &ParentPatch,
        ) -> Result<(), BackendError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_update.lock().unwrap().take() {
                return Err(err);
            }
            Ok(())
        }
    }

    fn scope() -> HierarchyScope {
        HierarchyScope {
            state_id: 1,
            party_id: 2,
        }
    }

    fn node(id: i64, parent: ParentRef) -> HierarchyNode {
        HierarchyNode {
            id: NodeId(id),
            level_name: "Block".to_string(),
            display_name: format!("Node {id}"),
            parent,
            children: Vec::new(),
        }
    }

    fn sample() -> Snapshot {
        Snapshot {
            state_id: 1,
            party_id: 2,
            assemblies: vec![AssemblyHierarchy {
                assembly: AssemblyAnchor {
                    id: AssemblyId(10),
                    level_name: "Assembly".to_string(),
                    display_name: "A1".to_string(),
                },
                roots: vec![
                    node(100, ParentRef::Assembly(AssemblyId(10))),
                    node(101, ParentRef::Assembly(AssemblyId(10))),
                ],
            }],
        }
    }

    fn plan() -> MovePlan {
        MovePlan {
            node: NodeId(100),
            new_parent: ParentRef::Node(NodeId(101)),
        }
    }

    #[tokio::test]
    async fn test_load_installs_validated_snapshot() {
        let backend = Arc::new(StubBackend::with_snapshot(sample()));
        let mut engine = ReorgEngine::new(backend, scope());

        assert!(engine.snapshot().is_none());
        engine.load().await.unwrap();
        assert_eq!(engine.snapshot().unwrap().node_count(), 2);
        assert!(!engine.is_stale());
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_snapshot() {
        let mut bad = sample();
        // Duplicate a node id across roots.
        bad.assemblies[0].roots[1].id = NodeId(100);

        let backend = Arc::new(StubBackend::with_snapshot(bad));
        let mut engine = ReorgEngine::new(backend, scope());

        let err = engine.load().await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidSnapshot(_)));
        assert!(engine.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_execute_success_reconciles_via_reload() {
        let backend = Arc::new(StubBackend::with_snapshot(sample()));
        let mut engine = ReorgEngine::new(Arc::clone(&backend) as Arc<dyn HierarchyBackend>, scope());
        engine.load().await.unwrap();
        let fetches_before = backend.fetch_calls.load(Ordering::SeqCst);

        engine.execute(&plan()).await.unwrap();

        assert_eq!(backend.update_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.fetch_calls.load(Ordering::SeqCst), fetches_before + 1);
        assert_eq!(engine.phase(), DragPhase::Idle);
        assert!(!engine.is_stale());
    }

    #[tokio::test]
    async fn test_execute_failure_still_reloads() {
        let backend = Arc::new(StubBackend::with_snapshot(sample()));
        *backend.fail_update.lock().unwrap() =
            Some(BackendError::Remote("parent not found".to_string()));
        let mut engine = ReorgEngine::new(Arc::clone(&backend) as Arc<dyn HierarchyBackend>, scope());
        engine.load().await.unwrap();
        let fetches_before = backend.fetch_calls.load(Ordering::SeqCst);

        let err = engine.execute(&plan()).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Backend(BackendError::Remote("parent not found".to_string()))
        );
        // The reconciling fetch still happened.
        assert_eq!(backend.fetch_calls.load(Ordering::SeqCst), fetches_before + 1);
        assert_eq!(engine.phase(), DragPhase::Idle);
        assert!(!engine.is_stale());
    }

    #[tokio::test]
    async fn test_execute_marks_stale_when_reload_fails() {
        let backend = Arc::new(StubBackend::with_snapshot(sample()));
        let mut engine = ReorgEngine::new(Arc::clone(&backend) as Arc<dyn HierarchyBackend>, scope());
        engine.load().await.unwrap();

        *backend.fail_fetch.lock().unwrap() =
            Some(BackendError::Network("connection reset".to_string()));
        let err = engine.execute(&plan()).await.unwrap_err();
        assert!(matches!(err, EngineError::Stale(_)));
        assert!(engine.is_stale());

        // A later successful reload clears the stale marker.
        engine.load().await.unwrap();
        assert!(!engine.is_stale());
    }

    #[tokio::test]
    async fn test_execute_refuses_second_in_flight_commit() {
        let backend = Arc::new(StubBackend::with_snapshot(sample()));
        let mut engine = ReorgEngine::new(backend, scope());
        engine.load().await.unwrap();

        engine.force_phase(DragPhase::Committing { node: NodeId(100) });
        let err = engine.execute(&plan()).await.unwrap_err();
        assert_eq!(err, EngineError::Busy);

        let err = engine.begin_drag(NodeId(100)).unwrap_err();
        assert_eq!(err, EngineError::Busy);
    }

    #[tokio::test]
    async fn test_drag_lifecycle() {
        let backend = Arc::new(StubBackend::with_snapshot(sample()));
        let mut engine = ReorgEngine::new(backend, scope());
        engine.load().await.unwrap();

        assert_eq!(
            engine.begin_drag(NodeId(999)).unwrap_err(),
            EngineError::Rejected(MoveRejected::NoOp)
        );

        engine.begin_drag(NodeId(100)).unwrap();
        assert_eq!(engine.phase(), DragPhase::Dragging { node: NodeId(100) });

        engine.cancel_drag();
        assert_eq!(engine.phase(), DragPhase::Idle);
    }

    #[tokio::test]
    async fn test_plan_requires_an_active_drag() {
        let backend = Arc::new(StubBackend::with_snapshot(sample()));
        let mut engine = ReorgEngine::new(backend, scope());
        engine.load().await.unwrap();

        let err = engine.plan(None).unwrap_err();
        assert_eq!(err, EngineError::Rejected(MoveRejected::NoOp));
    }
}
