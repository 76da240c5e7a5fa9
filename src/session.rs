//! Drag session controller.
//!
//! Wires the engine to the notification surface and owns the per-gesture
//! flow: begin, continuous pointer feedback, drop. One session per open
//! console view; the engine inside is the single owner of tree state and
//! drag phase.

use std::sync::Arc;

use tracing::debug;

use org_console_types::{HierarchyScope, NodeId, Snapshot};
use reorg_engine::{
    resolve_drop_target, DropCandidate, EngineError, HierarchyBackend, MoveRejected, ReorgEngine,
    Vec2,
};

use crate::error::ConsoleError;
use crate::notify::Notifier;

/// How one drop ended. `Ignored` is the silent no-op path; everything
/// else was surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing actionable under the pointer; no call, no toast.
    Ignored,
    /// Rejected locally before any network traffic.
    Rejected(MoveRejected),
    /// Patch accepted and a fresh snapshot installed.
    Committed,
    /// Backend refused or transport failed; a reconciling reload ran.
    Failed(EngineError),
}

/// Console-side owner of one hierarchy view.
pub struct ConsoleSession {
    engine: ReorgEngine,
    notifier: Arc<dyn Notifier>,
}

impl ConsoleSession {
    pub fn new(
        backend: Arc<dyn HierarchyBackend>,
        scope: HierarchyScope,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            engine: ReorgEngine::new(backend, scope),
            notifier,
        }
    }

    /// Initial load / manual retry. Failures are operator-visible.
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        match self.engine.load().await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.notifier.error(&format!("Failed to load hierarchy: {err}"));
                Err(err.into())
            }
        }
    }

    pub fn engine(&self) -> &ReorgEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.engine.snapshot()
    }

    /// True while a commit is in flight; the view shows a blocking
    /// overlay instead of queueing gestures.
    pub fn is_busy(&self) -> bool {
        self.engine.is_updating()
    }

    /// Start dragging. `Busy` while committing; unknown nodes are a
    /// no-op rejection.
    pub fn begin_drag(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.engine.begin_drag(node)
    }

    /// Abandon the gesture with no side effects.
    pub fn cancel_drag(&mut self) {
        self.engine.cancel_drag();
    }

    /// Re-resolve on pointer move for highlight feedback. Pure; runs on
    /// every pointer event.
    pub fn pointer_feedback<'a>(
        &self,
        pointer: Vec2,
        candidates: &'a [DropCandidate],
    ) -> Option<&'a DropCandidate> {
        resolve_drop_target(pointer, candidates)
    }

    /// Finish the gesture: resolve, plan, and (if accepted) commit.
    pub async fn complete_drop(
        &mut self,
        pointer: Vec2,
        candidates: &[DropCandidate],
    ) -> DropOutcome {
        let resolved = resolve_drop_target(pointer, candidates);

        let plan = match self.engine.plan(resolved) {
            Ok(plan) => plan,
            Err(EngineError::Rejected(MoveRejected::NoOp)) => {
                debug!("drop ignored: nothing actionable");
                self.engine.cancel_drag();
                return DropOutcome::Ignored;
            }
            Err(EngineError::Rejected(reason)) => {
                self.engine.cancel_drag();
                self.notifier.error(&reason.to_string());
                return DropOutcome::Rejected(reason);
            }
            Err(err) => {
                self.engine.cancel_drag();
                self.notifier.error(&err.to_string());
                return DropOutcome::Failed(err);
            }
        };

        match self.engine.execute(&plan).await {
            Ok(()) => {
                self.notifier.success("Hierarchy updated");
                DropOutcome::Committed
            }
            Err(err) => {
                self.notifier.error(&err.to_string());
                DropOutcome::Failed(err)
            }
        }
    }
}
