//! Backend seam: the two contracts the engine consumes.
//!
//! Everything else about the backend (auth, CRUD forms, pagination) is
//! out of scope; the engine sees exactly a snapshot fetch and a parent
//! update.

use async_trait::async_trait;

use thiserror::Error;

use org_console_types::{HierarchyScope, NodeId, ParentPatch, Snapshot};

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The server refused the request (validation failure, concurrent
    /// modification, server-detected invariant violation). The message is
    /// surfaced to the operator verbatim.
    #[error("backend rejected the request: {0}")]
    Remote(String),

    /// Transport-level failure; nothing is known about server state.
    #[error("network failure: {0}")]
    Network(String),
}

/// The hierarchy backend as the engine sees it.
///
/// Implementations: the REST client in the console crate, the in-memory
/// store used by tests and the mock server.
#[async_trait]
pub trait HierarchyBackend: Send + Sync {
    /// Fetch the full ordered snapshot for one `(state, party)` scope.
    /// The engine never retries automatically.
    async fn fetch_hierarchy(&self, scope: HierarchyScope) -> Result<Snapshot, BackendError>;

    /// Reassign one node's parent reference. Exactly one side of the
    /// patch is set; the server may apply cascading side effects (e.g.
    /// re-deriving effective assemblies) the client cannot predict.
    async fn update_parent_ref(
        &self,
        node: NodeId,
        patch: &ParentPatch,
    ) -> Result<(), BackendError>;
}
