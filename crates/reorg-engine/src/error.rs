//! Engine error taxonomy.
//!
//! Every variant is recoverable and local to one drag gesture; none are
//! fatal to the application.

use thiserror::Error;

use org_console_types::SnapshotError;

use crate::backend::BackendError;
use crate::planner::MoveRejected;

/// Errors surfaced by the engine controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A reparent round-trip is already in flight; commits are strictly
    /// serialized.
    #[error("a reorganization is already in progress")]
    Busy,

    /// The move was rejected locally, before any network call.
    #[error(transparent)]
    Rejected(#[from] MoveRejected),

    /// The backend call failed; a reconciling reload was attempted.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The fetched snapshot violates structural invariants and was not
    /// indexed.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),

    /// No snapshot has been loaded yet.
    #[error("hierarchy not loaded")]
    NotLoaded,

    /// The commit round-trip finished but the reconciling fetch failed;
    /// the in-memory tree is explicitly stale until a manual reload
    /// succeeds.
    #[error("hierarchy reload failed, view may be stale: {0}")]
    Stale(Box<EngineError>),
}
