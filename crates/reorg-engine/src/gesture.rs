//! Drag-gesture lifecycle.
//!
//! One value, one owner: the engine controller holds the current
//! [`DragPhase`] and exposes it for rendering (blocking overlay while
//! committing) and for tests. There is no ambient "isUpdating" boolean
//! anywhere else.
//!
//! The full gesture runs `Idle -> Dragging -> drop -> plan -> commit ->
//! Idle`; resolution and planning are synchronous, so the only phases
//! that persist across events are the three below.

use serde::{Deserialize, Serialize};

use org_console_types::NodeId;

/// Observable phase of the drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum DragPhase {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A node is being dragged; the resolver re-runs on every pointer
    /// move for visual feedback.
    Dragging { node: NodeId },
    /// A reparent round-trip is in flight. The only phase in which the
    /// update guard is set; the UI presents a blocking overlay.
    Committing { node: NodeId },
}

impl DragPhase {
    /// True while a reparent round-trip is outstanding.
    pub fn is_updating(&self) -> bool {
        matches!(self, DragPhase::Committing { .. })
    }

    /// The node currently being dragged or committed, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            DragPhase::Idle => None,
            DragPhase::Dragging { node } | DragPhase::Committing { node } => Some(*node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_committing_sets_the_guard() {
        assert!(!DragPhase::Idle.is_updating());
        assert!(!DragPhase::Dragging { node: NodeId(1) }.is_updating());
        assert!(DragPhase::Committing { node: NodeId(1) }.is_updating());
    }

    #[test]
    fn test_phase_serializes_tagged() {
        let phase = DragPhase::Dragging { node: NodeId(7) };
        let value = serde_json::to_value(phase).unwrap();
        assert_eq!(value["phase"], "dragging");
        assert_eq!(value["node"], 7);
    }
}
