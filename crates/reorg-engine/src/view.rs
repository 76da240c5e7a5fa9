//! View projections: tree and grid renderings of one snapshot.
//!
//! Both projections consume the same node list and emit the same two
//! primitives to the DnD layer: a draggable region per visible node, and
//! explicit drop zones (one per assembly root context, one "make this a
//! parent" affordance per visible node). Switching views never touches
//! engine state; expand/collapse is local UI state, not data model.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use org_console_types::{AssemblyId, HierarchyNode, NodeId, Snapshot};

use crate::resolver::DropTarget;

/// Which rendering the operator picked. Ephemeral preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Indented tree with expand/collapse.
    #[default]
    Tree,
    /// Flat grid of every node; collapse state does not apply.
    Grid,
}

/// Per-node expand/collapse state. Keyed by id, so it survives snapshot
/// reloads without belonging to the data model.
#[derive(Debug, Clone, Default)]
pub struct CollapseState {
    collapsed: HashSet<NodeId>,
}

impl CollapseState {
    pub fn is_collapsed(&self, node: NodeId) -> bool {
        self.collapsed.contains(&node)
    }

    pub fn toggle(&mut self, node: NodeId) {
        if !self.collapsed.remove(&node) {
            self.collapsed.insert(node);
        }
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }
}

/// One visual row of either projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Assembly {
        id: AssemblyId,
        label: String,
    },
    Node {
        id: NodeId,
        label: String,
        level: String,
        /// Indentation depth; always 0 in grid mode.
        depth: usize,
        has_children: bool,
        collapsed: bool,
    },
}

/// Declared explicit drop zone the rendering layer must mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDecl {
    pub target: DropTarget,
    /// Operator-facing intent text, e.g. "Move under Assembly North".
    pub label: String,
}

/// Render-ready projection of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub rows: Vec<Row>,
    /// Draggable region per visible node, in row order. Node bodies
    /// double as implicit drop candidates.
    pub drag_sources: Vec<NodeId>,
    /// Explicit zones, in row order; feeds the resolver's tie-breaking.
    pub drop_zones: Vec<ZoneDecl>,
}

/// Project a snapshot into rows plus DnD primitives.
pub fn project(snapshot: &Snapshot, mode: ViewMode, collapse: &CollapseState) -> Projection {
    let mut out = Projection::default();

    for assembly in &snapshot.assemblies {
        out.rows.push(Row::Assembly {
            id: assembly.assembly.id,
            label: assembly.assembly.display_name.clone(),
        });
        out.drop_zones.push(ZoneDecl {
            target: DropTarget::Assembly(assembly.assembly.id),
            label: format!("Move under {}", assembly.assembly.display_name),
        });

        for root in &assembly.roots {
            match mode {
                ViewMode::Tree => project_subtree(root, 0, collapse, &mut out),
                ViewMode::Grid => project_flat(root, &mut out),
            }
        }
    }

    out
}

fn push_node(node: &HierarchyNode, depth: usize, collapsed: bool, out: &mut Projection) {
    out.rows.push(Row::Node {
        id: node.id,
        label: node.display_name.clone(),
        level: node.level_name.clone(),
        depth,
        has_children: !node.children.is_empty(),
        collapsed,
    });
    out.drag_sources.push(node.id);
    out.drop_zones.push(ZoneDecl {
        target: DropTarget::Node(node.id),
        label: format!("Move under {}", node.display_name),
    });
}

fn project_subtree(
    node: &HierarchyNode,
    depth: usize,
    collapse: &CollapseState,
    out: &mut Projection,
) {
    let collapsed = collapse.is_collapsed(node.id);
    push_node(node, depth, collapsed, out);
    if collapsed {
        return;
    }
    for child in &node.children {
        project_subtree(child, depth + 1, collapse, out);
    }
}

fn project_flat(node: &HierarchyNode, out: &mut Projection) {
    push_node(node, 0, false, out);
    for child in &node.children {
        project_flat(child, out);
    }
}
