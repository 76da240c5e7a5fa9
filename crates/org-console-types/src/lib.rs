//! Shared Hierarchy Types for org-console
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing the
//! hierarchy HTTP boundary.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  Hierarchy       │  JSON   │  Console         │
//! │  Backend (REST)  │ ◄─────► │  (reorg engine)  │
//! └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. All boundary types live here - no inline struct definitions in handlers
//! 2. camelCase renames on every wire type
//! 3. The `parentId` / `parentAssemblyId` pair is decoded into [`ParentRef`]
//!    at the boundary; exactly one side is ever set

pub mod hierarchy;
pub mod ids;
pub mod patch;
pub mod validate;

pub use hierarchy::{
    AssemblyAnchor, AssemblyHierarchy, HierarchyNode, HierarchyScope, ParentRef, Snapshot,
};
pub use ids::{AssemblyId, NodeId};
pub use patch::{ParentPatch, PatchError};
pub use validate::{SnapshotError, Validate};
