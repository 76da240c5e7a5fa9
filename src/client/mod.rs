//! REST clients for the external backend contracts.

mod hierarchy;

pub use hierarchy::RestHierarchyClient;
