//! Typed identifiers for hierarchy entities.
//!
//! The backend issues plain integer ids; newtypes keep node and assembly
//! ids from crossing over at call sites.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a draggable hierarchy node. Globally unique across the
/// whole snapshot, stable across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a fixed Assembly anchor. Assemblies are not hierarchy
/// nodes and never share an id space with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssemblyId(pub i64);

impl fmt::Display for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
