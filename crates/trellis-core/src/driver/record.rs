use crate::Value;

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Opaque store identifier of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Opaque store identifier of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

/// A node as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,

    /// The entity class the node was stored under.
    pub label: String,

    pub properties: BTreeMap<String, Value>,
}

/// An edge as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,

    pub label: String,

    pub from: NodeId,
    pub to: NodeId,

    pub properties: BTreeMap<String, Value>,
}

impl NodeRecord {
    /// A property value, `Null` when absent.
    pub fn property(&self, name: &str) -> Value {
        self.properties.get(name).cloned().unwrap_or_default()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}
