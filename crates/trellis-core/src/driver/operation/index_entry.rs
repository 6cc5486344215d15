use super::*;

use crate::{driver::NodeId, Value};

#[derive(Debug)]
pub struct IndexEntry {
    /// Index name; one index per entity class
    pub index: String,

    /// Indexed property name
    pub key: String,

    /// Property value to index under
    pub value: Value,

    /// The node the entry points at. Previous entries for the same node and
    /// key are replaced.
    pub node: NodeId,
}

impl From<IndexEntry> for Operation {
    fn from(value: IndexEntry) -> Self {
        Self::IndexEntry(value)
    }
}
