use super::*;

use crate::{driver::NodeId, Value};

use std::collections::BTreeMap;

#[derive(Debug)]
pub struct CreateEdge {
    /// Edge label
    pub label: String,

    /// Source node
    pub from: NodeId,

    /// Target node
    pub to: NodeId,

    /// Edge properties
    pub properties: BTreeMap<String, Value>,
}

impl From<CreateEdge> for Operation {
    fn from(value: CreateEdge) -> Self {
        Self::CreateEdge(value)
    }
}
