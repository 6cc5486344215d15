use super::*;

use crate::Value;

use std::collections::BTreeMap;

#[derive(Debug)]
pub struct CreateNode {
    /// Entity class the node is stored under
    pub label: String,

    /// Initial node properties
    pub properties: BTreeMap<String, Value>,
}

impl From<CreateNode> for Operation {
    fn from(value: CreateNode) -> Self {
        Self::CreateNode(value)
    }
}
