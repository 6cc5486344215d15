use super::*;

use crate::{driver::NodeId, Value};

use std::collections::BTreeMap;

#[derive(Debug)]
pub struct UpdateNode {
    /// Which node to update
    pub node: NodeId,

    /// Properties to merge in. Properties not named here keep their stored
    /// value.
    pub properties: BTreeMap<String, Value>,
}

impl From<UpdateNode> for Operation {
    fn from(value: UpdateNode) -> Self {
        Self::UpdateNode(value)
    }
}
