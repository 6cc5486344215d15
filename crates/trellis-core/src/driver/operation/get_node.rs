use super::*;

use crate::driver::NodeId;

#[derive(Debug)]
pub struct GetNode {
    /// Which node to fetch
    pub node: NodeId,
}

impl From<GetNode> for Operation {
    fn from(value: GetNode) -> Self {
        Self::GetNode(value)
    }
}
