use super::*;

use crate::{driver::NodeId, schema::Direction};

#[derive(Debug)]
pub struct GetRelated {
    /// Node the traversal starts from
    pub node: NodeId,

    /// Edge label to follow
    pub label: String,

    /// Whether to follow outgoing or incoming edges
    pub direction: Direction,
}

impl From<GetRelated> for Operation {
    fn from(value: GetRelated) -> Self {
        Self::GetRelated(value)
    }
}
