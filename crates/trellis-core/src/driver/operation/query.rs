use super::*;

use crate::driver::NodeId;

use std::collections::BTreeMap;

#[derive(Debug)]
pub struct Query {
    /// Query text, in whatever dialect the driver understands
    pub text: String,

    /// Placeholder name to node bindings
    pub params: BTreeMap<String, NodeId>,
}

impl From<Query> for Operation {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}
