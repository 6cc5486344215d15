use super::{NodeId, NodeRecord};
use crate::Value;

use std::collections::BTreeMap;

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of records impacted by the operation
    Count(u64),

    /// Identifier assigned to a newly created node
    NodeId(NodeId),

    /// Node records, in store order
    Nodes(Vec<NodeRecord>),

    /// Result of an opaque query
    Map(BTreeMap<String, Value>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn node_id(id: NodeId) -> Self {
        Self {
            rows: Rows::NodeId(id),
        }
    }

    pub fn nodes(nodes: Vec<NodeRecord>) -> Self {
        Self {
            rows: Rows::Nodes(nodes),
        }
    }

    pub fn map(map: BTreeMap<String, Value>) -> Self {
        Self {
            rows: Rows::Map(map),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_nodes(&self) -> bool {
        matches!(self, Self::Nodes(_))
    }

    #[track_caller]
    pub fn into_node_id(self) -> NodeId {
        match self {
            Self::NodeId(id) => id,
            _ => panic!("expected Rows::NodeId, but was {self:#?}"),
        }
    }

    #[track_caller]
    pub fn into_nodes(self) -> Vec<NodeRecord> {
        match self {
            Self::Nodes(nodes) => nodes,
            _ => panic!("expected Rows::Nodes, but was {self:#?}"),
        }
    }

    #[track_caller]
    pub fn into_map(self) -> BTreeMap<String, Value> {
        match self {
            Self::Map(map) => map,
            _ => panic!("expected Rows::Map, but was {self:#?}"),
        }
    }
}
