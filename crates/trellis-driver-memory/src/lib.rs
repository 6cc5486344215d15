use trellis_core::{
    driver::{operation, EdgeId, EdgeRecord, NodeId, NodeRecord, Operation, Response},
    schema::Direction,
    Error, Result, Store, Value,
};

use indexmap::IndexMap;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

/// An in-memory graph store.
///
/// Nodes and edges live in insertion order, which is what gives relation
/// traversals their deterministic ordering. Shareable across managers; every
/// operation takes the store lock for its duration.
///
/// The opaque query surface understands a tiny traversal dialect:
/// `v(:name).map` returns the properties of the node bound to `name`, and
/// `v(:name).out_e.map` the properties of its first outgoing edge.
#[derive(Debug, Default)]
pub struct Memory {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    nodes: IndexMap<NodeId, NodeRecord>,
    edges: Vec<EdgeRecord>,

    /// (index, key, canonical value) to node ids, in insertion order.
    index: HashMap<(String, String, String), Vec<NodeId>>,

    next_node: u64,
    next_edge: u64,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.state.lock().unwrap().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.state.lock().unwrap().edges.len()
    }
}

impl Store for Memory {
    fn exec(&self, op: Operation) -> Result<Response> {
        tracing::trace!(?op, "exec");

        let mut state = self.state.lock().unwrap();

        match op {
            Operation::CreateNode(op) => Ok(Response::node_id(state.create_node(op))),
            Operation::UpdateNode(op) => state.update_node(op),
            Operation::CreateEdge(op) => state.create_edge(op),
            Operation::GetNode(op) => Ok(Response::nodes(state.get_node(&op))),
            Operation::GetRelated(op) => Ok(Response::nodes(state.get_related(&op))),
            Operation::IndexEntry(op) => {
                state.index_entry(op);
                Ok(Response::count(1))
            }
            Operation::QueryIndex(op) => Ok(Response::nodes(state.query_index(&op))),
            Operation::Query(op) => state.query(&op),
        }
    }
}

impl State {
    fn create_node(&mut self, op: operation::CreateNode) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);

        self.nodes.insert(
            id,
            NodeRecord {
                id,
                label: op.label,
                properties: op.properties,
            },
        );

        id
    }

    fn update_node(&mut self, op: operation::UpdateNode) -> Result<Response> {
        let Some(node) = self.nodes.get_mut(&op.node) else {
            return Err(Error::store(format!("node {} does not exist", op.node)));
        };

        // Merge semantics: untouched properties keep their stored value.
        for (key, value) in op.properties {
            node.properties.insert(key, value);
        }

        Ok(Response::count(1))
    }

    fn create_edge(&mut self, op: operation::CreateEdge) -> Result<Response> {
        for endpoint in [op.from, op.to] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(Error::store(format!("node {endpoint} does not exist")));
            }
        }

        self.next_edge += 1;
        self.edges.push(EdgeRecord {
            id: EdgeId(self.next_edge),
            label: op.label,
            from: op.from,
            to: op.to,
            properties: op.properties,
        });

        Ok(Response::count(1))
    }

    fn get_node(&self, op: &operation::GetNode) -> Vec<NodeRecord> {
        self.nodes.get(&op.node).cloned().into_iter().collect()
    }

    fn get_related(&self, op: &operation::GetRelated) -> Vec<NodeRecord> {
        self.edges
            .iter()
            .filter(|edge| edge.label == op.label)
            .filter_map(|edge| {
                let far = match op.direction {
                    Direction::Out if edge.from == op.node => edge.to,
                    Direction::In if edge.to == op.node => edge.from,
                    _ => return None,
                };
                self.nodes.get(&far).cloned()
            })
            .collect()
    }

    fn index_entry(&mut self, op: operation::IndexEntry) {
        // One live entry per node and key: drop whatever the node was
        // previously indexed under.
        for ((index, key, _), nodes) in self.index.iter_mut() {
            if *index == op.index && *key == op.key {
                nodes.retain(|node| *node != op.node);
            }
        }

        self.index
            .entry((op.index, op.key, canonical(&op.value)))
            .or_default()
            .push(op.node);
    }

    fn query_index(&self, op: &operation::QueryIndex) -> Vec<NodeRecord> {
        let entry = (op.index.clone(), op.key.clone(), canonical(&op.value));

        self.index
            .get(&entry)
            .into_iter()
            .flatten()
            .filter_map(|node| self.nodes.get(node).cloned())
            .collect()
    }

    fn query(&self, op: &operation::Query) -> Result<Response> {
        let text = op.text.trim();

        let Some(rest) = text.strip_prefix("v(:") else {
            return Err(Error::store(format!("unsupported query `{text}`")));
        };
        let Some((name, tail)) = rest.split_once(')') else {
            return Err(Error::store(format!("unsupported query `{text}`")));
        };

        let Some(&node) = op.params.get(name) else {
            return Err(Error::store(format!("unbound query placeholder `{name}`")));
        };

        match tail {
            ".map" => {
                let Some(record) = self.nodes.get(&node) else {
                    return Err(Error::store(format!("node {node} does not exist")));
                };
                Ok(Response::map(record.properties.clone()))
            }
            ".out_e.map" => {
                let properties = self
                    .edges
                    .iter()
                    .find(|edge| edge.from == node)
                    .map(|edge| edge.properties.clone())
                    .unwrap_or_else(BTreeMap::new);
                Ok(Response::map(properties))
            }
            _ => Err(Error::store(format!("unsupported query `{text}`"))),
        }
    }
}

fn canonical(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
