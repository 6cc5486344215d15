mod create_edge;
pub use create_edge::CreateEdge;

mod create_node;
pub use create_node::CreateNode;

mod get_node;
pub use get_node::GetNode;

mod get_related;
pub use get_related::GetRelated;

mod index_entry;
pub use index_entry::IndexEntry;

mod query;
pub use query::Query;

mod query_index;
pub use query_index::QueryIndex;

mod update_node;
pub use update_node::UpdateNode;

use super::*;

#[derive(Debug)]
pub enum Operation {
    /// Create a new node, returning its assigned identifier
    CreateNode(CreateNode),

    /// Merge properties into an existing node
    UpdateNode(UpdateNode),

    /// Create a labeled edge between two nodes
    CreateEdge(CreateEdge),

    /// Get a node by its identifier
    GetNode(GetNode),

    /// Get the nodes connected to a node through edges with a given label
    GetRelated(GetRelated),

    /// Replace the index entries of one node property
    IndexEntry(IndexEntry),

    /// Get the nodes matching an indexed property value
    QueryIndex(QueryIndex),

    /// Execute an opaque parameterized query
    Query(Query),
}
