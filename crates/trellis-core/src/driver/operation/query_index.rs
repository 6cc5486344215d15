use super::*;

use crate::Value;

#[derive(Debug)]
pub struct QueryIndex {
    /// Index name to query
    pub index: String,

    /// Indexed property name
    pub key: String,

    /// Value to match exactly
    pub value: Value,
}

impl From<QueryIndex> for Operation {
    fn from(value: QueryIndex) -> Self {
        Self::QueryIndex(value)
    }
}
