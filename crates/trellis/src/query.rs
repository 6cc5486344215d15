use crate::{entity::Entity, manager::EntityManager, Ref};

use trellis_core::{
    driver::{operation, NodeId},
    err, Result, Value,
};

use std::collections::BTreeMap;

/// A parameterized query against the store, in whatever dialect the driver
/// understands.
///
/// Placeholders are bound to entities with [`ParamQuery::set`]; execution
/// substitutes each entity's node identifier.
pub struct ParamQuery {
    manager: EntityManager,
    text: String,
    params: BTreeMap<String, Option<NodeId>>,
}

impl ParamQuery {
    pub(crate) fn new(manager: EntityManager, text: String) -> Self {
        Self {
            manager,
            text,
            params: BTreeMap::new(),
        }
    }

    /// Bind a placeholder to an entity.
    pub fn set<M: Entity>(&mut self, name: impl Into<String>, entity: &Ref<M>) -> &mut Self {
        self.params.insert(name.into(), entity.node_id());
        self
    }

    /// Execute the query and return its result map.
    pub fn get_map(&self) -> Result<BTreeMap<String, Value>> {
        let mut params = BTreeMap::new();

        for (name, node_id) in &self.params {
            let Some(node_id) = node_id else {
                return Err(err!(
                    "entity bound to placeholder `{name}` has not been flushed"
                ));
            };
            params.insert(name.clone(), *node_id);
        }

        let response = self.manager.inner().store().exec(
            operation::Query {
                text: self.text.clone(),
                params,
            }
            .into(),
        )?;

        Ok(response.rows.into_map())
    }
}
