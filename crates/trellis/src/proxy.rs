use crate::{
    entity::Entity,
    manager::ManagerInner,
    relation::{Deferred, Many, One},
    Ref,
};

use trellis_core::{
    driver::{NodeId, NodeRecord},
    EntityMeta, Result, Value,
};

/// Builds live entity handles out of stored nodes.
///
/// There is no runtime subclassing here: a "proxy" is a value of the mapped
/// type whose relation wrappers start deferred and fetch through a weak
/// back-reference to the manager on first read. Hydrated handles are
/// therefore indistinguishable from fresh ones, to metadata resolution and
/// everything else.
pub struct ProxyFactory {
    reuse_loaded: bool,
}

impl ProxyFactory {
    pub fn new() -> Self {
        Self { reuse_loaded: true }
    }

    /// Hand out a fresh handle on every lookup instead of reusing the handle
    /// already loaded for a node.
    pub fn fresh_handles() -> Self {
        Self {
            reuse_loaded: false,
        }
    }

    /// True when lookups should preserve identity through the manager's
    /// loaded-handle map.
    pub(crate) fn reuse_loaded(&self) -> bool {
        self.reuse_loaded
    }

    pub(crate) fn hydrate<M: Entity>(
        &self,
        node: &NodeRecord,
        manager: &ManagerInner,
    ) -> Result<Ref<M>> {
        let meta = manager.registry().get::<M>()?;

        let mut cx = LoadContext {
            node,
            meta: meta.as_ref(),
            manager,
        };

        Ok(Ref::new(M::load(&mut cx)?))
    }
}

impl Default for ProxyFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands a stored node to [`Entity::load`].
pub struct LoadContext<'a> {
    node: &'a NodeRecord,
    meta: &'a EntityMeta,
    manager: &'a ManagerInner,
}

impl LoadContext<'_> {
    /// The store identifier of the node being loaded.
    pub fn node_id(&self) -> NodeId {
        self.node.id
    }

    /// A scalar property value, `Null` when the node does not carry it.
    pub fn scalar(&self, property: &str) -> Value {
        self.node.property(property)
    }

    /// A many-to-many relation wrapper for `property`.
    ///
    /// Readable relations come back deferred; write-only relations come back
    /// permanently empty, they are never reported on load.
    pub fn many<T: Entity>(&self, property: &str) -> Many<T> {
        match self.deferred(property) {
            Some(deferred) => Many::deferred(deferred),
            None => Many::new(),
        }
    }

    /// A many-to-one relation wrapper for `property`.
    pub fn one<T: Entity>(&self, property: &str) -> One<T> {
        match self.deferred(property) {
            Some(deferred) => One::deferred(deferred),
            None => One::new(),
        }
    }

    fn deferred(&self, property: &str) -> Option<Deferred> {
        let relation = self.meta.relation(property)?.expect_relation();

        if relation.write_only {
            return None;
        }

        Some(Deferred::new(
            self.manager.weak_self(),
            self.node.id,
            relation.label.clone(),
            relation.direction,
        ))
    }
}
