use crate::{entity::Entity, manager::EntityManager, Ref};

use trellis_core::{
    driver::{operation::QueryIndex, NodeId},
    err, EntityMeta, PropertyMeta, Result, Value,
};

use std::{marker::PhantomData, sync::Arc};

/// Built per entity class by [`EntityManager::repository`].
///
/// The default variant is [`NodeRepository`]; an entity can substitute its
/// own through the [`Entity::Repository`] associated type, typically by
/// wrapping the generic one.
pub trait EntityRepository<M: Entity>: Clone + 'static {
    fn build(manager: EntityManager, meta: Arc<EntityMeta>) -> Self;
}

/// The generic per-class query façade.
pub struct NodeRepository<M: Entity> {
    manager: EntityManager,
    meta: Arc<EntityMeta>,
    _entity: PhantomData<fn() -> M>,
}

impl<M: Entity> EntityRepository<M> for NodeRepository<M> {
    fn build(manager: EntityManager, meta: Arc<EntityMeta>) -> Self {
        Self {
            manager,
            meta,
            _entity: PhantomData,
        }
    }
}

impl<M: Entity> NodeRepository<M> {
    /// Fetch one entity of this class by store identifier.
    pub fn find(&self, id: NodeId) -> Result<Option<Ref<M>>> {
        self.manager.find::<M>(id)
    }

    /// All entities whose indexed property matches `value`, in store order.
    ///
    /// `accessor` may be a bare property name or a dynamic accessor such as
    /// `find_by_code`; either way it must resolve to an indexed property.
    pub fn find_by(&self, accessor: &str, value: impl Into<Value>) -> Result<Vec<Ref<M>>> {
        let property = self.indexed_property(accessor)?;

        let response = self.manager.inner().store().exec(
            QueryIndex {
                index: self.meta.name().to_string(),
                key: property.name.clone(),
                value: value.into(),
            }
            .into(),
        )?;

        response
            .rows
            .into_nodes()
            .iter()
            .map(|node| self.manager.inner().hydrate(node))
            .collect()
    }

    /// The first entity whose indexed property matches `value`, if any.
    pub fn find_one_by(&self, accessor: &str, value: impl Into<Value>) -> Result<Option<Ref<M>>> {
        Ok(self.find_by(accessor, value)?.into_iter().next())
    }

    /// Resolves a finder accessor, failing closed: an unmapped name or a
    /// non-indexed hit is an error, never a silent empty result.
    fn indexed_property(&self, accessor: &str) -> Result<&PropertyMeta> {
        let Some(property) = self.meta.find_property(accessor) else {
            return Err(err!(
                "entity `{}` has no property matching `{accessor}`",
                self.meta.name()
            ));
        };

        if !property.is_indexed() {
            return Err(err!(
                "property `{}` of entity `{}` is not indexed",
                property.name,
                self.meta.name()
            ));
        }

        Ok(property)
    }
}

impl<M: Entity> std::fmt::Debug for NodeRepository<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRepository")
            .field("meta", &self.meta.name())
            .finish()
    }
}

impl<M: Entity> Clone for NodeRepository<M> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            meta: self.meta.clone(),
            _entity: PhantomData,
        }
    }
}
