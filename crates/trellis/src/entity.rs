use crate::{proxy::LoadContext, repository::EntityRepository};

use trellis_core::{driver::NodeId, schema::ClassDecl, Result, Value};

use by_address::ByAddress;
use std::{
    any::{Any, TypeId},
    cell,
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

/// A mapped domain type.
///
/// Rust has no runtime reflection, so the surface a derive macro would
/// generate is declared explicitly: the shape of the class ([`Entity::decl`]),
/// a way to populate an instance from a stored node ([`Entity::load`]), and
/// name-based access to the live values the mapper needs when persisting.
pub trait Entity: Sized + 'static {
    /// The repository variant handed out for this entity;
    /// [`NodeRepository<Self>`](crate::NodeRepository) unless overridden.
    type Repository: EntityRepository<Self>;

    /// The declared shape of this class.
    fn decl() -> ClassDecl;

    /// Populate an instance from a stored node.
    fn load(cx: &mut LoadContext<'_>) -> Result<Self>;

    /// The store identifier, once the entity has been flushed or loaded.
    fn node_id(&self) -> Option<NodeId>;

    fn set_node_id(&mut self, id: NodeId);

    /// Current value of a scalar property. `Null` for names the entity does
    /// not declare.
    fn scalar(&self, property: &str) -> Value;

    /// Current in-memory targets of a relation property, in insertion order.
    /// `None` when the relation is lazily deferred and was never touched.
    fn relation_targets(&self, property: &str) -> Option<Vec<AnyRef>>;
}

/// Object-safe view over any [`Entity`], used internally to walk
/// heterogeneous object graphs.
pub(crate) trait AnyEntity {
    fn class_decl(&self) -> ClassDecl;
    fn entity_type(&self) -> TypeId;
    fn node_id(&self) -> Option<NodeId>;
    fn set_node_id(&mut self, id: NodeId);
    fn scalar(&self, property: &str) -> Value;
    fn relation_targets(&self, property: &str) -> Option<Vec<AnyRef>>;
}

impl<M: Entity> AnyEntity for M {
    fn class_decl(&self) -> ClassDecl {
        M::decl()
    }

    fn entity_type(&self) -> TypeId {
        TypeId::of::<M>()
    }

    fn node_id(&self) -> Option<NodeId> {
        Entity::node_id(self)
    }

    fn set_node_id(&mut self, id: NodeId) {
        Entity::set_node_id(self, id)
    }

    fn scalar(&self, property: &str) -> Value {
        Entity::scalar(self, property)
    }

    fn relation_targets(&self, property: &str) -> Option<Vec<AnyRef>> {
        Entity::relation_targets(self, property)
    }
}

/// A shared handle to a live entity.
///
/// Entities participate in object graphs, so handles are reference-counted
/// and compare by identity: two handles are the same entity exactly when
/// [`Ref::ptr_eq`] holds. The unit of work keys on this identity.
pub struct Ref<M: Entity> {
    inner: Rc<RefCell<M>>,
}

impl<M: Entity> Ref<M> {
    pub fn new(entity: M) -> Self {
        Self {
            inner: Rc::new(RefCell::new(entity)),
        }
    }

    pub fn borrow(&self) -> cell::Ref<'_, M> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> cell::RefMut<'_, M> {
        self.inner.borrow_mut()
    }

    /// True if both handles point at the same entity.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The store identifier, once the entity has been flushed or loaded.
    pub fn node_id(&self) -> Option<NodeId> {
        Entity::node_id(&*self.inner.borrow())
    }

    /// Type-erase the handle.
    pub fn to_any(&self) -> AnyRef {
        AnyRef {
            erased: self.inner.clone(),
            any: self.inner.clone(),
        }
    }
}

impl<M: Entity> Clone for Ref<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: Entity + fmt::Debug> fmt::Debug for Ref<M> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_tuple("Ref").field(&self.inner.borrow()).finish()
    }
}

/// A type-erased entity handle.
///
/// Carries the dyn-entity view for graph walking plus a `dyn Any` for
/// recovering the concrete type. Both point at the same allocation.
#[derive(Clone)]
pub struct AnyRef {
    erased: Rc<RefCell<dyn AnyEntity>>,
    any: Rc<dyn Any>,
}

/// Identity key of an entity handle: the address of its allocation.
pub(crate) type EntityKey = ByAddress<Rc<dyn Any>>;

impl AnyRef {
    pub(crate) fn key(&self) -> EntityKey {
        ByAddress(self.any.clone())
    }

    pub(crate) fn class_decl(&self) -> ClassDecl {
        self.erased.borrow().class_decl()
    }

    pub(crate) fn entity_type(&self) -> TypeId {
        self.erased.borrow().entity_type()
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.erased.borrow().node_id()
    }

    pub(crate) fn set_node_id(&self, id: NodeId) {
        self.erased.borrow_mut().set_node_id(id);
    }

    /// Current value of a scalar property.
    pub fn scalar(&self, property: &str) -> Value {
        self.erased.borrow().scalar(property)
    }

    pub(crate) fn relation_targets(&self, property: &str) -> Option<Vec<AnyRef>> {
        self.erased.borrow().relation_targets(property)
    }

    /// Recover a typed handle, if the entity is an `M`.
    pub fn downcast<M: Entity>(&self) -> Option<Ref<M>> {
        self.any
            .clone()
            .downcast::<RefCell<M>>()
            .ok()
            .map(|inner| Ref { inner })
    }

    pub(crate) fn downgrade(&self) -> WeakAnyRef {
        WeakAnyRef {
            erased: Rc::downgrade(&self.erased),
            any: Rc::downgrade(&self.any),
        }
    }
}

impl fmt::Debug for AnyRef {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("AnyRef")
            .field("entity", &self.class_decl().name)
            .field("node_id", &self.node_id())
            .finish()
    }
}

/// Non-owning counterpart of [`AnyRef`], used by the identity map so the
/// manager never extends an entity's lifetime.
pub(crate) struct WeakAnyRef {
    erased: Weak<RefCell<dyn AnyEntity>>,
    any: Weak<dyn Any>,
}

impl WeakAnyRef {
    pub(crate) fn upgrade(&self) -> Option<AnyRef> {
        Some(AnyRef {
            erased: self.erased.upgrade()?,
            any: self.any.upgrade()?,
        })
    }
}
