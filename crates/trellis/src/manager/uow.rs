use crate::entity::{AnyRef, EntityKey};

use trellis_core::{driver::NodeId, err, EntityMeta, PropertyMeta, Result, Value};

use indexmap::IndexMap;
use std::{collections::BTreeMap, sync::Arc};

/// Pending create/update operations, keyed by entity identity and drained in
/// registration order by a flush.
///
/// Re-registering an entity replaces its snapshot rather than queueing a
/// second operation, which is what makes repeated persists idempotent.
#[derive(Default)]
pub(crate) struct UnitOfWork {
    pending: IndexMap<EntityKey, Pending>,
}

impl UnitOfWork {
    pub(crate) fn get_mut(&mut self, key: &EntityKey) -> Option<&mut Pending> {
        self.pending.get_mut(key)
    }

    pub(crate) fn insert(&mut self, key: EntityKey, pending: Pending) {
        self.pending.insert(key, pending);
    }

    /// Take everything, leaving the unit of work empty.
    pub(crate) fn drain(&mut self) -> Vec<Pending> {
        self.pending.drain(..).map(|(_, pending)| pending).collect()
    }
}

pub(crate) struct Pending {
    pub(crate) entity: AnyRef,
    pub(crate) meta: Arc<EntityMeta>,
    pub(crate) op: PendingOp,

    /// Scalar values captured at persist time.
    pub(crate) scalars: BTreeMap<String, Value>,

    /// Creation stamp; set only for entities queued as creates.
    pub(crate) created_at: Option<Value>,

    /// Refreshed on every persist of the entity.
    pub(crate) updated_at: Value,

    /// Writable relations captured at persist time. Relations that were
    /// still lazily deferred are absent; they cannot have changed.
    pub(crate) relations: Vec<RelationSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingOp {
    Create,
    Update,
}

pub(crate) struct RelationSnapshot {
    pub(crate) property: PropertyMeta,
    pub(crate) targets: Vec<AnyRef>,
}

impl Pending {
    /// The entity's store identifier; always present once the node phase of
    /// a flush has run.
    pub(crate) fn node_id(&self) -> Result<NodeId> {
        self.entity.node_id().ok_or_else(|| {
            err!(
                "entity `{}` has no store identifier after the node phase",
                self.meta.name()
            )
        })
    }
}
