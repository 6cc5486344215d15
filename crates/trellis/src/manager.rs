mod builder;
pub use builder::Builder;

mod uow;
use uow::{Pending, PendingOp, RelationSnapshot, UnitOfWork};

use crate::{
    entity::{AnyRef, Entity, EntityKey, WeakAnyRef},
    event::{Event, Events},
    proxy::ProxyFactory,
    query::ParamQuery,
    registry::MetaRegistry,
    repository::EntityRepository,
    Ref,
};

use trellis_core::{
    driver::{
        operation::{CreateEdge, CreateNode, GetNode, GetRelated, IndexEntry, UpdateNode},
        NodeId, NodeRecord, Store,
    },
    err,
    schema::Direction,
    Result, Value,
};

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
    rc::{Rc, Weak},
    sync::Arc,
};

/// Node and edge property carrying the creation stamp.
const CREATED_AT: &str = "created_at";

/// Node property carrying the latest update stamp.
const UPDATED_AT: &str = "updated_at";

/// The orchestration hub of the mapper.
///
/// Owns a unit of work of pending entities, drives graph synchronization
/// from the metadata shapes, and hydrates query results back into live
/// object graphs. One manager expects one logical thread of control;
/// handles are cheap to clone and share a single state.
pub struct EntityManager {
    inner: Rc<ManagerInner>,
}

pub(crate) struct ManagerInner {
    /// Handed to hydrated relation wrappers so lazy loads can find their way
    /// back without extending the manager's lifetime.
    weak_self: Weak<ManagerInner>,

    store: Arc<dyn Store>,
    registry: Arc<MetaRegistry>,

    proxy_factory: RefCell<ProxyFactory>,
    date_generator: RefCell<Box<dyn Fn() -> Value>>,
    events: RefCell<Events>,

    uow: RefCell<UnitOfWork>,

    /// Identity map: node id to the handle already hydrated for it.
    loaded: RefCell<HashMap<NodeId, WeakAnyRef>>,

    /// Entities this manager has ever queued as creates; keeps the
    /// entity-create hook a once-per-entity event across flushes.
    seen: RefCell<HashSet<EntityKey>>,
}

impl EntityManager {
    pub fn new(store: Arc<dyn Store>, registry: Arc<MetaRegistry>) -> Self {
        Self::from_parts(store, registry, ProxyFactory::default(), None)
    }

    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn from_parts(
        store: Arc<dyn Store>,
        registry: Arc<MetaRegistry>,
        proxy_factory: ProxyFactory,
        date_generator: Option<Box<dyn Fn() -> Value>>,
    ) -> Self {
        let date_generator = date_generator
            .unwrap_or_else(|| Box::new(|| Value::String(chrono::Utc::now().to_rfc3339())));

        let inner = Rc::new_cyclic(|weak| ManagerInner {
            weak_self: weak.clone(),
            store,
            registry,
            proxy_factory: RefCell::new(proxy_factory),
            date_generator: RefCell::new(date_generator),
            events: RefCell::new(Events::default()),
            uow: RefCell::new(UnitOfWork::default()),
            loaded: RefCell::new(HashMap::new()),
            seen: RefCell::new(HashSet::new()),
        });

        Self { inner }
    }

    /// Queue an entity for synchronization, recursively registering any
    /// newly-seen related entities.
    ///
    /// Fails when the type is not declared as an entity or declares no
    /// usable identity property. Persisting the same entity again before a
    /// flush refreshes its snapshot instead of queueing twice.
    pub fn persist<M: Entity>(&self, entity: &Ref<M>) -> Result<()> {
        let mut visited = HashSet::new();
        self.inner.persist_any(entity.to_any(), &mut visited)
    }

    /// Execute everything queued since the last flush. Safe to call with an
    /// empty queue.
    pub fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    /// Fetch an entity of class `M` by store identifier.
    pub fn find<M: Entity>(&self, id: NodeId) -> Result<Option<Ref<M>>> {
        let meta = self.inner.registry.get::<M>()?;

        let Some(node) = self.inner.fetch_node(id)? else {
            return Ok(None);
        };
        if node.label != meta.name() {
            return Ok(None);
        }

        self.inner.hydrate(&node).map(Some)
    }

    /// Fetch by raw store identifier without scoping to the entity class.
    pub fn find_any<M: Entity>(&self, id: NodeId) -> Result<Option<Ref<M>>> {
        self.inner.registry.get::<M>()?;

        match self.inner.fetch_node(id)? {
            Some(node) => self.inner.hydrate(&node).map(Some),
            None => Ok(None),
        }
    }

    /// The repository declared for `M`, bound to this manager and the
    /// class's cached metadata.
    pub fn repository<M: Entity>(&self) -> Result<M::Repository> {
        let meta = self.inner.registry.get::<M>()?;
        Ok(M::Repository::build(self.clone(), meta))
    }

    /// Start a parameterized query in the driver's dialect.
    pub fn create_query(&self, text: impl Into<String>) -> ParamQuery {
        ParamQuery::new(self.clone(), text.into())
    }

    /// Append a lifecycle hook; handlers run in registration order.
    pub fn register_event(&self, event: Event) {
        self.inner.events.borrow_mut().register(event);
    }

    /// Replace the source of creation/update stamps.
    pub fn set_date_generator(&self, generator: impl Fn() -> Value + 'static) {
        *self.inner.date_generator.borrow_mut() = Box::new(generator);
    }

    pub fn set_proxy_factory(&self, factory: ProxyFactory) {
        *self.inner.proxy_factory.borrow_mut() = factory;
    }

    pub fn registry(&self) -> &Arc<MetaRegistry> {
        &self.inner.registry
    }

    pub(crate) fn inner(&self) -> &Rc<ManagerInner> {
        &self.inner
    }
}

impl Clone for EntityManager {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for EntityManager {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("EntityManager")
            .field("store", &self.inner.store)
            .finish()
    }
}

impl ManagerInner {
    pub(crate) fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub(crate) fn registry(&self) -> &Arc<MetaRegistry> {
        &self.registry
    }

    pub(crate) fn weak_self(&self) -> Weak<ManagerInner> {
        self.weak_self.clone()
    }

    fn stamp(&self) -> Value {
        (self.date_generator.borrow())()
    }

    fn persist_any(&self, entity: AnyRef, visited: &mut HashSet<EntityKey>) -> Result<()> {
        let key = entity.key();
        if !visited.insert(key.clone()) {
            return Ok(());
        }

        let meta = self
            .registry
            .resolve(entity.entity_type(), || entity.class_decl())?;

        tracing::debug!(entity = meta.name(), "persist");

        let stamp = self.stamp();

        let mut scalars = BTreeMap::new();
        for property in meta.properties() {
            scalars.insert(property.name.clone(), entity.scalar(&property.name));
        }

        // Read-only relations never take part in the write path. Deferred
        // relations that were never touched are skipped as well; they cannot
        // have changed.
        let mut relations = Vec::new();
        for property in meta.relations() {
            let relation = property.expect_relation();
            if relation.read_only {
                continue;
            }
            if let Some(targets) = entity.relation_targets(&property.name) {
                relations.push(RelationSnapshot {
                    property: property.clone(),
                    targets,
                });
            }
        }

        let cascade: Vec<AnyRef> = relations
            .iter()
            .flat_map(|snapshot| snapshot.targets.iter().cloned())
            .collect();

        let mut fire_create = false;
        {
            let mut uow = self.uow.borrow_mut();
            match uow.get_mut(&key) {
                Some(pending) => {
                    pending.scalars = scalars;
                    pending.updated_at = stamp;
                    pending.relations = relations;
                }
                None => {
                    let op = match entity.node_id() {
                        Some(_) => PendingOp::Update,
                        None => PendingOp::Create,
                    };

                    fire_create =
                        op == PendingOp::Create && self.seen.borrow_mut().insert(key.clone());

                    let created_at = (op == PendingOp::Create).then(|| stamp.clone());

                    uow.insert(
                        key,
                        Pending {
                            entity: entity.clone(),
                            meta,
                            op,
                            scalars,
                            created_at,
                            updated_at: stamp,
                            relations,
                        },
                    );
                }
            }
        }

        if fire_create {
            self.events.borrow().fire_entity_create(&entity);
        }

        for target in cascade {
            self.persist_any(target, visited)?;
        }

        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let drained = self.uow.borrow_mut().drain();
        if drained.is_empty() {
            return Ok(());
        }

        tracing::debug!(entities = drained.len(), "flush");

        // Nodes first, so every entity holds a store identifier before any
        // edge is considered.
        for pending in &drained {
            match pending.op {
                PendingOp::Create => {
                    let mut properties = pending.scalars.clone();
                    if let Some(created_at) = &pending.created_at {
                        properties.insert(CREATED_AT.to_string(), created_at.clone());
                    }
                    properties.insert(UPDATED_AT.to_string(), pending.updated_at.clone());

                    let response = self.store.exec(
                        CreateNode {
                            label: pending.meta.name().to_string(),
                            properties,
                        }
                        .into(),
                    )?;

                    let id = response.rows.into_node_id();
                    pending.entity.set_node_id(id);
                    self.enroll(id, &pending.entity);
                }
                PendingOp::Update => {
                    // Merge semantics: the creation stamp is not rewritten.
                    let mut properties = pending.scalars.clone();
                    properties.insert(UPDATED_AT.to_string(), pending.updated_at.clone());

                    self.store.exec(
                        UpdateNode {
                            node: pending.node_id()?,
                            properties,
                        }
                        .into(),
                    )?;
                }
            }

            let node = pending.node_id()?;
            for property in pending.meta.indexed_properties() {
                let value = pending
                    .scalars
                    .get(&property.name)
                    .cloned()
                    .unwrap_or_default();

                self.store.exec(
                    IndexEntry {
                        index: pending.meta.name().to_string(),
                        key: property.name.clone(),
                        value,
                        node,
                    }
                    .into(),
                )?;
            }
        }

        // Then reconcile edges against what the store already holds, so
        // re-flushing an unchanged graph creates nothing and an explicitly
        // added duplicate creates exactly one more edge.
        for pending in &drained {
            let from = pending.node_id()?;

            for snapshot in &pending.relations {
                let relation = snapshot.property.expect_relation();

                let existing = match pending.op {
                    PendingOp::Update => {
                        self.edge_counts(from, &relation.label, relation.direction)?
                    }
                    PendingOp::Create => HashMap::new(),
                };

                let mut queued: HashMap<NodeId, usize> = HashMap::new();
                for target in &snapshot.targets {
                    let to = target.node_id().ok_or_else(|| {
                        err!(
                            "relation `{}` of entity `{}` points at an entity that was never persisted",
                            snapshot.property.name,
                            pending.meta.name()
                        )
                    })?;

                    let seen_so_far = queued.entry(to).or_insert(0);
                    *seen_so_far += 1;

                    if *seen_so_far > existing.get(&to).copied().unwrap_or(0) {
                        let (edge_from, edge_to) = match relation.direction {
                            Direction::Out => (from, to),
                            Direction::In => (to, from),
                        };

                        let mut properties = BTreeMap::new();
                        properties.insert(CREATED_AT.to_string(), self.stamp());

                        self.store.exec(
                            CreateEdge {
                                label: relation.label.clone(),
                                from: edge_from,
                                to: edge_to,
                                properties,
                            }
                            .into(),
                        )?;

                        self.events.borrow().fire_relation_create(
                            &relation.label,
                            &pending.entity,
                            target,
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Edges already present for `node` under `label`, counted per target.
    fn edge_counts(
        &self,
        node: NodeId,
        label: &str,
        direction: Direction,
    ) -> Result<HashMap<NodeId, usize>> {
        let response = self.store.exec(
            GetRelated {
                node,
                label: label.to_string(),
                direction,
            }
            .into(),
        )?;

        let mut counts = HashMap::new();
        for record in response.rows.into_nodes() {
            *counts.entry(record.id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn fetch_node(&self, id: NodeId) -> Result<Option<NodeRecord>> {
        tracing::trace!(node = %id, "get node");
        let response = self.store.exec(GetNode { node: id }.into())?;
        Ok(response.rows.into_nodes().into_iter().next())
    }

    /// Hydrate a node record, preserving identity: a node already loaded by
    /// this manager comes back as the same handle.
    pub(crate) fn hydrate<M: Entity>(&self, node: &NodeRecord) -> Result<Ref<M>> {
        let reuse = self.proxy_factory.borrow().reuse_loaded();

        if reuse {
            let existing = self
                .loaded
                .borrow()
                .get(&node.id)
                .and_then(WeakAnyRef::upgrade);

            if let Some(existing) = existing {
                if let Some(handle) = existing.downcast::<M>() {
                    return Ok(handle);
                }
            }
        }

        let handle = self.proxy_factory.borrow().hydrate::<M>(node, self)?;

        if reuse {
            self.loaded
                .borrow_mut()
                .insert(node.id, handle.to_any().downgrade());
        }

        Ok(handle)
    }

    /// Targets of a relation, fetched from the store in insertion order.
    pub(crate) fn load_related<T: Entity>(
        &self,
        from: NodeId,
        label: &str,
        direction: Direction,
    ) -> Result<Vec<Ref<T>>> {
        tracing::trace!(from = %from, label, "load related");

        let response = self.store.exec(
            GetRelated {
                node: from,
                label: label.to_string(),
                direction,
            }
            .into(),
        )?;

        response
            .rows
            .into_nodes()
            .iter()
            .map(|node| self.hydrate(node))
            .collect()
    }

    fn enroll(&self, id: NodeId, entity: &AnyRef) {
        if self.proxy_factory.borrow().reuse_loaded() {
            self.loaded.borrow_mut().insert(id, entity.downgrade());
        }
    }
}
