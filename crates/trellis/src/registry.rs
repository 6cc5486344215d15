use crate::entity::Entity;

use trellis_core::{schema::ClassDecl, EntityMeta, Result};

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Process-wide cache of entity metadata.
///
/// Metadata is built at most once per class and then shared for the rest of
/// the process: the build runs under the cache lock, so two callers racing
/// on the first access of a class still observe a single construction.
/// Constructed explicitly (not ambient global state) so tests and multiple
/// managers can hold independent caches.
#[derive(Debug, Default)]
pub struct MetaRegistry {
    cache: Mutex<HashMap<TypeId, Arc<EntityMeta>>>,
}

impl MetaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata for `M`, building and caching it on first access.
    pub fn get<M: Entity>(&self) -> Result<Arc<EntityMeta>> {
        self.resolve(TypeId::of::<M>(), M::decl)
    }

    /// Metadata keyed by a runtime type, for type-erased callers.
    pub(crate) fn resolve(
        &self,
        type_id: TypeId,
        decl: impl FnOnce() -> ClassDecl,
    ) -> Result<Arc<EntityMeta>> {
        let mut cache = self.cache.lock().unwrap();

        if let Some(meta) = cache.get(&type_id) {
            return Ok(meta.clone());
        }

        let meta = Arc::new(EntityMeta::from_decl(&decl())?);
        tracing::debug!(entity = meta.name(), "built entity metadata");

        cache.insert(type_id, meta.clone());
        Ok(meta)
    }
}
