
use trellis::{EntityManager, MetaRegistry};
use trellis_driver_memory::Memory;

use std::sync::Arc;

/// One store and one metadata cache shared by every manager a test creates,
/// mirroring a process talking to a single graph database.
pub struct Setup {
    store: Arc<Memory>,
    registry: Arc<MetaRegistry>,
}

impl Setup {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Memory::new()),
            registry: Arc::new(MetaRegistry::new()),
        }
    }

    pub fn store(&self) -> &Arc<Memory> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<MetaRegistry> {
        &self.registry
    }

    /// A fresh manager over the shared store, as if reconnecting.
    pub fn manager(&self) -> EntityManager {
        EntityManager::builder()
            .shared_store(self.store.clone())
            .registry(self.registry.clone())
            .build()
            .unwrap()
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::new()
    }
}
