use super::EntityManager;
use crate::{proxy::ProxyFactory, registry::MetaRegistry};

use trellis_core::{err, Result, Store, Value};

use std::sync::Arc;

/// Configures an [`EntityManager`].
#[derive(Default)]
pub struct Builder {
    store: Option<Arc<dyn Store>>,
    registry: Option<Arc<MetaRegistry>>,
    proxy_factory: Option<ProxyFactory>,
    date_generator: Option<Box<dyn Fn() -> Value>>,
}

impl Builder {
    /// The graph store the manager talks to.
    pub fn store(mut self, store: impl Store) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// A store shared with other managers.
    pub fn shared_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// A metadata cache shared with other managers. A private one is created
    /// when absent.
    pub fn registry(mut self, registry: Arc<MetaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn proxy_factory(mut self, factory: ProxyFactory) -> Self {
        self.proxy_factory = Some(factory);
        self
    }

    /// Source of creation/update stamps. Defaults to the current UTC time in
    /// RFC 3339; override for deterministic tests.
    pub fn date_generator(mut self, generator: impl Fn() -> Value + 'static) -> Self {
        self.date_generator = Some(Box::new(generator));
        self
    }

    pub fn build(self) -> Result<EntityManager> {
        let Some(store) = self.store else {
            return Err(err!("no graph store configured for the entity manager"));
        };

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(MetaRegistry::new()));

        Ok(EntityManager::from_parts(
            store,
            registry,
            self.proxy_factory.unwrap_or_default(),
            self.date_generator,
        ))
    }
}
