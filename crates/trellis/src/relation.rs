mod many;
pub use many::Many;

mod one;
pub use one::One;

use crate::{entity::Entity, manager::ManagerInner, Ref};

use trellis_core::{driver::NodeId, err, schema::Direction, Result};

use std::rc::Weak;

/// State of a relation that has not been read yet.
///
/// Hydrated entities get their relation wrappers in this state: nothing is
/// fetched until the first access. The manager reference is weak; a wrapper
/// never keeps the manager alive.
pub(crate) struct Deferred {
    manager: Weak<ManagerInner>,
    from: NodeId,
    label: String,
    direction: Direction,
}

impl Deferred {
    pub(crate) fn new(
        manager: Weak<ManagerInner>,
        from: NodeId,
        label: String,
        direction: Direction,
    ) -> Self {
        Self {
            manager,
            from,
            label,
            direction,
        }
    }

    /// Fetch and hydrate the current relation targets.
    fn load<T: Entity>(&self) -> Result<Vec<Ref<T>>> {
        let Some(manager) = self.manager.upgrade() else {
            return Err(err!(
                "cannot load relation `{}`: the owning entity manager was dropped",
                self.label
            ));
        };

        manager.load_related(self.from, &self.label, self.direction)
    }
}
