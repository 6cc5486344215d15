use super::Deferred;
use crate::{
    entity::{AnyRef, Entity},
    Ref,
};

use trellis_core::Result;

use std::cell::RefCell;

/// A many-to-many relation: an ordered collection of entity references.
///
/// Fresh entities start with an empty, materialized collection. Entities
/// hydrated from the store start deferred; the first read fetches the
/// targets through the owning manager and caches them, so a wrapper behaves
/// like the plain collection it stands in for.
pub struct Many<T: Entity> {
    state: RefCell<State<T>>,
}

enum State<T: Entity> {
    /// Targets are materialized in memory.
    Local(Vec<Ref<T>>),

    /// Targets live in the store and have not been read yet.
    Deferred(Deferred),
}

impl<T: Entity> Many<T> {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::Local(Vec::new())),
        }
    }

    pub(crate) fn deferred(deferred: Deferred) -> Self {
        Self {
            state: RefCell::new(State::Deferred(deferred)),
        }
    }

    /// Append a target. A deferred collection is loaded first so insertion
    /// order stays meaningful.
    pub fn add(&self, entity: &Ref<T>) -> Result<()> {
        self.force()?;

        let mut state = self.state.borrow_mut();
        let State::Local(targets) = &mut *state else {
            unreachable!()
        };
        targets.push(entity.clone());
        Ok(())
    }

    /// All targets, in insertion order.
    pub fn all(&self) -> Result<Vec<Ref<T>>> {
        self.force()?;

        match &*self.state.borrow() {
            State::Local(targets) => Ok(targets.clone()),
            State::Deferred(_) => unreachable!(),
        }
    }

    pub fn len(&self) -> Result<usize> {
        self.force()?;

        match &*self.state.borrow() {
            State::Local(targets) => Ok(targets.len()),
            State::Deferred(_) => unreachable!(),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Type-erased targets for the persistence walk; `None` while the
    /// collection is deferred and untouched. [`Entity::relation_targets`]
    /// implementations hand this through.
    ///
    /// [`Entity::relation_targets`]: crate::Entity::relation_targets
    pub fn snapshot(&self) -> Option<Vec<AnyRef>> {
        match &*self.state.borrow() {
            State::Local(targets) => Some(targets.iter().map(Ref::to_any).collect()),
            State::Deferred(_) => None,
        }
    }

    /// Materialize a deferred collection.
    fn force(&self) -> Result<()> {
        let loaded = match &*self.state.borrow() {
            State::Local(_) => return Ok(()),
            State::Deferred(deferred) => deferred.load()?,
        };

        *self.state.borrow_mut() = State::Local(loaded);
        Ok(())
    }
}

impl<T: Entity> Default for Many<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> std::fmt::Debug for Many<T> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.state.borrow() {
            State::Local(targets) => write!(fmt, "Many({} targets)", targets.len()),
            State::Deferred(_) => write!(fmt, "Many(deferred)"),
        }
    }
}
