use super::Deferred;
use crate::{
    entity::{AnyRef, Entity},
    Ref,
};

use trellis_core::Result;

use std::cell::RefCell;

/// A many-to-one relation: a single, possibly absent entity reference.
///
/// Lazy in the same way as [`Many`](crate::Many): hydrated entities defer
/// the fetch until the reference is first read.
pub struct One<T: Entity> {
    state: RefCell<State<T>>,
}

enum State<T: Entity> {
    Local(Option<Ref<T>>),
    Deferred(Deferred),
}

impl<T: Entity> One<T> {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::Local(None)),
        }
    }

    pub(crate) fn deferred(deferred: Deferred) -> Self {
        Self {
            state: RefCell::new(State::Deferred(deferred)),
        }
    }

    /// Point the relation at a target, replacing whatever it held.
    pub fn set(&self, entity: &Ref<T>) {
        *self.state.borrow_mut() = State::Local(Some(entity.clone()));
    }

    /// The current target, fetched on first read when deferred.
    pub fn get(&self) -> Result<Option<Ref<T>>> {
        let loaded = match &*self.state.borrow() {
            State::Local(target) => return Ok(target.clone()),
            State::Deferred(deferred) => deferred.load()?,
        };

        let target = loaded.into_iter().next();
        *self.state.borrow_mut() = State::Local(target.clone());
        Ok(target)
    }

    /// Type-erased target for the persistence walk; `None` while deferred
    /// and untouched. [`Entity::relation_targets`] implementations hand this
    /// through.
    ///
    /// [`Entity::relation_targets`]: crate::Entity::relation_targets
    pub fn snapshot(&self) -> Option<Vec<AnyRef>> {
        match &*self.state.borrow() {
            State::Local(target) => Some(target.iter().map(Ref::to_any).collect()),
            State::Deferred(_) => None,
        }
    }
}

impl<T: Entity> Default for One<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> std::fmt::Debug for One<T> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.state.borrow() {
            State::Local(Some(_)) => write!(fmt, "One(set)"),
            State::Local(None) => write!(fmt, "One(empty)"),
            State::Deferred(_) => write!(fmt, "One(deferred)"),
        }
    }
}
