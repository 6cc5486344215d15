use crate::entity::AnyRef;

/// A lifecycle hook registration.
///
/// Handlers for the same event kind accumulate and run in registration
/// order.
pub enum Event {
    /// Fired once per never-before-seen entity, at its first persist.
    EntityCreate(Box<dyn Fn(&AnyRef)>),

    /// Fired once per distinct new edge, with the edge label, the source
    /// entity and the target entity.
    RelationCreate(Box<dyn Fn(&str, &AnyRef, &AnyRef)>),
}

#[derive(Default)]
pub(crate) struct Events {
    entity_create: Vec<Box<dyn Fn(&AnyRef)>>,
    relation_create: Vec<Box<dyn Fn(&str, &AnyRef, &AnyRef)>>,
}

impl Events {
    pub(crate) fn register(&mut self, event: Event) {
        match event {
            Event::EntityCreate(handler) => self.entity_create.push(handler),
            Event::RelationCreate(handler) => self.relation_create.push(handler),
        }
    }

    pub(crate) fn fire_entity_create(&self, entity: &AnyRef) {
        for handler in &self.entity_create {
            handler(entity);
        }
    }

    pub(crate) fn fire_relation_create(&self, label: &str, from: &AnyRef, to: &AnyRef) {
        for handler in &self.relation_create {
            handler(label, from, to);
        }
    }
}
