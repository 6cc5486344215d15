//! Misuse surfaces synchronously as the descriptive mapping error.

use tests::{
    entities::{Draft, Plain},
    Setup,
};

use pretty_assertions::assert_eq;
use trellis::Ref;

#[test]
fn persist_non_entity() {
    let s = Setup::new();
    let em = s.manager();

    let err = em.persist(&Ref::new(Plain::default())).unwrap_err();

    assert!(err.is_mapping());
    assert_eq!(err.to_string(), "class `Plain` is not declared as an entity");
}

#[test]
fn persist_entity_without_identity() {
    let s = Setup::new();
    let em = s.manager();

    let err = em.persist(&Ref::new(Draft::default())).unwrap_err();

    assert!(err.is_mapping());
    assert_eq!(
        err.to_string(),
        "entity `Draft` declares no auto identity property"
    );
}

#[test]
fn repository_for_non_entity() {
    let s = Setup::new();
    let em = s.manager();

    assert!(em.repository::<Plain>().unwrap_err().is_mapping());
}

#[test]
fn failed_persist_queues_nothing() {
    let s = Setup::new();
    let em = s.manager();

    let _ = em.persist(&Ref::new(Plain::default()));
    em.flush().unwrap();

    assert_eq!(s.store().node_count(), 0);
}
