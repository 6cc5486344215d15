//! Scalar persistence: values written through a flush come back exactly,
//! including opaque array and structured properties.

use tests::{
    entities::{Movie, Person},
    Setup,
};

use pretty_assertions::assert_eq;
use trellis::{NodeId, Ref, Value};

#[test]
fn store_simple_entity() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Return of the king");

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();
    let id = movie.node_id().unwrap();

    let em = s.manager();
    let found = em.find::<Movie>(id).unwrap().unwrap();

    assert_eq!(found.borrow().title, Value::from("Return of the king"));
}

#[test]
fn store_array() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title(["A", "B"].into_iter().collect::<Value>());

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    let em = s.manager();
    let found = em.find_any::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();

    assert_eq!(
        found.borrow().title,
        Value::List(vec![Value::from("A"), Value::from("B")])
    );
}

#[test]
fn store_structure() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().blob = serde_json::json!({"A": "B"}).into();

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    let em = s.manager();
    let found = em.find_any::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();

    let blob = found.borrow().blob.clone();
    assert_eq!(blob.as_map().unwrap()["A"], Value::from("B"));
}

#[test]
fn store_date() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().release_date = Value::from("2026-04-07T00:00:00Z");

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    let em = s.manager();
    let found = em.find::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();

    assert_eq!(
        found.borrow().release_date,
        Value::from("2026-04-07T00:00:00Z")
    );
}

#[test]
fn update_after_find() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();
    let id = movie.node_id().unwrap();

    let em = s.manager();
    let found = em.find_any::<Movie>(id).unwrap().unwrap();
    found.borrow_mut().set_title("World");
    em.persist(&found).unwrap();
    em.flush().unwrap();

    let em = s.manager();
    let reloaded = em.find_any::<Movie>(id).unwrap().unwrap();

    assert_eq!(reloaded.borrow().title, Value::from("World"));
    // Updated in place, not duplicated.
    assert_eq!(s.store().node_count(), 1);
}

#[test]
fn find_missing_returns_none() {
    let s = Setup::new();
    let em = s.manager();

    assert!(em.find::<Movie>(NodeId(999)).unwrap().is_none());
}

#[test]
fn find_is_scoped_by_class() {
    let s = Setup::new();

    let person = Ref::new(Person::new("Orlando", "Bloom"));

    let em = s.manager();
    em.persist(&person).unwrap();
    em.flush().unwrap();
    let id = person.node_id().unwrap();

    let em = s.manager();
    assert!(em.find::<Movie>(id).unwrap().is_none());
    assert!(em.find_any::<Person>(id).unwrap().is_some());
}
