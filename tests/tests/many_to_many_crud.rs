//! Relation persistence: edges are written in insertion order, deduplicated
//! across repeated persists, and extended when the application really adds
//! new targets.

use tests::{
    entities::{Movie, Person},
    Setup,
};

use pretty_assertions::assert_eq;
use trellis::{Ref, Value};

fn first_names(movie: &Ref<Movie>) -> Vec<String> {
    movie
        .borrow()
        .actors
        .all()
        .unwrap()
        .iter()
        .map(|actor| actor.borrow().first_name.clone())
        .collect()
}

#[test]
fn store_relations_in_order() {
    let s = Setup::new();

    let aragorn = Ref::new(Person::new("Viggo", "Mortensen"));
    let legolas = Ref::new(Person::new("Orlando", "Bloom"));

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Return of the king");
    movie.borrow().actors.add(&aragorn).unwrap();
    movie.borrow().actors.add(&legolas).unwrap();

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    // Related entities were registered recursively.
    assert!(aragorn.node_id().is_some());
    assert!(legolas.node_id().is_some());

    let em = s.manager();
    let found = em.find::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();

    assert_eq!(first_names(&found), vec!["Viggo", "Orlando"]);
}

#[test]
fn relations_do_not_duplicate() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Return of the king");
    movie
        .borrow()
        .actors
        .add(&Ref::new(Person::new("Viggo", "Mortensen")))
        .unwrap();
    movie
        .borrow()
        .actors
        .add(&Ref::new(Person::new("Orlando", "Bloom")))
        .unwrap();

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    em.persist(&movie).unwrap();
    em.flush().unwrap();

    assert_eq!(s.store().edge_count(), 2);

    let em = s.manager();
    let found = em.find::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();
    assert_eq!(found.borrow().actors.len().unwrap(), 2);
}

#[test]
fn repeated_persist_before_flush_is_idempotent() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie
        .borrow()
        .actors
        .add(&Ref::new(Person::new("Viggo", "Mortensen")))
        .unwrap();

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    assert_eq!(s.store().edge_count(), 1);
}

#[test]
fn explicit_duplicate_edge_is_created() {
    let s = Setup::new();

    let aragorn = Ref::new(Person::new("Viggo", "Mortensen"));
    let legolas = Ref::new(Person::new("Orlando", "Bloom"));

    let movie = Ref::new(Movie::new());
    movie.borrow().actors.add(&aragorn).unwrap();
    movie.borrow().actors.add(&legolas).unwrap();

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    // The application really means a second edge to the same person.
    movie.borrow().actors.add(&aragorn).unwrap();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    assert_eq!(s.store().edge_count(), 3);

    let em = s.manager();
    let found = em.find::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();
    assert_eq!(first_names(&found), vec!["Viggo", "Orlando", "Viggo"]);
}

#[test]
fn new_target_after_flush_adds_one_edge() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie
        .borrow()
        .actors
        .add(&Ref::new(Person::new("Viggo", "Mortensen")))
        .unwrap();

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();
    assert_eq!(s.store().edge_count(), 1);

    movie
        .borrow()
        .actors
        .add(&Ref::new(Person::new("Arnold", "Schwarzenegger")))
        .unwrap();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    assert_eq!(s.store().edge_count(), 2);

    let em = s.manager();
    let found = em.find::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();
    assert_eq!(first_names(&found), vec!["Viggo", "Arnold"]);
}

#[test]
fn many_to_one_relation() {
    let s = Setup::new();

    let legolas = Ref::new(Person::new("Orlando", "Bloom"));

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Return of the king");
    movie.borrow().main_actor.set(&legolas);

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    let em = s.manager();
    let found = em.find::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();
    let main_actor = found.borrow().main_actor.get().unwrap().unwrap();

    assert_eq!(main_actor.borrow().first_name, "Orlando");
    assert_eq!(found.borrow().title, Value::from("Return of the king"));
}
