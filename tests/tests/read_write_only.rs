//! Relation direction restrictions: read-only relations are populated on
//! load but never written, write-only relations are written but never
//! reported back.

use tests::{
    entities::{Cinema, Movie},
    Setup,
};

use pretty_assertions::assert_eq;
use trellis::Ref;

#[test]
fn read_only_relation_is_never_written() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Return of the king");

    let cinema = Ref::new(Cinema::new("Paramount"));
    cinema.borrow().presented_movies.add(&movie).unwrap();

    // Setting the relation from the read-only side must not stick.
    let imposter = Ref::new(Cinema::new("Fake"));
    movie.borrow().cinemas.add(&imposter).unwrap();

    let em = s.manager();
    em.persist(&cinema).unwrap();
    em.flush().unwrap();

    // Only the edge written from the owning side exists, and the entity
    // reached only through the read-only side was never registered.
    assert_eq!(s.store().edge_count(), 1);
    assert!(imposter.node_id().is_none());

    let em = s.manager();
    let found = em.find::<Movie>(movie.node_id().unwrap()).unwrap().unwrap();
    let cinemas = found.borrow().cinemas.all().unwrap();

    assert_eq!(cinemas.len(), 1);
    assert_eq!(cinemas[0].borrow().name, "Paramount");
}

#[test]
fn write_only_relation_reads_back_empty() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Return of the king");

    let cinema = Ref::new(Cinema::new("Paramount"));
    cinema.borrow().rejected_movies.add(&movie).unwrap();

    let em = s.manager();
    em.persist(&cinema).unwrap();
    em.flush().unwrap();

    // The edge is written...
    assert_eq!(s.store().edge_count(), 1);

    // ...but never reported on load.
    let em = s.manager();
    let found = em.find::<Cinema>(cinema.node_id().unwrap()).unwrap().unwrap();
    assert!(found.borrow().rejected_movies.is_empty().unwrap());
}
