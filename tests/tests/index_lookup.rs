//! Index-backed finders: dynamic accessor resolution against the entity's
//! declared shape, failing closed on anything unmapped or unindexed.

use tests::{entities::Movie, Setup};

use pretty_assertions::assert_eq;
use trellis::{Ref, Value};

#[test]
fn lookup_by_indexed_property() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Return of the king");

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    let code = movie.borrow().registry_code().to_string();

    // Within the flushing manager, the lookup resolves to the very same
    // handle.
    let repository = em.repository::<Movie>().unwrap();
    let found = repository
        .find_one_by("registry_code", code.as_str())
        .unwrap()
        .unwrap();
    assert!(found.ptr_eq(&movie));

    // A reconnecting manager sees the same values.
    let em = s.manager();
    let repository = em.repository::<Movie>().unwrap();

    let found = repository
        .find_one_by("registry_code", code.as_str())
        .unwrap()
        .unwrap();
    assert_eq!(found.borrow().title, Value::from("Return of the king"));

    let all = repository.find_by("registry_code", code.as_str()).unwrap();
    assert_eq!(all.len(), 1);

    // Dynamic accessor forms resolve to the same property.
    let found = repository
        .find_one_by("find_by_registry_code", code.as_str())
        .unwrap();
    assert!(found.is_some());

    // No hit is a result, not an error.
    assert!(repository
        .find_one_by("registry_code", "no-such-code")
        .unwrap()
        .is_none());
}

#[test]
fn custom_repository_variant() {
    let s = Setup::new();

    let movie = Ref::new(Movie::new());
    movie.borrow_mut().set_title("Heat");

    let em = s.manager();
    em.persist(&movie).unwrap();
    em.flush().unwrap();

    let code = movie.borrow().registry_code().to_string();

    let em = s.manager();
    let repository = em.repository::<Movie>().unwrap();

    let found = repository.find_one_by_registry_code(&code).unwrap().unwrap();
    assert_eq!(found.borrow().title, Value::from("Heat"));
}

#[test]
fn missing_property_fails() {
    let s = Setup::new();
    let em = s.manager();
    let repository = em.repository::<Movie>().unwrap();

    let err = repository
        .find_by("movie_registration_code", "whatever")
        .unwrap_err();

    assert!(err.is_mapping());
    assert_eq!(
        err.to_string(),
        "entity `Movie` has no property matching `movie_registration_code`"
    );
}

#[test]
fn unindexed_property_fails() {
    let s = Setup::new();
    let em = s.manager();
    let repository = em.repository::<Movie>().unwrap();

    let err = repository.find_by("title", "Return of the king").unwrap_err();

    assert!(err.is_mapping());
    assert_eq!(
        err.to_string(),
        "property `title` of entity `Movie` is not indexed"
    );
}

#[test]
fn relation_property_is_not_a_finder_target() {
    let s = Setup::new();
    let em = s.manager();
    let repository = em.repository::<Movie>().unwrap();

    // Resolves to the relation, which is not an indexed scalar.
    let err = repository.find_by("actors", "Viggo").unwrap_err();
    assert!(err.is_mapping());
}
