//! Crawl results: people, books, and the slug-indexed book registry
//!
//! A [`Catalog`] is owned by the crawl coordinator and is the only place
//! crawl results accumulate. People refer to books by slug, so a book
//! recommended by many people exists exactly once.

mod model;
mod registry;

pub use model::{Book, Person};
pub use registry::BookRegistry;

use std::collections::BTreeMap;

/// Everything a crawl produces
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    people: Vec<Person>,
    books: BookRegistry,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finished person record
    pub fn add_person(&mut self, person: Person) {
        self.people.push(person);
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn books(&self) -> &BookRegistry {
        &self.books
    }

    pub fn books_mut(&mut self) -> &mut BookRegistry {
        &mut self.books
    }

    /// Slugs referenced by some person but missing from the registry
    ///
    /// Always empty for a catalog built by the coordinator; exposed for
    /// consistency checks in tests and reports.
    pub fn dangling_slugs(&self) -> Vec<&str> {
        self.people
            .iter()
            .flat_map(|p| p.book_slugs.iter())
            .filter(|slug| !self.books.contains(slug))
            .map(String::as_str)
            .collect()
    }

    /// Splits the catalog into its serializable parts
    pub fn into_parts(self) -> (Vec<Person>, BTreeMap<String, Book>) {
        (self.people, self.books.into_inner())
    }

    /// Rebuilds a catalog from previously serialized parts
    pub fn from_parts(people: Vec<Person>, books: BTreeMap<String, Book>) -> Self {
        Self {
            people,
            books: BookRegistry::from(books),
        }
    }
}
