use crate::catalog::Book;
use std::collections::BTreeMap;

/// Slug-indexed book registry
///
/// The first insert for a slug fixes its title, authors and cover path;
/// afterwards the entry can only be enriched with description and genres.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookRegistry {
    books: BTreeMap<String, Book>,
}

impl BookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a book unless the slug is already known
    ///
    /// Returns true if the book was inserted, i.e. this is the first time
    /// the slug was seen and its detail page still has to be visited.
    pub fn insert_if_absent(
        &mut self,
        slug: &str,
        title: &str,
        authors: Vec<String>,
        image_path: &str,
    ) -> bool {
        if self.books.contains_key(slug) {
            return false;
        }

        self.books.insert(
            slug.to_string(),
            Book {
                slug: slug.to_string(),
                title: title.to_string(),
                authors,
                image_path: image_path.to_string(),
                ..Book::default()
            },
        );
        true
    }

    /// Writes detail-page data onto an existing entry
    ///
    /// Returns false (and changes nothing) if the slug is unknown.
    pub fn enrich(&mut self, slug: &str, description: String, genres: Vec<String>) -> bool {
        match self.books.get_mut(slug) {
            Some(book) => {
                book.description = description;
                book.genres = genres;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Book> {
        self.books.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.books.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn enriched_count(&self) -> usize {
        self.books.values().filter(|b| b.is_enriched()).count()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Book> {
        &self.books
    }

    pub fn into_inner(self) -> BTreeMap<String, Book> {
        self.books
    }
}

impl From<BTreeMap<String, Book>> for BookRegistry {
    fn from(books: BTreeMap<String, Book>) -> Self {
        Self { books }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_once_per_slug() {
        let mut registry = BookRegistry::new();

        assert!(registry.insert_if_absent("dune", "Dune", vec!["Frank Herbert".into()], "a.jpg"));
        assert!(!registry.insert_if_absent("dune", "Dune (Reissue)", vec![], "b.jpg"));

        assert_eq!(registry.len(), 1);
        let book = registry.get("dune").unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.authors, vec!["Frank Herbert"]);
        assert_eq!(book.image_path, "a.jpg");
    }

    #[test]
    fn test_enrich_keeps_first_seen_fields() {
        let mut registry = BookRegistry::new();
        registry.insert_if_absent("dune", "Dune", vec!["Frank Herbert".into()], "a.jpg");

        assert!(registry.enrich(
            "dune",
            "A desert planet.".to_string(),
            vec!["Science Fiction".to_string()]
        ));

        let book = registry.get("dune").unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.description, "A desert planet.");
        assert_eq!(book.genres, vec!["Science Fiction"]);
        assert_eq!(registry.enriched_count(), 1);
    }

    #[test]
    fn test_enrich_unknown_slug_is_ignored() {
        let mut registry = BookRegistry::new();
        assert!(!registry.enrich("ghost", "text".to_string(), vec![]));
        assert!(registry.is_empty());
    }
}
