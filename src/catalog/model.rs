use serde::{Deserialize, Serialize};

/// A person whose recommendation page was crawled
///
/// `industries` and `occupations` are index-aligned: `occupations[i]` is the
/// display label of the industry whose slug is `industries[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    pub industries: Vec<String>,
    pub occupations: Vec<String>,
    pub book_slugs: Vec<String>,
    /// Local portrait path, empty if the page had no portrait
    pub image_path: String,
}

impl Person {
    /// Builds a person from `(slug, label)` industry pairs, keeping the two
    /// output sequences aligned
    pub fn new(
        name: impl Into<String>,
        industries: Vec<(String, String)>,
        book_slugs: Vec<String>,
        image_path: impl Into<String>,
    ) -> Self {
        let (industries, occupations) = industries.into_iter().unzip();
        Self {
            name: name.into(),
            industries,
            occupations,
            book_slugs,
            image_path: image_path.into(),
        }
    }
}

/// A recommended book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub slug: String,
    pub title: String,
    pub authors: Vec<String>,
    /// Filled in by the book detail visit
    pub genres: Vec<String>,
    /// Filled in by the book detail visit
    pub description: String,
    pub image_path: String,
}

impl Book {
    /// True once the detail page contributed a description or genres
    pub fn is_enriched(&self) -> bool {
        !self.description.is_empty() || !self.genres.is_empty()
    }
}
