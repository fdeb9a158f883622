use crate::extract::{raw_text, select_all, select_first};
use scraper::Html;

/// Section of a book page holding description and genre badges
const DETAILS_SECTION: &str = ".right-side";

/// What a book detail page contributes to its registry entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDetails {
    /// Every paragraph of the details section, concatenated
    pub description: String,
    pub genres: Vec<String>,
}

/// Extracts description and genres from a book detail page
///
/// Returns None if the page has no details section.
pub fn extract_book(document: &Html) -> Option<BookDetails> {
    let section = select_first(document.root_element(), DETAILS_SECTION)?;

    let description = select_all(section, "p").into_iter().map(raw_text).collect();

    let genres = select_all(section, "div.badge-text")
        .into_iter()
        .map(|badge| raw_text(badge).trim().to_string())
        .collect();

    Some(BookDetails {
        description,
        genres,
    })
}
