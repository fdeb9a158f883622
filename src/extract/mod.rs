//! Extraction rules, one per page kind
//!
//! Each rule is a pure function from a parsed document (plus the URL it was
//! fetched from, for link resolution) to a delta. Rules never touch crawl
//! state; the coordinator applies their output.
//!
//! Text is trimmed and otherwise left as the HTML parser produced it.

mod book;
mod listing;
mod person;

pub use book::{extract_book, BookDetails};
pub use listing::{extract_listing, ListingDelta};
pub use person::{extract_person, split_authors, BookCard, PersonDelta, RECOMMENDED_BY_PREFIX};

use scraper::{ElementRef, Selector};

/// Parses a selector, returning None (and logging) if it is invalid
fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::error!("Invalid CSS selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// All descendants of `scope` matching `css`
fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    selector(css)
        .map(|sel| scope.select(&sel).collect())
        .unwrap_or_default()
}

/// First descendant of `scope` matching `css`
fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    // bound so the iterator is dropped before `sel`
    let found = scope.select(&sel).next();
    found
}

/// Full text content of an element, untrimmed
fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trimmed text of the first match, empty if nothing matches
fn child_text(scope: ElementRef<'_>, css: &str) -> String {
    select_first(scope, css)
        .map(|el| raw_text(el).trim().to_string())
        .unwrap_or_default()
}

/// Attribute of the first match, None if it lacks the attribute
fn child_attr(scope: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    select_first(scope, css)
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}
