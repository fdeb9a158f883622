use crate::extract::{child_attr, child_text, raw_text, select_all};
use crate::url::{last_path_segment, resolve_link};
use scraper::Html;
use url::Url;

/// Heading prefix that marks a recommendation page
pub const RECOMMENDED_BY_PREFIX: &str = "books recommended by ";

const INDUSTRY_BADGE: &str = ".badge.badge-large.w-inline-block";
const INDUSTRY_PATH: &str = "/industries/";

/// A book as it appears on a person page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    /// Last path segment of the card's detail link
    pub slug: String,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_url: Option<Url>,
    pub detail_url: Url,
}

/// What a person page contributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDelta {
    pub name: String,
    /// `(slug, label)` pairs in document order
    pub industries: Vec<(String, String)>,
    pub portrait_url: Option<Url>,
    pub books: Vec<BookCard>,
}

/// Extracts a person and their book cards from a recommendation page
///
/// Returns None when the `h1.h1` heading does not start with
/// `"books recommended by "`; such pages are skipped silently.
pub fn extract_person(document: &Html, page_url: &Url) -> Option<PersonDelta> {
    let root = document.root_element();

    let heading = child_text(root, "h1.h1");
    let name = heading.strip_prefix(RECOMMENDED_BY_PREFIX)?.trim().to_string();

    let industries = select_all(root, INDUSTRY_BADGE)
        .into_iter()
        .filter_map(|badge| {
            let slug = badge.value().attr("href")?.strip_prefix(INDUSTRY_PATH)?;
            Some((slug.to_string(), raw_text(badge).trim().to_string()))
        })
        .collect();

    let portrait_url = child_attr(root, "img.people-photo", "src")
        .and_then(|src| resolve_link(&src, page_url));

    let books = select_all(root, ".book-wrap")
        .into_iter()
        .filter_map(|card| {
            let href = child_attr(card, "a", "href")?;
            let detail_url = resolve_link(&href, page_url)?;
            let slug = match last_path_segment(&detail_url) {
                Ok(slug) => slug,
                Err(e) => {
                    tracing::debug!("Skipping book card on {}: {}", page_url, e);
                    return None;
                }
            };

            Some(BookCard {
                slug,
                title: child_text(card, "h5"),
                authors: split_authors(&child_text(card, "h6")),
                cover_url: child_attr(card, "img.book-cover", "src")
                    .and_then(|src| resolve_link(&src, page_url)),
                detail_url,
            })
        })
        .collect();

    Some(PersonDelta {
        name,
        industries,
        portrait_url,
        books,
    })
}

/// Splits an "A & B" author line into its authors
///
/// ```
/// use goodbooks_crawler::extract::split_authors;
///
/// assert_eq!(split_authors("Jane Doe & John Smith"), vec!["Jane Doe", "John Smith"]);
/// assert!(split_authors("  ").is_empty());
/// ```
pub fn split_authors(line: &str) -> Vec<String> {
    line.split(" & ")
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://www.goodbooks.io/people/jane-doe").unwrap()
    }

    const PERSON_PAGE: &str = r#"
        <html><body>
            <h1 class="h1"> books recommended by Jane Doe </h1>
            <img class="people-photo" src="https://cdn.example.com/p/abc/jane.jpg">
            <a class="badge badge-large w-inline-block" href="/industries/tech">Engineer</a>
            <a class="badge badge-large w-inline-block" href="/industries/finance"> Banker </a>
            <a class="badge badge-large w-inline-block" href="/topics/space">Space</a>
            <div class="book-wrap">
                <a href="/books/dune"><h5>Dune</h5></a>
                <h6>Frank Herbert</h6>
                <img class="book-cover" src="/covers/dune.jpg">
            </div>
            <div class="book-wrap">
                <a href="/books/good-omens/"><h5>Good Omens</h5></a>
                <h6>Terry Pratchett &amp; Neil Gaiman</h6>
            </div>
            <div class="book-wrap">
                <h5>No link</h5>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_name() {
        let delta = extract_person(&Html::parse_document(PERSON_PAGE), &page_url()).unwrap();
        assert_eq!(delta.name, "Jane Doe");
    }

    #[test]
    fn test_industries_aligned_with_labels() {
        let delta = extract_person(&Html::parse_document(PERSON_PAGE), &page_url()).unwrap();
        assert_eq!(
            delta.industries,
            vec![
                ("tech".to_string(), "Engineer".to_string()),
                ("finance".to_string(), "Banker".to_string()),
            ]
        );
    }

    #[test]
    fn test_portrait_url() {
        let delta = extract_person(&Html::parse_document(PERSON_PAGE), &page_url()).unwrap();
        assert_eq!(
            delta.portrait_url.unwrap().as_str(),
            "https://cdn.example.com/p/abc/jane.jpg"
        );
    }

    #[test]
    fn test_book_cards() {
        let delta = extract_person(&Html::parse_document(PERSON_PAGE), &page_url()).unwrap();
        assert_eq!(delta.books.len(), 2);

        let dune = &delta.books[0];
        assert_eq!(dune.slug, "dune");
        assert_eq!(dune.title, "Dune");
        assert_eq!(dune.authors, vec!["Frank Herbert"]);
        assert_eq!(
            dune.cover_url.as_ref().unwrap().as_str(),
            "https://www.goodbooks.io/covers/dune.jpg"
        );
        assert_eq!(dune.detail_url.as_str(), "https://www.goodbooks.io/books/dune");

        let omens = &delta.books[1];
        assert_eq!(omens.slug, "good-omens");
        assert_eq!(omens.authors, vec!["Terry Pratchett", "Neil Gaiman"]);
        assert!(omens.cover_url.is_none());
    }

    #[test]
    fn test_heading_without_prefix_is_skipped() {
        let html = r#"<h1 class="h1">Best books of 2020</h1><div class="book-wrap"><a href="/books/x"></a></div>"#;
        assert!(extract_person(&Html::parse_document(html), &page_url()).is_none());
    }

    #[test]
    fn test_missing_heading_is_skipped() {
        let html = r#"<html><body><p>Oops</p></body></html>"#;
        assert!(extract_person(&Html::parse_document(html), &page_url()).is_none());
    }

    #[test]
    fn test_split_authors() {
        assert_eq!(
            split_authors("Jane Doe & John Smith"),
            vec!["Jane Doe", "John Smith"]
        );
        assert_eq!(split_authors("Plato"), vec!["Plato"]);
        assert!(split_authors("").is_empty());
    }
}
