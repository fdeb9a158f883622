use crate::extract::select_all;
use crate::url::resolve_link;
use scraper::Html;
use url::Url;

/// Marker classes of a person card in the listing sidebar
const PERSON_CARD: &str = "a.people-wrap.people-wrap-sidebar.w-inline-block[href]";

/// What a listing page contributes: links to person pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDelta {
    /// Absolute person page URLs, in document order
    pub person_links: Vec<Url>,
}

/// Extracts person page links from the people listing
///
/// Only anchors carrying the person card marker are followed; every other
/// link on the page is ignored.
pub fn extract_listing(document: &Html, page_url: &Url) -> ListingDelta {
    let person_links = select_all(document.root_element(), PERSON_CARD)
        .into_iter()
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .collect();

    ListingDelta { person_links }
}
