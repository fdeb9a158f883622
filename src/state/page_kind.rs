//! The three page types the crawl moves through
//!
//! Listing pages lead to person pages, person pages lead to book pages.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageKind {
    /// The people listing the crawl is seeded with
    Listing,

    /// A "books recommended by ..." page for one person
    Person,

    /// The detail page of one book
    Book,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Person => "person",
            Self::Book => "book",
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Listing, Self::Person, Self::Book]
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
