//! Units of work and their results
//!
//! A [`Visit`] is queued by the coordinator and executed by a worker task.
//! The worker answers with a [`VisitOutcome`]: a pure description of what the
//! page contained, which only the coordinator applies to the catalog.

use crate::extract::{BookDetails, ListingDelta, PersonDelta};
use crate::output::VisitFailure;
use crate::state::PageKind;
use std::path::PathBuf;
use url::Url;

/// A unit of work for a worker task
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    /// Fetch and extract a page
    Page { kind: PageKind, url: Url },

    /// Download an image to a local path
    Image { source: Url, dest: PathBuf },
}

impl Visit {
    pub fn url(&self) -> &Url {
        match self {
            Self::Page { url, .. } => url,
            Self::Image { source, .. } => source,
        }
    }
}

/// What a finished visit produced
#[derive(Debug, Clone)]
pub enum VisitOutcome {
    /// Listing page parsed; carries the person links found on it
    ListingFetched {
        url: Url,
        delta: ListingDelta,
        from_cache: bool,
    },

    /// Person page parsed; `None` if the page is not a recommendation page
    PersonFetched {
        url: Url,
        delta: Option<PersonDelta>,
        from_cache: bool,
    },

    /// Book page parsed; `None` if the page has no details section
    BookFetched {
        url: Url,
        slug: String,
        details: Option<BookDetails>,
        from_cache: bool,
    },

    /// Image written to disk
    ImageSaved { dest: PathBuf, bytes: u64 },

    /// The visit failed; nothing to apply
    Failed(VisitFailure),
}

impl VisitOutcome {
    /// The page kind this outcome completes, if it is a page
    pub fn page_kind(&self) -> Option<PageKind> {
        match self {
            Self::ListingFetched { .. } => Some(PageKind::Listing),
            Self::PersonFetched { .. } => Some(PageKind::Person),
            Self::BookFetched { .. } => Some(PageKind::Book),
            Self::ImageSaved { .. } | Self::Failed(_) => None,
        }
    }

    pub fn is_from_cache(&self) -> bool {
        match self {
            Self::ListingFetched { from_cache, .. }
            | Self::PersonFetched { from_cache, .. }
            | Self::BookFetched { from_cache, .. } => *from_cache,
            Self::ImageSaved { .. } | Self::Failed(_) => false,
        }
    }
}
