//! Crawl state machine
//!
//! - `PageKind`: the listing -> person -> book progression
//! - `Visit`: a queued unit of work (page fetch or image download)
//! - `VisitOutcome`: the delta a finished visit hands back to the coordinator

mod page_kind;
mod visit;

pub use page_kind::PageKind;
pub use visit::{Visit, VisitOutcome};
