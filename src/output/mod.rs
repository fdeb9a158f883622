//! Output module: JSON documents and the end-of-run report
//!
//! This module handles:
//! - Writing `people.json` / `books.json`
//! - Reading them back
//! - Collecting per-visit failures and counters into a `CrawlReport`

mod json;
mod report;

pub use json::{read_catalog, write_json, JsonOutput};
pub use report::{print_report, CrawlReport, FailureKind, VisitFailure};
