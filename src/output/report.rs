//! End-of-run report
//!
//! Every visit either contributes to the catalog or ends up here as a
//! [`VisitFailure`]; nothing is dropped silently.

use crate::catalog::Catalog;
use crate::state::PageKind;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Why a visit did not contribute to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection, timeout, or body read error
    Network,

    /// Non-success HTTP status
    HttpStatus(u16),

    /// Link points outside the allowed domains
    DomainNotAllowed,

    /// Link could not be turned into a usable URL
    InvalidUrl,

    /// Image download or write failed
    Image,

    /// A different image already claimed the same local path
    ImageCollision,

    /// Worker task panicked or was aborted
    Task,
}

impl FailureKind {
    /// Grouping key used in the report summary
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::HttpStatus(_) => "http_status",
            Self::DomainNotAllowed => "domain_not_allowed",
            Self::InvalidUrl => "invalid_url",
            Self::Image => "image",
            Self::ImageCollision => "image_collision",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            other => f.write_str(other.label()),
        }
    }
}

/// A single visit that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitFailure {
    /// The URL that failed
    pub url: String,

    /// Page kind, `None` for image downloads
    pub page_kind: Option<PageKind>,

    pub kind: FailureKind,

    /// Error message
    pub message: String,
}

impl VisitFailure {
    pub fn new(
        url: impl Into<String>,
        page_kind: Option<PageKind>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            page_kind,
            kind,
            message: message.into(),
        }
    }
}

/// Counters and failures for one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Pages successfully fetched and parsed, per kind
    pub pages_fetched: BTreeMap<PageKind, u64>,

    /// Of those, how many came from the response cache
    pub pages_from_cache: u64,

    /// Person pages whose heading was not a recommendation heading
    pub pages_skipped: u64,

    pub images_saved: u64,
    pub image_bytes: u64,

    pub people: usize,
    pub books: usize,
    pub books_enriched: usize,

    pub failures: Vec<VisitFailure>,

    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_page(&mut self, kind: PageKind, from_cache: bool) {
        *self.pages_fetched.entry(kind).or_insert(0) += 1;
        if from_cache {
            self.pages_from_cache += 1;
        }
    }

    pub fn record_skip(&mut self) {
        self.pages_skipped += 1;
    }

    pub fn record_image(&mut self, bytes: u64) {
        self.images_saved += 1;
        self.image_bytes += bytes;
    }

    pub fn record_failure(&mut self, failure: VisitFailure) {
        tracing::warn!(
            "{} failed for {}: {}",
            failure.kind,
            failure.url,
            failure.message
        );
        self.failures.push(failure);
    }

    /// Copies the final catalog sizes into the report
    pub fn finish(&mut self, catalog: &Catalog, elapsed: Duration) {
        self.people = catalog.people().len();
        self.books = catalog.books().len();
        self.books_enriched = catalog.books().enriched_count();
        self.elapsed = elapsed;
    }

    pub fn pages_fetched_of(&self, kind: PageKind) -> u64 {
        self.pages_fetched.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_pages(&self) -> u64 {
        self.pages_fetched.values().sum()
    }

    /// Failure counts grouped by kind label
    pub fn failure_summary(&self) -> BTreeMap<&'static str, u64> {
        let mut summary = BTreeMap::new();
        for failure in &self.failures {
            *summary.entry(failure.kind.label()).or_insert(0) += 1;
        }
        summary
    }

    pub fn failures_of(&self, kind: &FailureKind) -> impl Iterator<Item = &VisitFailure> {
        let label = kind.label();
        self.failures.iter().filter(move |f| f.kind.label() == label)
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Pages:");
    for kind in PageKind::all() {
        println!("  {}: {}", kind, report.pages_fetched_of(kind));
    }
    println!("  served from cache: {}", report.pages_from_cache);
    println!("  skipped (not a recommendation page): {}", report.pages_skipped);
    println!();

    println!("Catalog:");
    println!("  People: {}", report.people);
    println!(
        "  Books: {} ({} with description or genres)",
        report.books, report.books_enriched
    );
    println!(
        "  Images saved: {} ({} bytes)",
        report.images_saved, report.image_bytes
    );
    println!();

    if report.failures.is_empty() {
        println!("No failures.");
    } else {
        println!("Failures ({}):", report.failures.len());
        for (label, count) in report.failure_summary() {
            println!("  {}: {}", label, count);
        }
        println!();
        for failure in &report.failures {
            println!("  - [{}] {}: {}", failure.kind, failure.url, failure.message);
        }
    }
    println!();

    println!(
        "Finished in {:.1}s ({} pages)",
        report.elapsed.as_secs_f64(),
        report.total_pages()
    );
}
