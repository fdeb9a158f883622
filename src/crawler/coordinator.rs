//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator is the single writer of crawl state. It owns the
//! [`Catalog`] (people plus the slug-indexed book registry), the
//! [`Scheduler`] and the [`CrawlReport`]. Worker tasks fetch and extract
//! pages concurrently, but they only return a [`VisitOutcome`]; every
//! registry lookup, insert and enrichment happens here, one outcome at a
//! time, so no lock guards the catalog.

use crate::catalog::{Catalog, Person};
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::images::{download_image, image_destination};
use crate::crawler::scheduler::{Admission, ImageAdmission, ScheduledVisit, Scheduler};
use crate::extract::{extract_book, extract_listing, extract_person, BookDetails, PersonDelta};
use crate::output::{CrawlReport, FailureKind, VisitFailure};
use crate::state::{PageKind, Visit, VisitOutcome};
use crate::storage::SharedCache;
use crate::url::last_path_segment;
use crate::CrawlerError;
use reqwest::Client;
use scraper::Html;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// What worker tasks share: the HTTP client and the response cache
struct VisitContext {
    client: Client,
    cache: Option<SharedCache>,
}

/// The result of a finished crawl
#[derive(Debug)]
pub struct CrawlRun {
    pub catalog: Catalog,
    pub report: CrawlReport,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    context: Arc<VisitContext>,
    scheduler: Scheduler,
    catalog: Catalog,
    report: CrawlReport,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Creates the image directories; failing to do so is fatal.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `cache` - Response cache, `None` to always hit the network
    pub fn new(config: Config, cache: Option<SharedCache>) -> Result<Self, CrawlerError> {
        for dir in [&config.output.photos_dir, &config.output.covers_dir] {
            std::fs::create_dir_all(dir).map_err(|source| CrawlerError::CreateOutput {
                path: dir.clone(),
                source,
            })?;
        }

        let client = build_http_client(&config)?;
        let scheduler = Scheduler::new(&config.crawler);

        Ok(Self {
            config: Arc::new(config),
            context: Arc::new(VisitContext { client, cache }),
            scheduler,
            catalog: Catalog::new(),
            report: CrawlReport::new(),
        })
    }

    /// Runs the crawl until no visit is queued or in flight
    ///
    /// 1. Queue the seed listing
    /// 2. Spawn queued visits while permits are free
    /// 3. Wait for any visit to finish and apply its outcome, which may
    ///    queue more visits
    /// 4. Stop once the frontier is empty and nothing is running
    pub async fn run(mut self) -> Result<CrawlRun, CrawlerError> {
        let seed = Url::parse(&self.config.crawler.seed_url)?;
        tracing::info!("Starting crawl at {}", seed);
        self.offer_page(PageKind::Listing, seed);

        let start_time = Instant::now();
        let mut tasks: JoinSet<VisitOutcome> = JoinSet::new();
        let mut completed: u64 = 0;

        loop {
            while let Some(ScheduledVisit { visit, permit }) = self.scheduler.next_visit() {
                let context = Arc::clone(&self.context);
                tasks.spawn(async move {
                    let outcome = run_visit(&context, visit).await;
                    drop(permit);
                    outcome
                });
            }

            let Some(joined) = tasks.join_next().await else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            match joined {
                Ok(outcome) => self.apply(outcome),
                Err(e) => self.report.record_failure(VisitFailure::new(
                    "",
                    None,
                    FailureKind::Task,
                    e.to_string(),
                )),
            }

            completed += 1;
            if completed % 10 == 0 {
                tracing::info!(
                    "Progress: {} visits done, {} queued, {} people, {} books",
                    completed,
                    self.scheduler.frontier_size(),
                    self.catalog.people().len(),
                    self.catalog.books().len()
                );
            }
        }

        let dangling = self.catalog.dangling_slugs();
        if !dangling.is_empty() {
            tracing::error!("People reference unknown books: {:?}", dangling);
        }

        self.report.finish(&self.catalog, start_time.elapsed());
        tracing::info!(
            "Crawl completed: {} people, {} books, {} failures in {:?}",
            self.report.people,
            self.report.books,
            self.report.failures.len(),
            self.report.elapsed
        );

        Ok(CrawlRun {
            catalog: self.catalog,
            report: self.report,
        })
    }

    /// Applies one finished visit to the catalog and the frontier
    fn apply(&mut self, outcome: VisitOutcome) {
        if let Some(kind) = outcome.page_kind() {
            self.report.record_page(kind, outcome.is_from_cache());
        }

        match outcome {
            VisitOutcome::ListingFetched { url, delta, .. } => {
                tracing::info!("Listing {} links {} people", url, delta.person_links.len());
                for link in delta.person_links {
                    self.offer_page(PageKind::Person, link);
                }
            }

            VisitOutcome::PersonFetched {
                url, delta: None, ..
            } => {
                tracing::debug!("Skipping {}: not a recommendation page", url);
                self.report.record_skip();
            }

            VisitOutcome::PersonFetched {
                url,
                delta: Some(delta),
                ..
            } => self.apply_person(&url, delta),

            VisitOutcome::BookFetched {
                url, slug, details, ..
            } => self.apply_book(&url, &slug, details),

            VisitOutcome::ImageSaved { dest, bytes } => {
                tracing::trace!("Saved {} ({} bytes)", dest.display(), bytes);
                self.report.record_image(bytes);
            }

            VisitOutcome::Failed(failure) => self.report.record_failure(failure),
        }
    }

    /// Registers a person and the books they recommend
    ///
    /// A book slug seen for the first time is inserted into the registry and
    /// its detail page and cover are queued. A known slug only adds the
    /// reference: at most one detail visit is ever issued per slug.
    fn apply_person(&mut self, url: &Url, delta: PersonDelta) {
        let config = Arc::clone(&self.config);
        let image_path = match delta.portrait_url {
            Some(source) => self.offer_image(source, &config.output.photos_dir),
            None => String::new(),
        };

        let mut book_slugs = Vec::with_capacity(delta.books.len());
        for card in delta.books {
            let cover_dest = card
                .cover_url
                .as_ref()
                .and_then(|source| image_destination(&config.output.covers_dir, source));
            let cover_path = cover_dest
                .as_ref()
                .map(|dest| dest.display().to_string())
                .unwrap_or_default();

            let inserted = self.catalog.books_mut().insert_if_absent(
                &card.slug,
                &card.title,
                card.authors,
                &cover_path,
            );

            if inserted {
                match (card.cover_url, cover_dest) {
                    (Some(source), Some(dest)) => self.claim_image(source, dest),
                    (Some(source), None) => self.report_unnamed_image(&source),
                    (None, _) => {}
                }
                self.offer_page(PageKind::Book, card.detail_url);
            } else {
                tracing::trace!("Book {} already registered", card.slug);
            }

            book_slugs.push(card.slug);
        }

        tracing::debug!(
            "Person {} from {} recommends {} books",
            delta.name,
            url,
            book_slugs.len()
        );
        self.catalog
            .add_person(Person::new(delta.name, delta.industries, book_slugs, image_path));
    }

    /// Writes detail-page data onto the registry entry for `slug`
    fn apply_book(&mut self, url: &Url, slug: &str, details: Option<BookDetails>) {
        let Some(details) = details else {
            tracing::debug!("Book page {} has no details section", url);
            return;
        };

        if !self
            .catalog
            .books_mut()
            .enrich(slug, details.description, details.genres)
        {
            tracing::debug!("Ignoring book page {}: slug {} not registered", url, slug);
        }
    }

    /// Queues a page visit, reporting links that cannot be followed
    fn offer_page(&mut self, kind: PageKind, url: Url) {
        let failure = match self.scheduler.enqueue_page(kind, url.clone()) {
            Admission::Queued | Admission::AlreadyVisited => return,
            Admission::DomainNotAllowed(domain) => VisitFailure::new(
                url.as_str(),
                Some(kind),
                FailureKind::DomainNotAllowed,
                format!("{} is not an allowed domain", domain),
            ),
            Admission::InvalidUrl(message) => {
                VisitFailure::new(url.as_str(), Some(kind), FailureKind::InvalidUrl, message)
            }
        };
        self.report.record_failure(failure);
    }

    /// Queues an image into `dir`, returning the local path it maps to
    fn offer_image(&mut self, source: Url, dir: &str) -> String {
        match image_destination(dir, &source) {
            Some(dest) => {
                let path = dest.display().to_string();
                self.claim_image(source, dest);
                path
            }
            None => {
                self.report_unnamed_image(&source);
                String::new()
            }
        }
    }

    fn report_unnamed_image(&mut self, source: &Url) {
        self.report.record_failure(VisitFailure::new(
            source.as_str(),
            None,
            FailureKind::InvalidUrl,
            "image URL has no file name",
        ));
    }

    fn claim_image(&mut self, source: Url, dest: PathBuf) {
        if let ImageAdmission::Collision { claimed_by } =
            self.scheduler.enqueue_image(source.clone(), dest.clone())
        {
            self.report.record_failure(VisitFailure::new(
                source.as_str(),
                None,
                FailureKind::ImageCollision,
                format!("{} already saved from {}", dest.display(), claimed_by),
            ));
        }
    }
}

/// Executes one visit on a worker task
async fn run_visit(context: &VisitContext, visit: Visit) -> VisitOutcome {
    match visit {
        Visit::Page { kind, url } => {
            match fetch_page(&context.client, context.cache.as_ref(), &url).await {
                FetchResult::Success {
                    final_url,
                    body,
                    from_cache,
                } => extract_page(kind, url, &final_url, &body, from_cache),
                FetchResult::HttpError { status_code } => VisitOutcome::Failed(VisitFailure::new(
                    url.as_str(),
                    Some(kind),
                    FailureKind::HttpStatus(status_code),
                    format!("server answered {}", status_code),
                )),
                FetchResult::NetworkError { error } => VisitOutcome::Failed(VisitFailure::new(
                    url.as_str(),
                    Some(kind),
                    FailureKind::Network,
                    error,
                )),
            }
        }

        Visit::Image { source, dest } => {
            match download_image(&context.client, &source, &dest).await {
                Ok(bytes) => VisitOutcome::ImageSaved { dest, bytes },
                Err(e) => VisitOutcome::Failed(VisitFailure::new(
                    source.as_str(),
                    None,
                    FailureKind::Image,
                    format!("saving to {}: {}", dest.display(), e),
                )),
            }
        }
    }
}

/// Parses a fetched body and runs the extraction rule for its page kind
///
/// Links resolve against `final_url`; the book slug comes from the URL the
/// visit was queued with.
fn extract_page(
    kind: PageKind,
    url: Url,
    final_url: &Url,
    body: &str,
    from_cache: bool,
) -> VisitOutcome {
    let document = Html::parse_document(body);

    match kind {
        PageKind::Listing => VisitOutcome::ListingFetched {
            delta: extract_listing(&document, final_url),
            url,
            from_cache,
        },
        PageKind::Person => VisitOutcome::PersonFetched {
            delta: extract_person(&document, final_url),
            url,
            from_cache,
        },
        PageKind::Book => match last_path_segment(&url) {
            Ok(slug) => VisitOutcome::BookFetched {
                slug,
                details: extract_book(&document),
                url,
                from_cache,
            },
            Err(e) => VisitOutcome::Failed(VisitFailure::new(
                url.as_str(),
                Some(kind),
                FailureKind::InvalidUrl,
                e.to_string(),
            )),
        },
    }
}
