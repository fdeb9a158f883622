//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through the response cache
//! - Image downloads
//! - Frontier scheduling and concurrency limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod images;
mod scheduler;

pub use coordinator::{Coordinator, CrawlRun};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use images::{download_image, image_destination};
pub use scheduler::{Admission, ImageAdmission, ScheduledVisit, Scheduler};

use crate::config::{Config, OutputConfig};
use crate::storage::{open_cache, ResponseCache, SharedCache};
use crate::CrawlerError;
use std::path::Path;

/// Opens the configured response cache, `None` when caching is disabled
pub fn open_response_cache(output: &OutputConfig) -> Result<Option<SharedCache>, CrawlerError> {
    if !output.cache_enabled() {
        return Ok(None);
    }
    Ok(Some(open_cache(Path::new(&output.cache_path))?))
}

/// Drops every cached response, returning how many were removed
///
/// Returns `None` without touching the filesystem when caching is disabled.
pub fn clear_response_cache(output: &OutputConfig) -> Result<Option<u64>, CrawlerError> {
    let Some(cache) = open_response_cache(output)? else {
        return Ok(None);
    };
    let removed = cache.lock().unwrap_or_else(|e| e.into_inner()).clear()?;
    Ok(Some(removed))
}

/// Runs a complete crawl operation
///
/// Opens the response cache when one is configured, then crawls from the
/// seed listing until the frontier is exhausted. Writing the JSON files is
/// left to the caller.
///
/// # Arguments
///
/// * `config` - The crawler configuration
pub async fn crawl(config: Config) -> Result<CrawlRun, CrawlerError> {
    let cache = open_response_cache(&config.output)?;
    Coordinator::new(config, cache)?.run().await
}
