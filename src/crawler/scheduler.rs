//! Scheduler for the crawl frontier
//!
//! This module handles:
//! - FIFO queue of pending visits
//! - Once-per-run deduplication of page URLs
//! - Allowed-domain filtering
//! - Claiming local image paths (first claim wins)
//! - Global concurrency limiting via a semaphore

use crate::config::CrawlerConfig;
use crate::state::{PageKind, Visit};
use crate::url::{extract_domain, is_allowed_domain, normalize_url};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// A visit together with the permit that bounds concurrency
///
/// The permit is released when the worker task holding it finishes.
pub struct ScheduledVisit {
    pub visit: Visit,
    pub permit: OwnedSemaphorePermit,
}

/// What happened to a page URL offered to the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Queued,
    /// Same normalized URL was queued earlier in this run
    AlreadyVisited,
    DomainNotAllowed(String),
    InvalidUrl(String),
}

/// What happened to an image offered to the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAdmission {
    Queued,
    /// Same source already claimed this path; nothing to do
    AlreadyClaimed,
    /// A different source already claimed this path and keeps it
    Collision { claimed_by: Url },
}

/// Scheduler manages the frontier and admission rules
pub struct Scheduler {
    /// Global semaphore for limiting concurrent visits
    semaphore: Arc<Semaphore>,

    frontier: VecDeque<Visit>,

    /// Normalized URLs of every page ever queued
    visited: HashSet<String>,

    /// Local image path -> source URL that claimed it
    claimed_images: HashMap<PathBuf, Url>,

    allowed_domains: Vec<String>,

    queued_pages: BTreeMap<PageKind, u64>,
}

impl Scheduler {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_requests as usize)),
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            claimed_images: HashMap::new(),
            allowed_domains: config.allowed_domains.clone(),
            queued_pages: BTreeMap::new(),
        }
    }

    /// Offers a page URL for visiting
    pub fn enqueue_page(&mut self, kind: PageKind, url: Url) -> Admission {
        let normalized = match normalize_url(url.as_str()) {
            Ok(n) => n,
            Err(e) => return Admission::InvalidUrl(e.to_string()),
        };

        let Some(domain) = extract_domain(&normalized) else {
            return Admission::InvalidUrl(format!("no host in {}", normalized));
        };

        if !is_allowed_domain(&domain, &self.allowed_domains) {
            return Admission::DomainNotAllowed(domain);
        }

        if !self.visited.insert(normalized.to_string()) {
            tracing::trace!("Already visited: {}", normalized);
            return Admission::AlreadyVisited;
        }

        tracing::debug!("Queued {} page {}", kind, url);
        *self.queued_pages.entry(kind).or_insert(0) += 1;
        self.frontier.push_back(Visit::Page { kind, url });
        Admission::Queued
    }

    /// Offers an image download; the first source to claim a path keeps it
    pub fn enqueue_image(&mut self, source: Url, dest: PathBuf) -> ImageAdmission {
        if let Some(claimed_by) = self.claimed_images.get(&dest) {
            return if *claimed_by == source {
                ImageAdmission::AlreadyClaimed
            } else {
                ImageAdmission::Collision {
                    claimed_by: claimed_by.clone(),
                }
            };
        }

        self.claimed_images.insert(dest.clone(), source.clone());
        self.frontier.push_back(Visit::Image { source, dest });
        ImageAdmission::Queued
    }

    /// Takes the next visit if one is queued and a permit is free
    ///
    /// Never waits: `None` means either the frontier is empty or every
    /// permit is held by a running visit.
    pub fn next_visit(&mut self) -> Option<ScheduledVisit> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        let visit = self.frontier.pop_front()?;

        Some(ScheduledVisit { visit, permit })
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Number of pages of `kind` queued so far in this run
    pub fn queued_pages(&self, kind: PageKind) -> u64 {
        self.queued_pages.get(&kind).copied().unwrap_or(0)
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}
