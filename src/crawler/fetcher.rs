//! HTTP fetcher
//!
//! This module handles page requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeout
//! - Serving pages from the response cache when present
//! - Filling the cache after a successful fetch
//! - Error classification

use crate::config::Config;
use crate::storage::{ResponseCache, SharedCache};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// Page body content
        body: String,
        /// True if the body came from the response cache
        from_cache: bool,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use goodbooks_crawler::config::Config;
/// use goodbooks_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, consulting the response cache first
///
/// Only successful responses are cached. Cache errors are logged and the
/// fetch falls back to the network; they never fail the visit.
pub async fn fetch_page(client: &Client, cache: Option<&SharedCache>, url: &Url) -> FetchResult {
    if let Some(cache) = cache {
        let cached = {
            let cache = cache.lock().unwrap_or_else(|e| e.into_inner());
            cache.get(url.as_str())
        };

        match cached {
            Ok(Some(hit)) => {
                tracing::trace!("Cache hit for {}", url);
                let final_url = Url::parse(&hit.final_url).unwrap_or_else(|_| url.clone());
                return FetchResult::Success {
                    final_url,
                    body: hit.body,
                    from_cache: true,
                };
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache lookup failed for {}: {}", url, e),
        }
    }

    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().clone();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return classify_error(e),
    };

    if let Some(cache) = cache {
        let mut cache = cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = cache.put(url.as_str(), final_url.as_str(), &body) {
            tracing::warn!("Failed to cache {}: {}", url, e);
        }
    }

    FetchResult::Success {
        final_url,
        body,
        from_cache: false,
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { error }
}
