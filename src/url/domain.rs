use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use goodbooks_crawler::url::extract_domain;
///
/// let url = Url::parse("https://WWW.GOODBOOKS.IO/people/").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.goodbooks.io".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks if a domain matches a pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches the bare
/// domain and any subdomain of it.
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

/// Returns true if `domain` matches any of the allowed patterns
pub fn is_allowed_domain(domain: &str, allowed: &[String]) -> bool {
    allowed
        .iter()
        .any(|pattern| matches_wildcard(&pattern.to_lowercase(), domain))
}
