use crate::UrlError;
use percent_encoding::percent_decode_str;
use url::Url;

/// Normalizes a URL into the key used for visit deduplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Lowercase the host (done by the parser)
/// 3. Remove the fragment
/// 4. Remove a trailing slash (except for the root path)
///
/// Scheme, `www.` prefix and query are left as they are: the site serves
/// different content per path only.
///
/// # Examples
///
/// ```
/// use goodbooks_crawler::url::normalize_url;
///
/// let url = normalize_url("https://WWW.GOODBOOKS.IO/people/elon-musk/#books").unwrap();
/// assert_eq!(url.as_str(), "https://www.goodbooks.io/people/elon-musk");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(if trimmed.is_empty() { "/" } else { trimmed.as_str() });
    }

    Ok(url)
}

/// Resolves an href against the page it appears on
///
/// Returns None for empty hrefs, fragment-only links, non-HTTP(S) schemes
/// (`javascript:`, `mailto:`, `data:`...) and anything that fails to parse.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

/// Returns the final non-empty path segment of a URL
///
/// Used both as the book slug and as the basename of downloaded images.
/// Percent-escapes are decoded, except when that would produce a path
/// separator.
///
/// ```
/// use url::Url;
/// use goodbooks_crawler::url::last_path_segment;
///
/// let url = Url::parse("https://www.goodbooks.io/books/dune/").unwrap();
/// assert_eq!(last_path_segment(&url).unwrap(), "dune");
/// ```
pub fn last_path_segment(url: &Url) -> Result<String, UrlError> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(decode_segment)
        .ok_or_else(|| UrlError::MissingSlug(url.to_string()))
}

fn decode_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    if decoded.contains(['/', '\\']) {
        segment.to_string()
    } else {
        decoded.into_owned()
    }
}
