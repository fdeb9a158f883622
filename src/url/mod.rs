//! URL handling module
//!
//! This module provides URL normalization for visit deduplication, link
//! resolution, slug extraction, and allowed-domain matching.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_allowed_domain, matches_wildcard};
pub use normalize::{last_path_segment, normalize_url, resolve_link};
