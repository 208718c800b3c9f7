//! Deterministic URL-to-collection classification for Webstash.
//!
//! [`classify`] maps any URL text to the semantic collection it belongs in
//! (`"github_repositories"`, `"python_documentation"`, ...). It is a pure,
//! total function: no I/O, no shared state, and no input can make it fail.
//! Rules live in an ordered cascade (see [`rules`]) so precedence is
//! explicit and each rule is testable on its own.

mod rules;
pub mod url;

pub use url::{ParsedUrl, clean_domain, make_filename, service_from_domain, split_url};

/// Bucket for input that defeats decomposition entirely.
pub const FALLBACK_BUCKET: &str = "uncategorized";

/// Classify a URL into a semantic collection name.
///
/// The first matching rule in the cascade wins. URLs no rule claims fall
/// back to `<clean_domain>_pages`; input with no recognizable domain yields
/// [`FALLBACK_BUCKET`].
pub fn classify(url: &str) -> String {
    let parsed = split_url(url);
    if parsed.domain.is_empty() {
        return FALLBACK_BUCKET.to_string();
    }

    for (name, rule) in rules::CASCADE {
        if let Some(bucket) = rule(&parsed) {
            tracing::trace!(rule = name, bucket = %bucket, "classification rule matched");
            return bucket;
        }
    }

    let clean = clean_domain(&parsed.domain);
    if clean.is_empty() {
        return FALLBACK_BUCKET.to_string();
    }
    format!("{clean}_pages")
}
