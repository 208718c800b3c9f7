//! Tolerant URL decomposition and domain helpers.
//!
//! Classification must accept whatever text the extension hands over, so
//! this module never parses strictly: a malformed URL decomposes into
//! whatever domain/path/query it looks most like, and downstream rules
//! decide what to do with it.

use std::sync::LazyLock;

use regex::Regex;

/// Known TLD suffix plus anything after it, stripped when computing the
/// clean base domain for fallback buckets.
static TLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(com|org|net|io|co|gov|edu|info).*$").unwrap());

/// Leading `www.` label.
static WWW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^www\.").unwrap());

// ---------------------------------------------------------------------------
// ParsedUrl
// ---------------------------------------------------------------------------

/// The three components classification rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Lower-cased host part; may be empty for degenerate input.
    pub domain: String,
    /// Path including the leading slash; `/` when absent.
    pub path: String,
    /// Raw query string without the `?`; empty when absent.
    pub query: String,
}

/// Split a URL into domain, path, and query components.
///
/// Strips a leading `http://`/`https://` scheme, splits the query off at the
/// first `?`, and splits the remainder at the first `/`. Total: any input
/// produces some decomposition.
pub fn split_url(url: &str) -> ParsedUrl {
    let mut rest = url;
    if let Some(stripped) = rest.strip_prefix("http://") {
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix("https://") {
        rest = stripped;
    }

    let (rest, query) = match rest.split_once('?') {
        Some((before, after)) => (before, after),
        None => (rest, ""),
    };

    let (domain, path) = match rest.split_once('/') {
        Some((domain, tail)) => (domain, format!("/{tail}")),
        None => (rest, "/".to_string()),
    };

    ParsedUrl {
        domain: domain.to_lowercase(),
        path,
        query: query.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Domain helpers
// ---------------------------------------------------------------------------

/// Clean base domain used for fallback buckets: strip `www.`, strip a known
/// TLD suffix and everything after it, then take the second-to-last
/// remaining label when more than one is left.
pub fn clean_domain(domain: &str) -> String {
    let without_www = WWW_RE.replace(domain, "");
    let without_tld = TLD_RE.replace(&without_www, "");

    let parts: Vec<&str> = without_tld.split('.').collect();
    if parts.len() > 1 {
        parts[parts.len() - 2].to_string()
    } else {
        without_tld.into_owned()
    }
}

/// Service name a documentation URL belongs to: the second-to-last domain
/// label (which skips `www.`/`docs.` prefixes), or `general` when the
/// domain has no TLD to skip.
pub fn service_from_domain(domain: &str) -> String {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2].to_string()
    } else {
        "general".to_string()
    }
}

/// Derive the relative file path the filesystem sink writes a capture to:
/// a directory per domain (www-stripped), path segments joined with
/// underscores, `.md` suffix. The root path maps to `<domain>/<domain>.md`.
pub fn make_filename(url: &str) -> String {
    let parsed = split_url(url);
    let domain = WWW_RE.replace(&parsed.domain, "").into_owned();

    if parsed.path == "/" || parsed.path.is_empty() {
        return format!("{domain}/{domain}.md");
    }

    let flattened = parsed
        .path
        .trim_end_matches('/')
        .trim_start_matches('/')
        .replace('/', "_");

    format!("{domain}/{flattened}.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_https_urls() {
        let parsed = split_url("https://example.com/path/to/page");
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.path, "/path/to/page");
        assert_eq!(parsed.query, "");
    }

    #[test]
    fn splits_http_urls() {
        let parsed = split_url("http://example.com/page");
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.path, "/page");
    }

    #[test]
    fn splits_query_strings() {
        let parsed = split_url("https://example.com/search?q=test&page=1");
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.path, "/search");
        assert_eq!(parsed.query, "q=test&page=1");
    }

    #[test]
    fn defaults_missing_path_to_root() {
        assert_eq!(split_url("https://example.com").path, "/");
        assert_eq!(split_url("https://example.com/").path, "/");
    }

    #[test]
    fn lowercases_domain_but_not_path() {
        let parsed = split_url("https://EXAMPLE.COM/Path");
        assert_eq!(parsed.domain, "example.com");
        assert_eq!(parsed.path, "/Path");
    }

    #[test]
    fn tolerates_non_urls() {
        let parsed = split_url("not a url at all");
        assert_eq!(parsed.domain, "not a url at all");
        assert_eq!(parsed.path, "/");

        assert_eq!(split_url("").domain, "");
        assert_eq!(split_url("https://").domain, "");
    }

    #[test]
    fn clean_domain_strips_www_and_tld() {
        assert_eq!(clean_domain("www.example.com"), "example");
        assert_eq!(clean_domain("example.com"), "example");
        assert_eq!(clean_domain("example.co.uk"), "example");
        assert_eq!(clean_domain("randomsite.xyz"), "randomsite");
    }

    #[test]
    fn service_from_domain_takes_second_level() {
        assert_eq!(service_from_domain("docs.python.org"), "python");
        assert_eq!(service_from_domain("www.stripe.com"), "stripe");
        assert_eq!(service_from_domain("localhost"), "general");
    }

    #[test]
    fn make_filename_flattens_path() {
        assert_eq!(
            make_filename("https://linkedin.com/in/kimjune01/"),
            "linkedin.com/in_kimjune01.md"
        );
        assert_eq!(
            make_filename("https://linkedin.com/in/kimjune01"),
            "linkedin.com/in_kimjune01.md"
        );
    }

    #[test]
    fn make_filename_root_url_uses_domain() {
        assert_eq!(
            make_filename("https://linkedin.com/"),
            "linkedin.com/linkedin.com.md"
        );
        assert_eq!(make_filename("https://domain.com"), "domain.com/domain.com.md");
    }

    #[test]
    fn make_filename_strips_www() {
        assert_eq!(
            make_filename("http://www.example.com/foo/bar/baz/"),
            "example.com/foo_bar_baz.md"
        );
    }

    #[test]
    fn make_filename_keeps_subdomains() {
        assert_eq!(
            make_filename("https://sub.domain.com/path/to/resource/"),
            "sub.domain.com/path_to_resource.md"
        );
    }
}
