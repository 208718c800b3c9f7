//! The ordered classification rule cascade.
//!
//! Precedence is data: [`CASCADE`] is an ordered table of named rule
//! functions, each returning `Some(bucket)` when it claims a URL. The first
//! match wins and evaluation stops. A rule that matches a platform's domain
//! but none of its sub-cases returns that platform's `_other` bucket, so a
//! matched domain never falls through to a lower-precedence rule.
//!
//! Order within the table:
//! 1. IP literals, then tight per-site registries (code hosting, Q&A,
//!    package indexes, playgrounds, video, cloud suites, learning, shopping,
//!    music, messaging, finance, e-commerce).
//! 2. Documentation-path detection.
//! 3. Broad substring platforms (social, news, academic, forums), which are
//!    false-positive-prone and must lose to everything above.
//! 4. Generic file-extension and blog rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::url::{ParsedUrl, service_from_domain};

/// Dotted-quad IP literal.
static IP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+$").unwrap());

/// Bare `/in/<handle>` LinkedIn profile path.
static LINKEDIN_PROFILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/in/[\w-]+/?$").unwrap());

/// `/owner/repo/pull/...` path shape.
static PULL_REQUEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[^/]+/[^/]+/pull/").unwrap());

/// `/owner/repo/issues/...` path shape.
static ISSUES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/[^/]+/[^/]+/issues/").unwrap());

/// Bare two-segment `/owner/repo` path.
static TWO_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/[^/]+/[^/]+/?$").unwrap());

/// Bare one-segment `/name` path.
static ONE_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/[^/]+/?$").unwrap());

/// `/user/status/...` tweet path shape.
static TWEET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/[^/]+/status/").unwrap());

/// Subreddit capture.
static SUBREDDIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/r/([^/]+)").unwrap());

static DOCUMENT_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(pdf|docx?|xlsx?|pptx?|txt)$").unwrap());
static IMAGE_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif|bmp|webp|svg)$").unwrap());
static VIDEO_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(mp4|webm|mov|avi|wmv)$").unwrap());
static AUDIO_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(mp3|wav|aac|flac|ogg)$").unwrap());
static ARCHIVE_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(zip|rar|tar|gz|7z)$").unwrap());
static CODE_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(py|js|ts|java|cpp|c|rb|go|rs|php|sh)$").unwrap());

/// Path segments that mark a documentation page.
const DOC_SEGMENTS: &[&str] = &["docs", "documentation", "manual", "guide", "api"];

/// A single classification rule: `Some(bucket)` to claim the URL.
pub(crate) type RuleFn = fn(&ParsedUrl) -> Option<String>;

/// The cascade, highest precedence first. Order is part of the external
/// contract; tests pin it.
pub(crate) const CASCADE: &[(&str, RuleFn)] = &[
    ("ip_literal", ip_literal),
    ("linkedin", linkedin),
    ("github_gist", github_gist),
    ("github", github),
    ("gitlab", gitlab),
    ("bitbucket", bitbucket),
    ("stack_exchange", stack_exchange),
    ("package_registries", package_registries),
    ("notebook_viewers", notebook_viewers),
    ("code_playgrounds", code_playgrounds),
    ("youtube", youtube),
    ("streaming_video", streaming_video),
    ("google_services", google_services),
    ("microsoft_services", microsoft_services),
    ("cloud_storage", cloud_storage),
    ("learning_platforms", learning_platforms),
    ("shopping", shopping),
    ("music", music),
    ("messaging", messaging),
    ("finance", finance),
    ("ecommerce", ecommerce),
    ("documentation", documentation),
    ("social_networks", social_networks),
    ("news_and_publishing", news_and_publishing),
    ("academic", academic),
    ("forums", forums),
    ("file_extensions", file_extensions),
    ("blog", blog),
];

fn bucket(name: &str) -> Option<String> {
    Some(name.to_string())
}

// ---------------------------------------------------------------------------
// Per-site rules
// ---------------------------------------------------------------------------

fn ip_literal(url: &ParsedUrl) -> Option<String> {
    IP_RE.is_match(&url.domain).then(|| "ip_address_sites".to_string())
}

fn linkedin(url: &ParsedUrl) -> Option<String> {
    if !url.domain.contains("linkedin.com") {
        return None;
    }
    // Company before jobs: /company/acme/jobs/123 is a company page.
    if url.path.contains("/in/") || LINKEDIN_PROFILE_RE.is_match(&url.path) {
        bucket("linkedin_profiles")
    } else if url.path.contains("/company/") {
        bucket("linkedin_companies")
    } else if url.path.contains("/jobs/") {
        bucket("linkedin_jobs")
    } else if url.path.contains("/learning/") {
        bucket("linkedin_learning")
    } else {
        bucket("linkedin_other")
    }
}

// Checked before github: gist.github.com would otherwise match the
// github.com substring.
fn github_gist(url: &ParsedUrl) -> Option<String> {
    url.domain
        .contains("gist.github.com")
        .then(|| "github_gists".to_string())
}

fn github(url: &ParsedUrl) -> Option<String> {
    if !url.domain.contains("github.com") {
        return None;
    }
    if PULL_REQUEST_RE.is_match(&url.path) {
        bucket("github_pull_requests")
    } else if ISSUES_RE.is_match(&url.path) {
        bucket("github_issues")
    } else if TWO_SEGMENT_RE.is_match(&url.path) {
        bucket("github_repositories")
    } else if ONE_SEGMENT_RE.is_match(&url.path) {
        bucket("github_profiles")
    } else {
        bucket("github_other")
    }
}

fn gitlab(url: &ParsedUrl) -> Option<String> {
    if !url.domain.contains("gitlab.com") {
        return None;
    }
    if url.path.contains("/issues/") {
        bucket("gitlab_issues")
    } else if url.path.contains("/merge_requests/") {
        bucket("gitlab_merge_requests")
    } else if TWO_SEGMENT_RE.is_match(&url.path) {
        bucket("gitlab_repositories")
    } else if ONE_SEGMENT_RE.is_match(&url.path) {
        bucket("gitlab_profiles")
    } else {
        bucket("gitlab_other")
    }
}

fn bitbucket(url: &ParsedUrl) -> Option<String> {
    if !url.domain.contains("bitbucket.org") {
        return None;
    }
    if url.path.contains("/pull-requests/") {
        bucket("bitbucket_pull_requests")
    } else if url.path.contains("/issues/") {
        bucket("bitbucket_issues")
    } else if TWO_SEGMENT_RE.is_match(&url.path) {
        bucket("bitbucket_repositories")
    } else if ONE_SEGMENT_RE.is_match(&url.path) {
        bucket("bitbucket_profiles")
    } else {
        bucket("bitbucket_other")
    }
}

fn stack_exchange(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("stackoverflow.com") {
        if url.path.contains("/questions/") {
            return bucket("stackoverflow_questions");
        }
        if url.path.contains("/users/") {
            return bucket("stackoverflow_users");
        }
        return bucket("stackoverflow_other");
    }
    if url.domain.contains("stackexchange.com") {
        return bucket("stackexchange_questions");
    }
    None
}

fn package_registries(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("npmjs.com") {
        if url.path.contains("/package/") {
            return bucket("npm_packages");
        }
        return bucket("npm_other");
    }
    if url.domain.contains("pypi.org") {
        if url.path.contains("/project/") {
            return bucket("pypi_packages");
        }
        return bucket("pypi_other");
    }
    if url.domain.contains("hub.docker.com") {
        if url.path.contains("/r/") {
            return bucket("docker_images");
        }
        return bucket("docker_other");
    }
    None
}

fn notebook_viewers(url: &ParsedUrl) -> Option<String> {
    url.domain
        .contains("nbviewer.jupyter.org")
        .then(|| "jupyter_notebooks".to_string())
}

fn code_playgrounds(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("codepen.io") {
        if url.path.contains("/pen/") {
            return bucket("codepen_pens");
        }
        if ONE_SEGMENT_RE.is_match(&url.path) {
            return bucket("codepen_profiles");
        }
        return bucket("codepen_other");
    }
    if url.domain.contains("glitch.com") {
        if url.path.contains("/edit/") {
            return bucket("glitch_projects");
        }
        return bucket("glitch_other");
    }
    if url.domain.contains("replit.com") {
        if url.path.contains("/@") {
            return bucket("replit_profiles");
        }
        return bucket("replit_other");
    }
    if url.domain.contains("jsfiddle.net") {
        return bucket("jsfiddle_fiddles");
    }
    None
}

fn youtube(url: &ParsedUrl) -> Option<String> {
    let short_link = url.domain == "youtu.be";
    if !url.domain.contains("youtube.com") && !short_link {
        return None;
    }
    if url.path.contains("/watch") || short_link {
        bucket("youtube_videos")
    } else if url.path.contains("/playlist") {
        bucket("youtube_playlists")
    } else if url.path.contains("/channel/") || url.path.contains("/c/") || url.path.contains("/user/")
    {
        bucket("youtube_channels")
    } else {
        bucket("youtube_other")
    }
}

fn streaming_video(url: &ParsedUrl) -> Option<String> {
    const STREAMING: &[&str] = &["netflix.com", "hulu.com", "disneyplus.com", "hbomax.com"];
    STREAMING
        .iter()
        .any(|site| url.domain.contains(site))
        .then(|| "streaming_content".to_string())
}

fn google_services(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("drive.google.com") {
        return bucket("google_drive_files");
    }
    if url.domain.contains("docs.google.com") {
        if url.path.contains("/document/") {
            return bucket("google_docs");
        }
        if url.path.contains("/spreadsheets/") {
            return bucket("google_sheets");
        }
        if url.path.contains("/presentation/") {
            return bucket("google_slides");
        }
        return bucket("google_docs_other");
    }
    if url.domain.contains("calendar.google.com") {
        return bucket("google_calendar");
    }
    if url.domain.contains("maps.google.com") {
        return bucket("google_maps");
    }
    None
}

fn microsoft_services(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("onedrive.live.com") || url.domain.contains("1drv.ms") {
        return bucket("onedrive_files");
    }
    if url.domain.contains("teams.microsoft.com") {
        return bucket("microsoft_teams");
    }
    if url.domain.contains("office.com") {
        return bucket("microsoft_office");
    }
    None
}

fn cloud_storage(url: &ParsedUrl) -> Option<String> {
    // Dropbox first: box.com is a substring of dropbox.com.
    if url.domain.contains("dropbox.com") {
        return bucket("dropbox_files");
    }
    if url.domain.contains("box.com") {
        return bucket("box_files");
    }
    None
}

fn learning_platforms(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("coursera.org") {
        return bucket("coursera_courses");
    }
    if url.domain.contains("udemy.com") {
        return bucket("udemy_courses");
    }
    if url.domain.contains("edx.org") {
        return bucket("edx_courses");
    }
    if url.domain.contains("khanacademy.org") {
        return bucket("khanacademy_courses");
    }
    None
}

fn shopping(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("aliexpress.com") {
        return bucket("aliexpress_products");
    }
    if url.domain.contains("shopify.com") {
        return bucket("shopify_stores");
    }
    None
}

fn music(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("spotify.com") {
        if url.path.contains("/track/") {
            return bucket("spotify_tracks");
        }
        if url.path.contains("/album/") {
            return bucket("spotify_albums");
        }
        if url.path.contains("/playlist/") {
            return bucket("spotify_playlists");
        }
        return bucket("spotify_other");
    }
    if url.domain.contains("soundcloud.com") {
        return bucket("soundcloud_tracks");
    }
    if url.domain.contains("music.apple.com") {
        return bucket("apple_music");
    }
    None
}

fn messaging(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("slack.com") {
        return bucket("slack_workspaces");
    }
    if url.domain.contains("discord.com") || url.domain.contains("discord.gg") {
        return bucket("discord_servers");
    }
    if url.domain.contains("telegram.me") || url.domain.contains("t.me") {
        return bucket("telegram_channels");
    }
    if url.domain.contains("whatsapp.com") {
        return bucket("whatsapp_chats");
    }
    None
}

fn finance(url: &ParsedUrl) -> Option<String> {
    const FINANCE: &[&str] = &[
        "chase.com",
        "bankofamerica.com",
        "wellsfargo.com",
        "coinbase.com",
        "binance.com",
    ];
    FINANCE
        .iter()
        .any(|site| url.domain.contains(site))
        .then(|| "finance_sites".to_string())
}

fn ecommerce(url: &ParsedUrl) -> Option<String> {
    const SHOPS: &[&str] = &["amazon.", "ebay.", "walmart.", "etsy."];
    if !SHOPS.iter().any(|shop| url.domain.contains(shop)) {
        return None;
    }
    const PRODUCT_PATHS: &[&str] = &["/product/", "/dp/", "/itm/", "/ip/"];
    if PRODUCT_PATHS.iter().any(|p| url.path.contains(p)) {
        return bucket("ecommerce_products");
    }
    if url.path.contains("/s/")
        || url.path.contains("/sch/")
        || url.query.contains("search=")
        || url.query.contains("q=")
    {
        return bucket("ecommerce_search_results");
    }
    bucket("ecommerce_other")
}

// ---------------------------------------------------------------------------
// Generic rules
// ---------------------------------------------------------------------------

fn documentation(url: &ParsedUrl) -> Option<String> {
    let is_docs = url
        .path
        .split('/')
        .any(|segment| DOC_SEGMENTS.contains(&segment));
    is_docs.then(|| format!("{}_documentation", service_from_domain(&url.domain)))
}

fn social_networks(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("twitter.com") || url.domain.contains("x.com") {
        if TWEET_RE.is_match(&url.path) {
            return bucket("twitter_posts");
        }
        if ONE_SEGMENT_RE.is_match(&url.path) {
            return bucket("twitter_profiles");
        }
        return bucket("twitter_other");
    }
    if url.domain.contains("facebook.com") {
        if url.path.contains("/events/") {
            return bucket("facebook_events");
        }
        if url.path.contains("/groups/") {
            return bucket("facebook_groups");
        }
        if ONE_SEGMENT_RE.is_match(&url.path) {
            return bucket("facebook_profiles");
        }
        return bucket("facebook_other");
    }
    if url.domain.contains("instagram.com") {
        if url.path.starts_with("/p/") {
            return bucket("instagram_posts");
        }
        if ONE_SEGMENT_RE.is_match(&url.path) {
            return bucket("instagram_profiles");
        }
        return bucket("instagram_other");
    }
    None
}

fn news_and_publishing(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("medium.com") {
        return bucket("medium_articles");
    }
    const NEWS: &[&str] = &["nytimes", "washingtonpost", "bbc", "cnn", "reuters"];
    if url.domain.ends_with("news") || NEWS.iter().any(|site| url.domain.contains(site)) {
        return bucket("news_articles");
    }
    None
}

fn academic(url: &ParsedUrl) -> Option<String> {
    const ACADEMIC: &[&str] = &[
        "scholar.google.",
        "arxiv.org",
        "researchgate",
        "academia.edu",
        "jstor.org",
    ];
    ACADEMIC
        .iter()
        .any(|site| url.domain.contains(site))
        .then(|| "academic_papers".to_string())
}

fn forums(url: &ParsedUrl) -> Option<String> {
    if url.domain.contains("reddit.com") {
        if let Some(captures) = SUBREDDIT_RE.captures(&url.path) {
            return Some(format!("reddit_{}", &captures[1]));
        }
        return bucket("reddit_posts");
    }
    if url.domain.contains("quora.com") {
        return bucket("quora_questions");
    }
    None
}

fn file_extensions(url: &ParsedUrl) -> Option<String> {
    if DOCUMENT_EXT_RE.is_match(&url.path) {
        bucket("document_files")
    } else if IMAGE_EXT_RE.is_match(&url.path) {
        bucket("image_files")
    } else if VIDEO_EXT_RE.is_match(&url.path) {
        bucket("video_files")
    } else if AUDIO_EXT_RE.is_match(&url.path) {
        bucket("audio_files")
    } else if ARCHIVE_EXT_RE.is_match(&url.path) {
        bucket("archive_files")
    } else if CODE_EXT_RE.is_match(&url.path) {
        bucket("code_files")
    } else {
        None
    }
}

fn blog(url: &ParsedUrl) -> Option<String> {
    let is_blog = url.domain.contains("blog.") || url.path.contains("/blog/");
    is_blog.then(|| format!("{}_blog_posts", service_from_domain(&url.domain)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::split_url;

    fn run(rule: RuleFn, url: &str) -> Option<String> {
        rule(&split_url(url))
    }

    #[test]
    fn ip_literal_matches_dotted_quads_only() {
        assert_eq!(
            run(ip_literal, "http://192.168.1.20/admin"),
            Some("ip_address_sites".into())
        );
        assert_eq!(run(ip_literal, "https://example.com"), None);
    }

    #[test]
    fn linkedin_company_beats_jobs() {
        assert_eq!(
            run(linkedin, "https://linkedin.com/company/acme/jobs/123"),
            Some("linkedin_companies".into())
        );
        assert_eq!(
            run(linkedin, "https://linkedin.com/jobs/view/123"),
            Some("linkedin_jobs".into())
        );
    }

    #[test]
    fn github_path_shapes() {
        assert_eq!(
            run(github, "https://github.com/user/repo/pull/42"),
            Some("github_pull_requests".into())
        );
        assert_eq!(
            run(github, "https://github.com/user/repo/issues/7"),
            Some("github_issues".into())
        );
        assert_eq!(
            run(github, "https://github.com/user/repo"),
            Some("github_repositories".into())
        );
        assert_eq!(
            run(github, "https://github.com/user"),
            Some("github_profiles".into())
        );
        assert_eq!(
            run(github, "https://github.com/user/repo/tree/main/src"),
            Some("github_other".into())
        );
    }

    #[test]
    fn gist_claims_before_github_would() {
        assert_eq!(
            run(github_gist, "https://gist.github.com/user/abc123"),
            Some("github_gists".into())
        );
        // The plain github rule would also claim the gist domain, which is
        // why the gist rule sits above it in the cascade.
        assert!(run(github, "https://gist.github.com/user/abc123").is_some());
    }

    #[test]
    fn stack_sites() {
        assert_eq!(
            run(stack_exchange, "https://stackoverflow.com/questions/1234/how"),
            Some("stackoverflow_questions".into())
        );
        assert_eq!(
            run(stack_exchange, "https://unix.stackexchange.com/questions/1"),
            Some("stackexchange_questions".into())
        );
    }

    #[test]
    fn ecommerce_sub_cases() {
        assert_eq!(
            run(ecommerce, "https://www.amazon.com/dp/B000123"),
            Some("ecommerce_products".into())
        );
        assert_eq!(
            run(ecommerce, "https://www.ebay.com/sch/i.html?_nkw=keyboard"),
            Some("ecommerce_search_results".into())
        );
        assert_eq!(
            run(ecommerce, "https://www.etsy.com/search?q=ceramics"),
            Some("ecommerce_search_results".into())
        );
        assert_eq!(
            run(ecommerce, "https://www.amazon.com/gp/help"),
            Some("ecommerce_other".into())
        );
    }

    #[test]
    fn documentation_requires_whole_segment() {
        assert_eq!(
            run(documentation, "https://docs.python.org/3/manual/intro"),
            Some("python_documentation".into())
        );
        assert_eq!(
            run(documentation, "https://stripe.com/docs"),
            Some("stripe_documentation".into())
        );
        // "apikeys" is not the segment "api".
        assert_eq!(run(documentation, "https://example.com/apikeys"), None);
    }

    #[test]
    fn subreddits_get_their_own_bucket() {
        assert_eq!(
            run(forums, "https://reddit.com/r/rust/comments/abc"),
            Some("reddit_rust".into())
        );
        assert_eq!(
            run(forums, "https://reddit.com/user/someone"),
            Some("reddit_posts".into())
        );
    }

    #[test]
    fn file_extension_buckets() {
        assert_eq!(
            run(file_extensions, "https://example.com/paper.PDF"),
            Some("document_files".into())
        );
        assert_eq!(
            run(file_extensions, "https://example.com/photo.jpeg"),
            Some("image_files".into())
        );
        assert_eq!(
            run(file_extensions, "https://example.com/clip.mp4"),
            Some("video_files".into())
        );
        assert_eq!(
            run(file_extensions, "https://example.com/song.flac"),
            Some("audio_files".into())
        );
        assert_eq!(
            run(file_extensions, "https://example.com/bundle.tar"),
            Some("archive_files".into())
        );
        assert_eq!(
            run(file_extensions, "https://example.com/script.rs"),
            Some("code_files".into())
        );
        assert_eq!(run(file_extensions, "https://example.com/page.html"), None);
    }

    #[test]
    fn blog_detection() {
        assert_eq!(
            run(blog, "https://blog.acme.com/post"),
            Some("acme_blog_posts".into())
        );
        assert_eq!(
            run(blog, "https://acme.com/blog/2024/launch"),
            Some("acme_blog_posts".into())
        );
        assert_eq!(run(blog, "https://acme.com/about"), None);
    }
}
