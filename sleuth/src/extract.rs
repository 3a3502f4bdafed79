use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// All URLs in `text`, in the order they appear. Duplicates are kept.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// First path segment after the host, e.g. `acme` for
/// `https://boards.greenhouse.io/acme/jobs/123`.
pub fn company_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.path_segments()?
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
}
