//! Posting pages on the two supported job boards: title, location, the pay
//! range advertised on the page, and the posting filters.

use common::{format_usd, JobBoard, JobResult};
use log::debug;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;

/// Board hosting `url`, matched on the host name.
pub fn detect_board(url: &str) -> Option<JobBoard> {
    let host = url::Url::parse(url).ok()?.host_str()?.to_ascii_lowercase();
    if host == "lever.co" || host.ends_with(".lever.co") {
        Some(JobBoard::Lever)
    } else if host == "greenhouse.io" || host.ends_with(".greenhouse.io") {
        Some(JobBoard::Greenhouse)
    } else {
        None
    }
}

/// What we read off a posting page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingDetails {
    pub title: Option<String>,
    pub location: Option<String>,
    pub posted_salary: Option<String>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("posting selector is valid")
}

static LEVER_TITLE: Lazy<Selector> = Lazy::new(|| selector("div.posting-headline h2"));
static LEVER_CATEGORIES: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "div.posting-categories .location",
        "div.posting-categories .commitment",
        "div.posting-categories .workplaceTypes",
    ]
    .iter()
    .map(|css| selector(css))
    .collect()
});

static GREENHOUSE_TITLES: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "h1.app-title",
        "h1.job-title",
        "h1#gh-job-title",
        "div.heading h1",
        "div.job-header h1",
        "meta[property='og:title']",
    ]
    .iter()
    .map(|css| selector(css))
    .collect()
});
static GREENHOUSE_LOCATIONS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["div.location", "div.job-location", "span.location"]
        .iter()
        .map(|css| selector(css))
        .collect()
});

static SALARY_DIV: Lazy<Selector> = Lazy::new(|| selector("div.salary.compensation__salary"));
static JSON_LD: Lazy<Selector> = Lazy::new(|| selector("script[type='application/ld+json']"));

// schema.org JobPosting, only the pieces carrying pay.
#[derive(Debug, Deserialize)]
struct LdJobPosting {
    #[serde(rename = "baseSalary")]
    base_salary: Option<LdBaseSalary>,
}

#[derive(Debug, Deserialize)]
struct LdBaseSalary {
    value: Option<LdSalaryValue>,
}

#[derive(Debug, Deserialize)]
struct LdSalaryValue {
    #[serde(rename = "minValue")]
    min_value: Option<f64>,
    #[serde(rename = "maxValue")]
    max_value: Option<f64>,
}

/// Trimmed text (or `content` attribute for `<meta>`) of the first match.
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    let text = if element.value().name() == "meta" {
        element.value().attr("content").unwrap_or_default().to_string()
    } else {
        element.text().collect::<String>()
    };
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}

/// Pay range from the compensation block, falling back to JSON-LD `baseSalary`.
fn posted_salary(document: &Html) -> Option<String> {
    if let Some(text) = first_text(document, &SALARY_DIV) {
        return Some(text);
    }

    document
        .select(&JSON_LD)
        .map(|script| script.text().collect::<String>())
        .filter(|body| body.contains("baseSalary"))
        .find_map(|body| match serde_json::from_str::<LdJobPosting>(&body) {
            Ok(posting) => {
                let value = posting.base_salary?.value?;
                let amounts: Vec<String> = [value.min_value, value.max_value]
                    .into_iter()
                    .flatten()
                    .map(|amount| format_usd(amount.round() as i64))
                    .collect();
                if amounts.is_empty() {
                    None
                } else {
                    Some(amounts.join(" - "))
                }
            }
            Err(e) => {
                debug!("Unreadable JSON-LD on posting page: {}", e);
                None
            }
        })
}

pub fn parse_posting(board: JobBoard, html: &str) -> PostingDetails {
    let document = Html::parse_document(html);
    let posted_salary = posted_salary(&document);

    match board {
        JobBoard::Lever => {
            let categories: Vec<String> = LEVER_CATEGORIES
                .iter()
                .filter_map(|sel| first_text(&document, sel))
                .map(|text| text.trim_end_matches('/').trim().to_string())
                .filter(|text| !text.is_empty())
                .collect();

            PostingDetails {
                title: first_text(&document, &LEVER_TITLE),
                location: if categories.is_empty() {
                    None
                } else {
                    Some(categories.join(" / "))
                },
                posted_salary,
            }
        }
        JobBoard::Greenhouse => PostingDetails {
            title: GREENHOUSE_TITLES
                .iter()
                .find_map(|sel| first_text(&document, sel)),
            location: GREENHOUSE_LOCATIONS
                .iter()
                .filter_map(|sel| first_text(&document, sel))
                .map(|text| strip_location_label(&text))
                .find(|text| !text.is_empty()),
            posted_salary,
        },
    }
}

fn strip_location_label(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix("Location").unwrap_or(text).trim_start();
    let text = text.strip_prefix(':').unwrap_or(text);
    text.trim().to_string()
}

/// Case-insensitive substring match on "remote".
pub fn is_remote(location: &str) -> bool {
    location.to_ascii_lowercase().contains("remote")
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Which postings survive into the report. Unknown title or location never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingFilter {
    pub remote_only: bool,
    pub internships_only: bool,
    pub title_keyword: Option<String>,
    pub source: Option<JobBoard>,
}

impl PostingFilter {
    /// Whether any check needs the posting page.
    pub fn needs_details(&self) -> bool {
        self.remote_only || self.internships_only || self.title_keyword.is_some()
    }

    pub fn matches_source(&self, source: Option<JobBoard>) -> bool {
        self.source.is_none() || self.source == source
    }

    pub fn accepts(&self, job: &JobResult) -> bool {
        if !self.matches_source(job.source) {
            return false;
        }
        if self.remote_only && !job.location.as_deref().is_some_and(is_remote) {
            return false;
        }
        let title = job.title.as_deref();
        if self.internships_only && !title.is_some_and(|t| contains_ignore_case(t, "intern")) {
            return false;
        }
        if let Some(keyword) = &self.title_keyword {
            if !title.is_some_and(|t| contains_ignore_case(t, keyword)) {
                return false;
            }
        }
        true
    }
}
