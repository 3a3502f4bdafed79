//! Median software-engineer compensation from levels.fyi company pages.

use crate::error::{Result, SleuthError};
use crate::fetch::PageFetcher;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const SALARY_LABEL: &str = "Software Engineer Salary";

static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector is valid"));

// Numbers that may have commas (e.g. "$188,500" or "188500")
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?\s*(\d{1,3}(?:,\d{3})+|\d+)").expect("amount pattern is valid")
});

/// levels.fyi company slug: lowercase, spaces become hyphens.
pub fn company_slug(company: &str) -> String {
    company.trim().to_lowercase().replace(' ', "-")
}

pub fn salary_url(company: &str) -> String {
    format!(
        "https://www.levels.fyi/companies/{}/salaries/",
        company_slug(company)
    )
}

/// Pulls the salary figure out of a salary page.
///
/// `Ok(None)` means the page has no figure for the role; an error means the
/// figure is there but unreadable.
pub trait SalaryExtractor {
    fn extract(&self, company: &str, markup: &str) -> Result<Option<i64>>;
}

/// Reads the cell next to the first `<td>Software Engineer Salary</td>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevelsTable;

impl SalaryExtractor for LevelsTable {
    fn extract(&self, company: &str, markup: &str) -> Result<Option<i64>> {
        let document = Html::parse_document(markup);

        let Some(label) = document
            .select(&TD)
            .find(|td| td.text().collect::<String>().trim() == SALARY_LABEL)
        else {
            return Ok(None);
        };

        let Some(cell) = label
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "td")
        else {
            return Ok(None);
        };

        let raw = cell.text().collect::<String>();
        parse_amount(&raw)
            .map(Some)
            .ok_or_else(|| SleuthError::UnparsableSalary {
                company: company.to_string(),
                raw: raw.trim().to_string(),
            })
    }
}

/// First dollar amount in `raw`, with currency formatting stripped.
fn parse_amount(raw: &str) -> Option<i64> {
    let matched = AMOUNT_RE.captures(raw)?.get(1)?;
    let digits: String = matched
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<i64>().ok()
}

/// One GET per call; repeated companies are fetched again.
pub fn lookup_salary(
    fetcher: &dyn PageFetcher,
    extractor: &dyn SalaryExtractor,
    company: &str,
) -> Result<Option<i64>> {
    let url = salary_url(company);
    info!("Looking up salary for {}", company);
    let markup = fetcher.fetch(&url)?;
    let salary = extractor.extract(company, &markup)?;
    if salary.is_none() {
        debug!("No salary row for {} at {}", company, url);
    }
    Ok(salary)
}
