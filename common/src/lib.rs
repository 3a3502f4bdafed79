//! Shared types for salary-sleuth.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job board a posting was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobBoard {
    Lever,
    Greenhouse,
}

impl JobBoard {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobBoard::Lever => "lever",
            JobBoard::Greenhouse => "greenhouse",
        }
    }
}

impl fmt::Display for JobBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobBoard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lever" => Ok(JobBoard::Lever),
            "greenhouse" => Ok(JobBoard::Greenhouse),
            other => Err(format!("unknown job board '{}' (expected lever or greenhouse)", other)),
        }
    }
}

/// One discovered job posting and the median compensation of its employer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub company: String,
    pub url: String,
    pub source: Option<JobBoard>,
    pub title: Option<String>,
    pub location: Option<String>,
    /// Pay range advertised on the posting itself, as shown there.
    pub posted_salary: Option<String>,
    /// Median software-engineer total compensation in USD, if the salary site has it.
    pub median_salary: Option<i64>,
}

impl JobResult {
    pub fn new(company: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            url: url.into(),
            source: None,
            title: None,
            location: None,
            posted_salary: None,
            median_salary: None,
        }
    }
}

/// `188500` -> `$188,500`.
pub fn format_usd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Compensation band used to pick a display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryBand {
    Top,
    High,
    Mid,
    Low,
}

impl SalaryBand {
    pub const TOP_FLOOR: i64 = 300_000;
    pub const HIGH_FLOOR: i64 = 200_000;
    pub const MID_FLOOR: i64 = 100_000;

    /// Lower bounds are inclusive: exactly 200,000 is `High`.
    pub fn classify(salary: i64) -> Self {
        if salary >= Self::TOP_FLOOR {
            SalaryBand::Top
        } else if salary >= Self::HIGH_FLOOR {
            SalaryBand::High
        } else if salary >= Self::MID_FLOOR {
            SalaryBand::Mid
        } else {
            SalaryBand::Low
        }
    }
}
