//! Terminal output: banner, streamed report, sorted table and JSON.

use colored::{ColoredString, Colorize};
use common::{format_usd, JobResult, SalaryBand};
use std::io::{self, Write};

pub const BANNER: &str = r#"
$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$
$$$                                                      $$$
$$$                     $alary $leuth                    $$$
$$$                                                      $$$
$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$$
"#;

const NO_DATA: &str = "No Data";
const SALARY_LABEL: &str = "Median Total Comp for Software Engineer";
const SEPARATOR_WIDTH: usize = 50;

const COMPANY_WIDTH: usize = 25;
const SALARY_WIDTH: usize = 16;
const TITLE_WIDTH: usize = 50;
const SOURCE_WIDTH: usize = 12;

fn paint(text: String, band: SalaryBand) -> ColoredString {
    match band {
        SalaryBand::Top => text.green(),
        SalaryBand::High => text.bright_green(),
        SalaryBand::Mid => text.bright_yellow(),
        SalaryBand::Low => text.red(),
    }
}

/// Salary coloured by band, or `No Data`. `width` pads before colouring so
/// escape codes don't break column alignment.
pub fn colorize_salary(salary: Option<i64>, width: usize) -> String {
    match salary {
        Some(amount) => paint(
            format!("{:<width$}", format_usd(amount), width = width),
            SalaryBand::classify(amount),
        )
        .to_string(),
        None => format!("{:<width$}", NO_DATA, width = width),
    }
}

/// Rows shown in table mode: entries with a salary, highest first.
/// Ties keep discovery order.
pub fn table_rows(results: &[JobResult]) -> Vec<&JobResult> {
    let mut rows: Vec<&JobResult> = results
        .iter()
        .filter(|r| r.median_salary.is_some())
        .collect();
    rows.sort_by(|a, b| b.median_salary.cmp(&a.median_salary));
    rows
}

pub struct Presenter<W: Write> {
    out: W,
    banner: &'static str,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, banner: &'static str) -> Self {
        Self { out, banner }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", self.banner.red())
    }

    fn separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    fn salary_line(&mut self, salary: Option<i64>) -> io::Result<()> {
        writeln!(self.out, "{}: {}", SALARY_LABEL, colorize_salary(salary, 0))
    }

    /// One block per result, written as soon as the result exists.
    pub fn stream_result(&mut self, job: &JobResult) -> io::Result<()> {
        writeln!(self.out, "Job URL: {}", job.url)?;
        writeln!(self.out, "Company: {}", job.company.magenta())?;
        if let Some(title) = &job.title {
            writeln!(self.out, "Job Title: {}", title)?;
        }
        if let Some(location) = &job.location {
            writeln!(self.out, "Location: {}", location)?;
        }
        if let Some(range) = &job.posted_salary {
            writeln!(self.out, "Salary Range: {}", range.green())?;
        }
        self.salary_line(job.median_salary)?;
        self.separator()?;
        self.out.flush()
    }

    pub fn company(&mut self, company: &str, salary: Option<i64>) -> io::Result<()> {
        writeln!(self.out, "Company: {}", company.magenta())?;
        self.salary_line(salary)?;
        self.separator()
    }

    pub fn table(&mut self, results: &[JobResult]) -> io::Result<()> {
        let header = format!(
            "{:<cw$} {:<sw$} {:<tw$} {:<srcw$} {}",
            "Company Name",
            "Median Salary",
            "Job Title",
            "Source",
            "Job URL",
            cw = COMPANY_WIDTH,
            sw = SALARY_WIDTH,
            tw = TITLE_WIDTH,
            srcw = SOURCE_WIDTH,
        );
        writeln!(self.out, "{}", header.bold())?;

        for job in table_rows(results) {
            let company = format!("{:<cw$}", job.company, cw = COMPANY_WIDTH);
            writeln!(
                self.out,
                "{} {} {:<tw$} {:<srcw$} {}",
                company.magenta(),
                colorize_salary(job.median_salary, SALARY_WIDTH),
                job.title.as_deref().unwrap_or("-"),
                job.source.map(|board| board.as_str()).unwrap_or("-"),
                job.url,
                tw = TITLE_WIDTH,
                srcw = SOURCE_WIDTH,
            )?;
        }
        Ok(())
    }

    pub fn json(&mut self, results: &[JobResult]) -> crate::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, results)?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn summary(&mut self, total: usize) -> io::Result<()> {
        writeln!(self.out, "Total jobs found: {}", total)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}
