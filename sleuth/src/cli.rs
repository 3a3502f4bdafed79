use crate::pipeline::HuntOptions;
use crate::posting::PostingFilter;
use clap::Parser;
use common::JobBoard;

const EXAMPLES: &str = "\
Examples:
  salary-sleuth -j kali
  salary-sleuth -j oscp -t
  salary-sleuth -j \"red team\" -r
  salary-sleuth -j pentest --internships --source greenhouse
  salary-sleuth -c rapid7";

/// Find job postings on Lever and Greenhouse and the median software engineer
/// pay at each employer.
#[derive(Parser, Debug)]
#[command(name = "salary-sleuth")]
#[command(version)]
#[command(long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Job characteristic to search for on job listing websites
    #[arg(short = 'j', long = "job")]
    pub job: Option<String>,

    /// Name of a specific company to look up salary information for
    #[arg(short = 'c', long = "company")]
    pub company: Option<String>,

    /// Silence the banner
    #[arg(short = 's', long = "silence")]
    pub silence: bool,

    /// Number of search result pages to scrape
    #[arg(short = 'p', long = "pages", default_value_t = 50)]
    pub pages: u32,

    /// Search engine passed to go-dork (google, shodan, bing, duck, yahoo, ask)
    #[arg(short = 'e', long = "engine", default_value = "google")]
    pub engine: String,

    /// Print a table sorted by median salary, highest first
    #[arg(short = 't', long = "table")]
    pub table: bool,

    /// Only keep postings whose location mentions "remote"
    #[arg(short = 'r', long = "remote")]
    pub remote: bool,

    /// Only keep postings whose title mentions "intern"
    #[arg(long = "internships")]
    pub internships: bool,

    /// Only keep postings whose title contains this keyword
    #[arg(short = 'k', long = "title-keyword")]
    pub title_keyword: Option<String>,

    /// Only keep postings from this job board (lever or greenhouse)
    #[arg(long = "source")]
    pub source: Option<JobBoard>,

    /// Fetch each posting page for its title and location
    #[arg(long = "titles")]
    pub titles: bool,

    /// Print results as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Proxy URL for all HTTP requests (e.g. http://127.0.0.1:8080)
    #[arg(long = "proxy", env = "SALARY_SLEUTH_PROXY")]
    pub proxy: Option<String>,

    /// go-dork executable
    #[arg(long = "dork-bin", env = "GO_DORK_BIN", default_value = "go-dork")]
    pub dork_bin: String,

    /// Enable debug logging
    #[arg(long = "debug")]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Stream,
    Table,
    Json,
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub hunt: Option<HuntOptions>,
    pub company: Option<String>,
    pub show_banner: bool,
    pub mode: OutputMode,
    pub proxy: Option<String>,
    pub dork_bin: String,
}

impl Cli {
    /// `None` when there is nothing to look up.
    pub fn into_config(self) -> Option<Config> {
        if self.job.is_none() && self.company.is_none() {
            return None;
        }

        let mode = if self.json {
            OutputMode::Json
        } else if self.table {
            OutputMode::Table
        } else {
            OutputMode::Stream
        };

        let filter = PostingFilter {
            remote_only: self.remote,
            internships_only: self.internships,
            title_keyword: self.title_keyword,
            source: self.source,
        };

        let hunt = self.job.map(|keyword| HuntOptions {
            keyword,
            engine: self.engine,
            pages: self.pages,
            fetch_details: self.titles || filter.needs_details() || mode != OutputMode::Stream,
            filter,
        });

        // stdout has to stay parseable in JSON mode
        Some(Config {
            hunt,
            company: self.company,
            show_banner: !self.silence && mode != OutputMode::Json,
            mode,
            proxy: self.proxy,
            dork_bin: self.dork_bin,
        })
    }
}
