use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SleuthError {
    #[error("search tool `{tool}` not found; install go-dork or pass --dork-bin")]
    SearchToolMissing { tool: String },

    #[error("search tool `{tool}` exited with {status}: {stderr}")]
    SearchToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("salary cell for {company} is not a number: {raw:?}")]
    UnparsableSalary { company: String, raw: String },

    #[error("invalid proxy url {url}: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SleuthError>;
