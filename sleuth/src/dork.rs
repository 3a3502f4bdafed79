//! Dork query construction and the external `go-dork` invocation.

use crate::error::{Result, SleuthError};
use log::{debug, info};
use std::io::ErrorKind;
use std::process::{Command, Stdio};

/// Job boards the query is scoped to.
const DORK_SITES: [&str; 2] = ["lever.co", "greenhouse.io"];

/// A site-scoped search expression plus the engine settings it runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DorkQuery {
    pub expression: String,
    pub engine: String,
    pub pages: u32,
}

impl DorkQuery {
    /// The keyword is passed through untouched, empty or not.
    pub fn build(keyword: &str, engine: &str, pages: u32) -> Self {
        let sites = DORK_SITES
            .iter()
            .map(|site| format!("site:{}", site))
            .collect::<Vec<_>>()
            .join(" OR ");

        Self {
            expression: format!("{} {}", sites, keyword),
            engine: engine.to_string(),
            pages,
        }
    }
}

/// Runs a dork query and returns whatever text the search backend printed.
pub trait SearchRunner {
    fn search(&self, query: &DorkQuery) -> Result<String>;
}

/// Shells out to the go-dork CLI: `<tool> -e <engine> -p <pages> -s -q <query>`.
pub struct GoDork {
    tool: String,
}

impl GoDork {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    fn command(&self, query: &DorkQuery) -> Command {
        let mut cmd = Command::new(&self.tool);
        cmd.arg("-e")
            .arg(&query.engine)
            .arg("-p")
            .arg(query.pages.to_string())
            .arg("-s")
            .arg("-q")
            .arg(&query.expression)
            .stdin(Stdio::null());
        cmd
    }
}

impl SearchRunner for GoDork {
    fn search(&self, query: &DorkQuery) -> Result<String> {
        info!(
            "Running {} on {} ({} pages): {}",
            self.tool, query.engine, query.pages, query.expression
        );

        let output = self.command(query).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SleuthError::SearchToolMissing {
                    tool: self.tool.clone(),
                }
            } else {
                SleuthError::Io(e)
            }
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            debug!("{} stderr: {}", self.tool, stderr);
        }

        if !output.status.success() {
            return Err(SleuthError::SearchToolFailed {
                tool: self.tool.clone(),
                status: output.status,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
