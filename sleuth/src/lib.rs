//! Salary Sleuth
//!
//! Dorks Lever and Greenhouse for job postings, works out the employer of
//! each posting and looks up its median software engineer compensation on
//! levels.fyi.

pub mod cli;
pub mod dork;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod levels;
pub mod logger;
pub mod pipeline;
pub mod posting;
pub mod report;

pub use error::{Result, SleuthError};
