use anyhow::Context;
use clap::{CommandFactory, Parser};
use common::JobResult;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use sleuth::cli::{Cli, Config, OutputMode};
use sleuth::dork::GoDork;
use sleuth::fetch::HttpFetcher;
use sleuth::levels::{salary_url, LevelsTable};
use sleuth::logger;
use sleuth::pipeline::{HuntOptions, Sleuth};
use sleuth::report::{Presenter, BANNER};
use std::io::{self, Stdout};
use std::time::Duration;

fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message("Searching job boards...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn run_hunt(
    sleuth: &Sleuth,
    opts: &HuntOptions,
    mode: OutputMode,
    presenter: &mut Presenter<Stdout>,
) -> anyhow::Result<Vec<JobResult>> {
    let results = match mode {
        OutputMode::Stream => sleuth.hunt(opts, |job| {
            presenter.stream_result(job)?;
            Ok(())
        })?,
        OutputMode::Table | OutputMode::Json => {
            let spinner = create_spinner();
            let mut seen = 0usize;
            let results = sleuth.hunt(opts, |job| {
                seen += 1;
                spinner.set_message(format!("{} postings resolved, last: {}", seen, job.company));
                Ok(())
            });
            spinner.finish_and_clear();
            results?
        }
    };

    match mode {
        // printed once everything is collected
        OutputMode::Json => {}
        OutputMode::Table => {
            presenter.table(&results)?;
            presenter.summary(results.len())?;
        }
        OutputMode::Stream => presenter.summary(results.len())?,
    }
    Ok(results)
}

fn run(config: Config) -> anyhow::Result<()> {
    let mut presenter = Presenter::new(io::stdout(), BANNER);
    if config.show_banner {
        presenter.banner()?;
    }

    let search = GoDork::new(config.dork_bin.as_str());
    let fetcher = HttpFetcher::new(config.proxy.as_deref()).context("building HTTP client")?;
    let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

    let mut collected = Vec::new();

    if let Some(opts) = &config.hunt {
        info!("Hunting for '{}' postings", opts.keyword);
        collected = run_hunt(&sleuth, opts, config.mode, &mut presenter)
            .with_context(|| format!("job search for '{}' failed", opts.keyword))?;
    }

    if let Some(company) = &config.company {
        let salary = sleuth
            .company_salary(company)
            .with_context(|| format!("salary lookup for '{}' failed", company))?;
        if config.mode == OutputMode::Json {
            let mut job = JobResult::new(company.as_str(), salary_url(company));
            job.median_salary = salary;
            collected.push(job);
        } else {
            presenter.company(company, salary)?;
        }
    }

    if config.mode == OutputMode::Json {
        presenter.json(&collected)?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let Some(config) = cli.into_config() else {
        Cli::command().print_help()?;
        println!("\n\nPlease provide a job keyword (-j) or company name (-c) to search for.");
        return Ok(());
    };

    run(config)
}
