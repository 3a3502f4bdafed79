use crate::dork::{DorkQuery, SearchRunner};
use crate::error::Result;
use crate::extract::{company_from_url, extract_urls};
use crate::fetch::PageFetcher;
use crate::levels::{lookup_salary, SalaryExtractor};
use crate::posting::{detect_board, parse_posting, PostingFilter};
use common::JobResult;
use log::{debug, info};

/// Settings for one keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuntOptions {
    pub keyword: String,
    pub engine: String,
    pub pages: u32,
    pub filter: PostingFilter,
    /// Fetch posting pages for title, location and posted pay. Implied by
    /// filters that look at the page.
    pub fetch_details: bool,
}

/// The search, fetch and salary-parsing backends a run works against.
pub struct Sleuth<'a> {
    search: &'a dyn SearchRunner,
    fetcher: &'a dyn PageFetcher,
    extractor: &'a dyn SalaryExtractor,
}

impl<'a> Sleuth<'a> {
    pub fn new(
        search: &'a dyn SearchRunner,
        fetcher: &'a dyn PageFetcher,
        extractor: &'a dyn SalaryExtractor,
    ) -> Self {
        Self {
            search,
            fetcher,
            extractor,
        }
    }

    pub fn company_salary(&self, company: &str) -> Result<Option<i64>> {
        lookup_salary(self.fetcher, self.extractor, company)
    }

    /// Runs the dork, then resolves every discovered posting in discovery order.
    /// `on_result` sees each result as soon as its salary lookup finishes.
    pub fn hunt<F>(&self, opts: &HuntOptions, mut on_result: F) -> Result<Vec<JobResult>>
    where
        F: FnMut(&JobResult) -> Result<()>,
    {
        let query = DorkQuery::build(&opts.keyword, &opts.engine, opts.pages);
        let raw = self.search.search(&query)?;
        let urls = extract_urls(&raw);
        info!("Found {} job URLs", urls.len());

        let fetch_details = opts.fetch_details || opts.filter.needs_details();
        let mut results = Vec::new();

        for url in urls {
            let Some(company) = company_from_url(&url) else {
                debug!("No company segment in {}, skipping", url);
                continue;
            };
            let mut job = JobResult::new(company, url);
            job.source = detect_board(&job.url);

            if !opts.filter.matches_source(job.source) {
                debug!("Skipping {}: source {:?} filtered out", job.url, job.source);
                continue;
            }

            if fetch_details {
                if let Some(board) = job.source {
                    let page = self.fetcher.fetch(&job.url)?;
                    let details = parse_posting(board, &page);
                    job.title = details.title;
                    job.location = details.location;
                    job.posted_salary = details.posted_salary;
                }
            }

            if !opts.filter.accepts(&job) {
                debug!(
                    "Skipping {}: title {:?}, location {:?} filtered out",
                    job.url, job.title, job.location
                );
                continue;
            }

            job.median_salary = self.company_salary(&job.company)?;
            on_result(&job)?;
            results.push(job);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SleuthError;
    use crate::levels::{salary_url, LevelsTable};
    use common::JobBoard;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeSearch {
        output: Result<String>,
        queries: RefCell<Vec<DorkQuery>>,
    }

    impl FakeSearch {
        fn printing(output: &str) -> Self {
            Self {
                output: Ok(output.to_string()),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl SearchRunner for FakeSearch {
        fn search(&self, query: &DorkQuery) -> Result<String> {
            self.queries.borrow_mut().push(query.clone());
            match &self.output {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(SleuthError::SearchToolMissing {
                    tool: "go-dork".to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn with_salary(self, company: &str, salary: &str) -> Self {
            let body = format!(
                "<table><tr><td>Software Engineer Salary</td><td>{}</td></tr></table>",
                salary
            );
            self.with_page(&salary_url(company), &body)
        }
    }

    impl PageFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.requested.borrow_mut().push(url.to_string());
            // Unknown pages behave like a 404 body.
            Ok(self.pages.get(url).cloned().unwrap_or_default())
        }
    }

    fn options(keyword: &str) -> HuntOptions {
        HuntOptions {
            keyword: keyword.to_string(),
            engine: "google".to_string(),
            pages: 2,
            filter: PostingFilter::default(),
            fetch_details: false,
        }
    }

    const DORK_OUTPUT: &str = "\
https://jobs.lever.co/acme/111 Security Engineer - Acme
https://boards.greenhouse.io/initech/jobs/222
https://boards.greenhouse.io/globex/jobs/333 Red Team Lead
";

    #[test]
    fn test_hunt_preserves_discovery_order_and_missing_salaries() {
        let search = FakeSearch::printing(DORK_OUTPUT);
        let fetcher = FakeFetcher::default()
            .with_salary("acme", "$150,000")
            .with_salary("globex", "$250,000");
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let mut streamed = Vec::new();
        let results = sleuth
            .hunt(&options("oscp"), |job| {
                streamed.push(job.company.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(streamed, vec!["acme", "initech", "globex"]);
        let salaries: Vec<_> = results.iter().map(|r| r.median_salary).collect();
        assert_eq!(salaries, vec![Some(150_000), None, Some(250_000)]);
        assert_eq!(
            search.queries.borrow()[0].expression,
            "site:lever.co OR site:greenhouse.io oscp"
        );
        // Without details only salary pages are requested.
        assert_eq!(fetcher.requested.borrow().len(), 3);
    }

    #[test]
    fn test_hunt_repeats_lookup_for_duplicate_companies() {
        let search = FakeSearch::printing(
            "https://jobs.lever.co/acme/1\nhttps://jobs.lever.co/acme/2\n",
        );
        let fetcher = FakeFetcher::default().with_salary("acme", "$310,000");
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let results = sleuth.hunt(&options("rust"), |_| Ok(())).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            *fetcher.requested.borrow(),
            vec![salary_url("acme"), salary_url("acme")]
        );
    }

    #[test]
    fn test_hunt_skips_urls_without_company() {
        let search = FakeSearch::printing("https://jobs.lever.co/\nhttps://jobs.lever.co/acme/1\n");
        let fetcher = FakeFetcher::default();
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let results = sleuth.hunt(&options("rust"), |_| Ok(())).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].company, "acme");
    }

    #[test]
    fn test_hunt_remote_only_filters_before_salary_lookup() {
        let search = FakeSearch::printing(DORK_OUTPUT);
        let fetcher = FakeFetcher::default()
            .with_page(
                "https://jobs.lever.co/acme/111",
                r#"<div class="posting-headline"><h2>Security Engineer</h2>
                   <div class="posting-categories"><div class="location">Remote - US</div></div></div>"#,
            )
            .with_page(
                "https://boards.greenhouse.io/initech/jobs/222",
                r#"<h1 class="app-title">Analyst</h1><div class="location">New York, NY</div>"#,
            )
            .with_salary("acme", "$150,000");
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let mut opts = options("rust");
        opts.filter.remote_only = true;
        let results = sleuth.hunt(&opts, |_| Ok(())).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].company, "acme");
        assert_eq!(results[0].title.as_deref(), Some("Security Engineer"));
        assert_eq!(results[0].median_salary, Some(150_000));
        assert!(!fetcher.requested.borrow().contains(&salary_url("initech")));
        // globex has no posting page, so its location is unknown and it is dropped.
        assert!(!fetcher.requested.borrow().contains(&salary_url("globex")));
    }

    #[test]
    fn test_hunt_with_details_fills_titles() {
        let search = FakeSearch::printing("https://boards.greenhouse.io/globex/jobs/333\n");
        let fetcher = FakeFetcher::default().with_page(
            "https://boards.greenhouse.io/globex/jobs/333",
            r#"<h1 class="app-title">Red Team Lead</h1>
               <script type="application/ld+json">
                 {"baseSalary": {"value": {"minValue": 180000, "maxValue": 220000}}}
               </script>"#,
        );
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let mut opts = options("red team");
        opts.fetch_details = true;
        let results = sleuth.hunt(&opts, |_| Ok(())).unwrap();
        assert_eq!(results[0].title.as_deref(), Some("Red Team Lead"));
        assert_eq!(results[0].source, Some(JobBoard::Greenhouse));
        assert_eq!(results[0].posted_salary.as_deref(), Some("$180,000 - $220,000"));
        assert_eq!(results[0].median_salary, None);
    }

    #[test]
    fn test_hunt_source_filter_skips_other_board_without_fetching() {
        let search = FakeSearch::printing(DORK_OUTPUT);
        let fetcher = FakeFetcher::default().with_salary("acme", "$150,000");
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let mut opts = options("rust");
        opts.filter.source = Some(JobBoard::Lever);
        let results = sleuth.hunt(&opts, |_| Ok(())).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, Some(JobBoard::Lever));
        assert_eq!(*fetcher.requested.borrow(), vec![salary_url("acme")]);
    }

    #[test]
    fn test_hunt_internships_and_title_keyword_filters() {
        let search = FakeSearch::printing(DORK_OUTPUT);
        let fetcher = FakeFetcher::default()
            .with_page(
                "https://jobs.lever.co/acme/111",
                r#"<div class="posting-headline"><h2>Security Intern</h2></div>"#,
            )
            .with_page(
                "https://boards.greenhouse.io/initech/jobs/222",
                r#"<h1 class="app-title">Security Engineer</h1>"#,
            )
            .with_page(
                "https://boards.greenhouse.io/globex/jobs/333",
                r#"<h1 class="app-title">Red Team Intern</h1>"#,
            );
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let mut opts = options("security");
        opts.filter.internships_only = true;
        let companies: Vec<_> = sleuth
            .hunt(&opts, |_| Ok(()))
            .unwrap()
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(companies, vec!["acme", "globex"]);

        let mut opts = options("security");
        opts.filter.title_keyword = Some("red team".to_string());
        let companies: Vec<_> = sleuth
            .hunt(&opts, |_| Ok(()))
            .unwrap()
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(companies, vec!["globex"]);
        assert!(!fetcher.requested.borrow().contains(&salary_url("initech")));
    }

    #[test]
    fn test_hunt_aborts_when_search_fails() {
        let search = FakeSearch {
            output: Err(SleuthError::SearchToolMissing {
                tool: "go-dork".to_string(),
            }),
            queries: RefCell::new(Vec::new()),
        };
        let fetcher = FakeFetcher::default();
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        let err = sleuth.hunt(&options("rust"), |_| Ok(())).unwrap_err();
        assert!(matches!(err, SleuthError::SearchToolMissing { .. }));
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[test]
    fn test_company_salary() {
        let search = FakeSearch::printing("");
        let fetcher = FakeFetcher::default().with_salary("rapid7", "$199,000");
        let sleuth = Sleuth::new(&search, &fetcher, &LevelsTable);

        assert_eq!(sleuth.company_salary("rapid7").unwrap(), Some(199_000));
        assert_eq!(sleuth.company_salary("unknown").unwrap(), None);
    }
}
