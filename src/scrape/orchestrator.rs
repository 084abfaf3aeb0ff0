//! Scrape orchestration - drives pagination end to end
//!
//! The orchestrator fans the configured page range out over a bounded
//! pool of fetch tasks, collects exactly one classified result per page,
//! aggregates and deduplicates across pages, and hands the result to the
//! sink. A failing page is recorded and tolerated; only configuration
//! errors, task panics, and sink write failures abort the run.

use crate::config::Config;
use crate::report::{aggregate, PageOutcome, PageResult, ScrapeReport};
use crate::scrape::fetcher::{build_http_client, fetch_page, FetchOutcome, RetryPolicy};
use crate::scrape::parser::parse_pass_table;
use crate::scrape::request::build_page_request;
use crate::sink::{JsonFileSink, ReportSink};
use crate::{PasswatchError, Result};
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

/// Drives one scrape run for one target
pub struct Orchestrator {
    config: Arc<Config>,
    endpoint: Url,
    client: Client,
}

impl Orchestrator {
    /// Creates an orchestrator, validating config-level invariants and
    /// building the HTTP client up front so configuration errors surface
    /// before any network call
    pub fn new(config: Config) -> Result<Self> {
        crate::config::validate(&config)?;

        let endpoint = Url::parse(&config.scrape.endpoint)?;
        let client = build_http_client(Duration::from_secs(config.scrape.fetch_timeout_secs))?;

        Ok(Self {
            config: Arc::new(config),
            endpoint,
            client,
        })
    }

    /// Runs the scrape: fetch all pages, aggregate, write, report
    ///
    /// Produces exactly one [`PageResult`] per page index regardless of
    /// fetch ordering or failures. Pages still unresolved when the run
    /// deadline expires are recorded as transport failures and whatever
    /// completed is still aggregated and written.
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - The run outcome, already persisted
    /// * `Err(PasswatchError)` - Config error, task panic, or write failure
    pub async fn run(&self) -> Result<ScrapeReport> {
        let sat_id = self.config.target.sat_id;
        let pages = self.config.scrape.pages;
        let base_date = Utc::now().date_naive();

        tracing::info!(
            "Scraping {} pages for satellite {} ({})",
            pages,
            sat_id,
            self.display_name()
        );

        let page_results = self.fetch_all_pages(base_date).await?;
        let report = aggregate(sat_id, page_results);

        for page in &report.pages {
            match &page.outcome {
                PageOutcome::Ok(records) => {
                    tracing::debug!("Page {}: {} records", page.page, records.len())
                }
                PageOutcome::Empty => tracing::debug!("Page {}: empty", page.page),
                PageOutcome::ParseFailed(reason) => {
                    tracing::warn!("Page {}: parse failed: {}", page.page, reason)
                }
                PageOutcome::TransportFailed(reason) => {
                    tracing::warn!("Page {}: transport failed: {}", page.page, reason)
                }
            }
        }

        tracing::info!(
            "Run {}: {} unique passes from {} pages ({} failed)",
            report.status,
            report.records.len(),
            report.pages.len(),
            report.failed_pages()
        );

        let sink = JsonFileSink::new(&self.config.output.data_root);
        let path = sink.write_report(&report)?;
        tracing::info!("Wrote {} records to {}", report.records.len(), path.display());

        Ok(report)
    }

    /// Fetches and parses every page with bounded concurrency
    ///
    /// Each page task owns its request and returns its classified result;
    /// the only synchronization point is the join below. The semaphore
    /// caps in-flight fetches at the configured bound.
    async fn fetch_all_pages(&self, base_date: NaiveDate) -> Result<Vec<PageResult>> {
        let pages = self.config.scrape.pages;
        let semaphore = Arc::new(Semaphore::new(
            self.config.scrape.max_concurrent_fetches as usize,
        ));
        let retry = RetryPolicy {
            attempts: self.config.scrape.retry_attempts,
            delay: Duration::from_millis(self.config.scrape.retry_delay_ms),
        };

        let mut tasks: JoinSet<PageResult> = JoinSet::new();

        for page in 1..=pages {
            let request = build_page_request(
                &self.config.target,
                &self.config.observer,
                page,
                pages,
                &self.endpoint,
                &self.config.session.cookie,
            )?;

            let client = self.client.clone();
            let semaphore = Arc::clone(&semaphore);
            let retry = retry.clone();
            let sat_id = self.config.target.sat_id;

            tasks.spawn(async move {
                // The semaphore is never closed while tasks are running
                let _permit = semaphore.acquire_owned().await.ok();

                tracing::debug!("Fetching page {}: {}", page, request.url);
                let outcome = match fetch_page(&client, &request, &retry).await {
                    FetchOutcome::Success { status_code, body } => {
                        tracing::debug!("Page {} fetched (HTTP {})", page, status_code);
                        match parse_pass_table(&body, sat_id, base_date) {
                            Ok(records) if records.is_empty() => PageOutcome::Empty,
                            Ok(records) => PageOutcome::Ok(records),
                            Err(e) => PageOutcome::ParseFailed(e.to_string()),
                        }
                    }
                    FetchOutcome::NotFound => {
                        PageOutcome::TransportFailed("not found".to_string())
                    }
                    FetchOutcome::TransportError { error } => PageOutcome::TransportFailed(error),
                };

                PageResult { page, outcome }
            });
        }

        let deadline = Instant::now() + Duration::from_secs(self.config.scrape.run_timeout_secs);
        let mut results: Vec<PageResult> = Vec::with_capacity(pages as usize);

        while !tasks.is_empty() {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(result))) => results.push(result),
                Ok(Some(Err(e))) => {
                    // A panicking page task is a contract violation, not a
                    // page-level outcome; surface it
                    tasks.abort_all();
                    return Err(PasswatchError::TaskFailed(e.to_string()));
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        "Run deadline expired with {} pages unresolved",
                        tasks.len()
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        // Every page contributes exactly one result; pages lost to the
        // deadline are recorded as transport failures
        for page in 1..=pages {
            if !results.iter().any(|r| r.page == page) {
                results.push(PageResult {
                    page,
                    outcome: PageOutcome::TransportFailed("run timed out".to_string()),
                });
            }
        }

        Ok(results)
    }

    fn display_name(&self) -> &str {
        if self.config.target.name.is_empty() {
            "unnamed"
        } else {
            &self.config.target.name
        }
    }
}

/// Runs a complete scrape for the given configuration
///
/// This is the main library entry point: validate, fetch all pages,
/// aggregate, persist, and return the report. The caller decides what a
/// `PartialSuccess` or `Failure` status means for its exit code.
///
/// # Example
///
/// ```no_run
/// use passwatch::config::load_config;
/// use passwatch::scrape::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_scrape(config).await?;
/// println!("{} passes", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config) -> Result<ScrapeReport> {
    let orchestrator = Orchestrator::new(config)?;
    orchestrator.run().await
}
