//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier and draining it breadth-first
//! - The per-task state machine (depth gate, dedup, fetch, extract)
//! - Liveness probes for every in-scope link, in document order
//! - Emitting broken-link records and keeping the counters
//! - Honouring cancellation

use crate::config::{validate, validate_seed, Config};
use crate::crawler::checker::LinkChecker;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::Scheduler;
use crate::output::{BrokenLinkRecord, CrawlSummary, Progress, ReportSink};
use crate::state::{CounterSnapshot, CrawlCounters, CrawlTask, PageState, VisitedRegistry};
use crate::url::{resolve, strip_fragment, LinkOrigin, NormalizedUrl, Scope};
use crate::Result;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    seed: Url,
    scope: Scope,
    client: Client,
    checker: LinkChecker,
    scheduler: Scheduler,
    visited: VisitedRegistry,
    counters: Arc<CrawlCounters>,
    sink: Arc<dyn ReportSink>,
    progress: Progress,
    cancel: CancellationToken,
}

/// A link on the current page that will be probed
struct Candidate<'a> {
    href: &'a str,
    target: Option<NormalizedUrl>,
    origin: LinkOrigin,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (validated here)
    /// * `seed` - The page the crawl starts from; must be http or https
    /// * `sink` - Receives broken-link records as they are found
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(DeadlinkError)` - Invalid configuration or seed, or the HTTP
    ///   client could not be built
    pub fn new(config: &Config, seed: Url, sink: Arc<dyn ReportSink>) -> Result<Self> {
        validate(config)?;
        let seed = validate_seed(seed.as_str())?;
        let scope = Scope::new(seed.as_str(), config.crawler.origin_policy)?;

        let client = build_http_client(&config.user_agent)?;
        let counters = Arc::new(CrawlCounters::new());
        let checker = LinkChecker::new(
            client.clone(),
            config.crawler.check_timeout(),
            Arc::clone(&counters),
        );

        Ok(Self {
            config: config.clone(),
            seed,
            scope,
            client,
            checker,
            scheduler: Scheduler::new(config.crawler.clone()),
            visited: VisitedRegistry::new(),
            counters,
            sink,
            progress: Progress::new(config.output.progress),
            cancel: CancellationToken::new(),
        })
    }

    /// Uses `cancel` to stop the crawl from outside
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replaces the status line writer
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// A handle that cancels this crawl when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The current counter values
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Pages fetched so far
    pub fn visited(&self) -> &VisitedRegistry {
        &self.visited
    }

    /// Runs the main crawl loop
    ///
    /// Drains the frontier starting from the seed until it is empty or the
    /// crawl is cancelled, then hands the summary to the sink. Per-page and
    /// per-link failures are recorded as data and never end the crawl.
    pub async fn run(&mut self) -> CrawlSummary {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl of {} (scope {} by {}, internal depth {}, external depth {}, follow external: {})",
            self.seed,
            self.scope.prefix(),
            self.scope.policy(),
            self.config.crawler.max_internal_depth,
            self.config.crawler.max_external_depth,
            self.config.crawler.follow_external
        );

        self.scheduler
            .push(CrawlTask::seed(NormalizedUrl::from(&self.seed)));

        while let Some(task) = self.scheduler.next_task() {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled with {} pages still queued",
                    self.scheduler.len() + 1
                );
                break;
            }

            let state = self.process_task(&task).await;
            tracing::debug!("{} (depth {}): {}", task.url, task.depth, state);

            if state.was_fetched() {
                self.scheduler.pace(&self.cancel).await;
            }
        }

        self.progress.finish();

        let cancelled = self.cancel.is_cancelled();
        let summary = CrawlSummary::new(
            self.seed.as_str(),
            self.counters.snapshot(),
            started_at,
            Utc::now(),
            cancelled,
        );

        if let Err(e) = self.sink.finalize(&summary) {
            tracing::error!("Failed to finalize report: {}", e);
        }

        tracing::info!(
            "Crawl finished: {} pages ({} distinct), {} links checked, {} broken in {:.2}s",
            summary.pages_crawled,
            self.visited.len(),
            summary.links_checked,
            summary.broken,
            summary.duration_seconds()
        );

        summary
    }

    /// Processes a single task
    ///
    /// This method:
    /// 1. Applies the depth gate
    /// 2. Marks the page visited, dropping repeats
    /// 3. Fetches the page
    /// 4. Records a PAGE LOAD ERROR or extracts and processes links
    async fn process_task(&mut self, task: &CrawlTask) -> PageState {
        if !self.scheduler.admits(task) {
            return PageState::DepthExceeded;
        }

        if !self.visited.mark_if_new(&task.url) {
            return PageState::AlreadyVisited;
        }

        let url = match task.url.to_url() {
            Ok(url) => url,
            Err(e) => {
                self.counters.record_page(true);
                self.emit(BrokenLinkRecord::page_load_error(task.url.as_str(), e));
                return PageState::LoadFailed;
            }
        };

        tracing::debug!("Fetching {}", url);
        let fetched = tokio::select! {
            _ = self.cancel.cancelled() => return PageState::Cancelled,
            result = fetch_page(&self.client, &url, self.config.crawler.page_timeout()) => result,
        };

        match fetched {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                self.counters.record_page(false);
                if final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }

                let parsed = parse_html(&body);
                tracing::debug!(
                    "Fetched {} ({}, title: {}): {} links",
                    task.url,
                    status_code,
                    parsed.title.as_deref().unwrap_or("-"),
                    parsed.links.len()
                );

                self.process_links(task, &final_url, &parsed.links).await;
                PageState::Processed
            }

            FetchResult::NotHtml { content_type } => {
                self.counters.record_page(false);
                tracing::debug!("Not extracting links from {} ({})", task.url, content_type);
                PageState::NotHtml
            }

            failure => {
                self.counters.record_page(true);
                let cause = failure.failure_cause().unwrap_or_default();
                tracing::info!("Failed to load {}: {}", task.url, cause);
                self.emit(BrokenLinkRecord::page_load_error(task.url.as_str(), cause));
                PageState::LoadFailed
            }
        }
    }

    /// Probes every in-scope link on a page and enqueues the crawlable ones
    ///
    /// Up to `max-concurrent-checks` probes run at once, but results are
    /// handled in document order. On cancellation the stream is still drained:
    /// a check that completed has been counted, so its record is emitted.
    async fn process_links(&mut self, task: &CrawlTask, base: &Url, hrefs: &[String]) {
        let follow_external = self.config.crawler.follow_external;

        let candidates: Vec<Candidate<'_>> = hrefs
            .iter()
            .filter_map(|href| {
                let candidate = self.candidate(base, href);
                if candidate.origin.is_external() && !follow_external {
                    tracing::trace!("Skipping external link {}", href);
                    None
                } else {
                    Some(candidate)
                }
            })
            .collect();

        let concurrency = self.config.crawler.max_concurrent_checks.max(1) as usize;
        let checker = &self.checker;
        let cancel = &self.cancel;

        let results = stream::iter(candidates)
            .map(|candidate| async move {
                let checked = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    checked = checker.check(base, candidate.href) => Some(checked),
                };
                (candidate, checked)
            })
            .buffered(concurrency);
        tokio::pin!(results);

        while let Some((candidate, checked)) = results.next().await {
            let Some((resolved, outcome)) = checked else {
                tracing::debug!("Link check of {} on {} cancelled", candidate.href, task.url);
                continue;
            };

            self.progress.update(&self.counters.snapshot(), &resolved);

            if let Some(reason) = outcome.broken_reason() {
                tracing::info!("Broken link on {}: {} ({})", task.url, resolved, reason);
                self.emit(BrokenLinkRecord::link(
                    task.url.as_str(),
                    resolved,
                    reason.to_string(),
                ));
            }

            if let Some(target) = candidate.target {
                let child = task.child(target, candidate.origin);
                if self.scheduler.admits(&child) && !self.visited.contains(&child.url) {
                    self.scheduler.push(child);
                }
            }
        }
    }

    /// Resolves and classifies one href
    ///
    /// An href that does not resolve is classified by its own text and has no
    /// crawl target.
    fn candidate<'a>(&self, base: &Url, href: &'a str) -> Candidate<'a> {
        match resolve(base, href) {
            Ok(url) => {
                let target = NormalizedUrl::from(&url);
                Candidate {
                    href,
                    origin: self.scope.classify(&target),
                    target: Some(target),
                }
            }
            Err(_) => Candidate {
                href,
                origin: self.scope.classify(&strip_fragment(href.trim())),
                target: None,
            },
        }
    }

    fn emit(&self, record: BrokenLinkRecord) {
        if let Err(e) = self.sink.record_broken(&record) {
            tracing::error!(
                "Failed to write record for {}: {}",
                record.broken_link,
                e
            );
        }
    }
}

/// Runs a complete crawl of `seed` and returns its summary
///
/// # Example
///
/// ```no_run
/// use deadlink::{run_crawl, Config, MemorySink};
/// use std::sync::Arc;
/// use url::Url;
///
/// # async fn example() -> deadlink::Result<()> {
/// let sink = Arc::new(MemorySink::new());
/// let seed = Url::parse("https://example.com/")?;
/// let summary = run_crawl(&Config::default(), seed, sink.clone()).await?;
/// println!("{} broken links", summary.broken);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    seed: Url,
    sink: Arc<dyn ReportSink>,
) -> Result<CrawlSummary> {
    let mut coordinator = Coordinator::new(config, seed, sink)?;
    Ok(coordinator.run().await)
}
