//! Scheduler for managing the crawl frontier and pacing
//!
//! This module handles:
//! - FIFO queue management for pages to crawl (breadth-first order)
//! - The depth policy deciding which discovered links become tasks
//! - The fixed pause between pages

use crate::config::CrawlerConfig;
use crate::state::CrawlTask;
use std::collections::VecDeque;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scheduler manages the frontier queue and pacing
///
/// Tasks are handed out in the order they were pushed. Since a child is
/// always one hop deeper than its parent, a URL is first dequeued at its
/// minimal depth.
#[derive(Debug)]
pub struct Scheduler {
    /// Frontier of pages waiting to be fetched
    frontier: VecDeque<CrawlTask>,

    /// Crawler configuration
    config: CrawlerConfig,
}

impl Scheduler {
    /// Creates a scheduler with an empty frontier
    pub fn new(config: CrawlerConfig) -> Self {
        Self {
            frontier: VecDeque::new(),
            config,
        }
    }

    /// Adds a task to the back of the frontier
    pub fn push(&mut self, task: CrawlTask) {
        tracing::trace!(
            "Queued {} (depth {}, {})",
            task.url,
            task.depth,
            task.origin
        );
        self.frontier.push_back(task);
    }

    /// Takes the next task from the front of the frontier
    pub fn next_task(&mut self) -> Option<CrawlTask> {
        self.frontier.pop_front()
    }

    /// Returns the number of queued tasks
    pub fn len(&self) -> usize {
        self.frontier.len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Whether the depth policy lets this task be fetched
    pub fn admits(&self, task: &CrawlTask) -> bool {
        self.config.allows(task)
    }

    /// The pause applied after each page
    pub fn delay(&self) -> Duration {
        self.config.delay()
    }

    /// Waits out the inter-page delay
    ///
    /// Returns early if `cancel` fires while waiting.
    pub async fn pace(&self, cancel: &CancellationToken) {
        let delay = self.delay();
        if delay.is_zero() {
            return;
        }

        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
