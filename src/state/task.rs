use crate::url::{LinkOrigin, NormalizedUrl};

/// A page queued for fetching
///
/// Created when a link is discovered and qualifies for traversal, consumed
/// exactly once by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The page to fetch
    pub url: NormalizedUrl,

    /// Link hops from the seed page (seed = 0)
    pub depth: u32,

    /// Whether the page shares the seed's origin
    pub origin: LinkOrigin,
}

impl CrawlTask {
    /// The task for the seed page
    pub fn seed(url: NormalizedUrl) -> Self {
        Self {
            url,
            depth: 0,
            origin: LinkOrigin::Internal,
        }
    }

    /// A task for a link discovered on this task's page
    pub fn child(&self, url: NormalizedUrl, origin: LinkOrigin) -> Self {
        Self {
            url,
            depth: self.depth + 1,
            origin,
        }
    }
}
