use crate::url::NormalizedUrl;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of pages already fetched in this run
///
/// The set only grows. `mark_if_new` is an atomic check-and-mark, so the
/// at-most-once-fetch guarantee holds even with concurrent callers.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    seen: Mutex<HashSet<NormalizedUrl>>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and returns true the first time it is seen
    ///
    /// Every later call with the same normalized URL returns false.
    pub fn mark_if_new(&self, url: &NormalizedUrl) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(url) {
            return false;
        }
        seen.insert(url.clone())
    }

    /// Returns true if `url` has been marked
    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    /// Number of distinct pages marked
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been marked yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
