//! Live status line
//!
//! A single line on stderr, overwritten in place, showing cumulative check
//! counts and the link most recently checked. Advisory only.

use crate::state::CounterSnapshot;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

/// Width the status line is padded to, so shorter lines erase longer ones
pub const STATUS_WIDTH: usize = 120;

/// Maximum characters of the current URL shown
pub const CURRENT_URL_WIDTH: usize = 80;

/// Draws the status line when enabled
#[derive(Debug, Default)]
pub struct Progress {
    enabled: bool,
    drawn: AtomicBool,
}

impl Progress {
    /// Creates a status line writer
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            drawn: AtomicBool::new(false),
        }
    }

    /// A writer that never draws
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Returns true if the line is drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Redraws the line with the latest counters
    pub fn update(&self, counters: &CounterSnapshot, current: &str) {
        if !self.enabled {
            return;
        }
        let line = status_line(counters, current);
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r{:<width$}", line, width = STATUS_WIDTH);
        let _ = stderr.flush();
        self.drawn.store(true, Ordering::Relaxed);
    }

    /// Ends the line so later output starts on a fresh one
    pub fn finish(&self) {
        if self.enabled && self.drawn.swap(false, Ordering::Relaxed) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr);
        }
    }
}

/// Formats the status line text
///
/// # Examples
///
/// ```
/// use deadlink::output::status_line;
/// use deadlink::state::CounterSnapshot;
///
/// let snap = CounterSnapshot { links_checked: 3, ok: 2, broken: 1, ..Default::default() };
/// assert_eq!(
///     status_line(&snap, "https://example.com/a"),
///     "Checked: 3 | OK: 2 | Broken: 1 | Current: https://example.com/a"
/// );
/// ```
pub fn status_line(counters: &CounterSnapshot, current: &str) -> String {
    format!(
        "Checked: {} | OK: {} | Broken: {} | Current: {}",
        counters.links_checked,
        counters.ok,
        counters.broken,
        truncate(current, CURRENT_URL_WIDTH)
    )
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_untouched() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("abcdef", 3), "abc");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééééé", 2), "éé");
    }

    #[test]
    fn test_status_line_bounds_current_url() {
        let long = format!("https://example.com/{}", "x".repeat(200));
        let line = status_line(&CounterSnapshot::default(), &long);
        let current = line.split("Current: ").nth(1).unwrap();
        assert_eq!(current.chars().count(), CURRENT_URL_WIDTH);
    }

    #[test]
    fn test_disabled_progress_is_silent() {
        let progress = Progress::disabled();
        assert!(!progress.is_enabled());
        progress.update(&CounterSnapshot::default(), "https://example.com/");
        progress.finish();
    }
}
