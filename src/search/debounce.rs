//! Keystroke debouncing for the search box.
//!
//! Time is passed in by the caller in milliseconds (`performance.now()` in
//! the browser), which keeps the debouncer free of timers and testable.

/// Quiet period before a query is fired
pub const SEARCH_DEBOUNCE_MS: f64 = 500.0;

/// Fires the latest non-empty text once input has been quiet for the delay,
/// skipping text identical to the previously fired query.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay_ms: f64,
    pending: Option<(String, f64)>,
    last_fired: Option<String>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE_MS)
    }
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            pending: None,
            last_fired: None,
        }
    }

    /// Record a keystroke. Empty text is dropped without touching the timer.
    pub fn input(&mut self, text: &str, now_ms: f64) {
        if text.is_empty() {
            return;
        }
        self.pending = Some((text.to_string(), now_ms));
    }

    /// Time at which [`poll`](Self::poll) may next fire, if anything is pending
    #[must_use]
    pub fn deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|(_, at)| at + self.delay_ms)
    }

    /// Fire the pending text if the quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        let ready = self
            .deadline()
            .is_some_and(|deadline| now_ms >= deadline);
        if !ready {
            return None;
        }
        let (text, _) = self.pending.take()?;
        if self.last_fired.as_deref() == Some(text.as_str()) {
            log::debug!("search query {text:?} unchanged, not firing");
            return None;
        }
        self.last_fired = Some(text.clone());
        Some(text)
    }

    /// Drop any pending text and forget the last fired query.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_fired = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_period() {
        let mut d = SearchDebouncer::default();
        d.input("c", 0.0);
        d.input("ca", 100.0);
        d.input("cat", 200.0);
        assert_eq!(d.poll(600.0), None);
        assert_eq!(d.poll(700.0).as_deref(), Some("cat"));
        assert_eq!(d.poll(800.0), None);
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let mut d = SearchDebouncer::default();
        d.input("", 0.0);
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(10_000.0), None);
    }

    #[test]
    fn test_distinct_until_changed() {
        let mut d = SearchDebouncer::default();
        d.input("dog", 0.0);
        assert_eq!(d.poll(500.0).as_deref(), Some("dog"));
        d.input("dogs", 600.0);
        d.input("dog", 700.0);
        assert_eq!(d.poll(1_200.0), None);
        d.input("cat", 1_300.0);
        assert_eq!(d.poll(1_800.0).as_deref(), Some("cat"));
    }

    #[test]
    fn test_reset_forgets_last_query() {
        let mut d = SearchDebouncer::new(0.0);
        d.input("dog", 0.0);
        assert!(d.poll(0.0).is_some());
        d.reset();
        d.input("dog", 1.0);
        assert_eq!(d.poll(1.0).as_deref(), Some("dog"));
    }
}
