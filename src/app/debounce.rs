//! Debounced search input.
//!
//! Keystrokes update the input's own text at once; the canonical search term
//! only follows after [`SEARCH_DEBOUNCE`] without further typing. Time is
//! passed in by the caller so the timer can be driven deterministically.

use std::time::{Duration, Instant};

/// Quiet period before a typed search term is propagated.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A single pending value that fires once its deadline has passed.
///
/// Scheduling again replaces the pending value and restarts the delay.
#[derive(Debug, Clone)]
pub struct DebounceTimer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> DebounceTimer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Arms the timer with `value`, superseding anything pending.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Drops the pending value. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Takes the pending value if its deadline is at or before `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    #[must_use]
    pub fn pending_value(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, value)| value)
    }
}

/// The search box: local text plus the debounced propagation to the listing.
#[derive(Debug)]
pub struct SearchInput {
    text: String,
    timer: DebounceTimer<String>,
}

impl SearchInput {
    /// Creates an input showing `initial` (the canonical term at mount).
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self::with_delay(initial, SEARCH_DEBOUNCE)
    }

    #[must_use]
    pub fn with_delay(initial: &str, delay: Duration) -> Self {
        Self {
            text: initial.to_string(),
            timer: DebounceTimer::new(delay),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Records a keystroke's resulting text and restarts the quiet period.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.timer.schedule(self.text.clone(), now);
        tracing::trace!(text = %self.text, "search input scheduled");
    }

    /// Returns the term to propagate once the quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let term = self.timer.poll(now)?;
        tracing::debug!(term = %term, "search term settled");
        Some(term)
    }

    /// Empties the box and cancels pending propagation.
    ///
    /// Returns the empty term for the caller to propagate immediately.
    pub fn clear(&mut self) -> String {
        self.timer.cancel();
        self.text.clear();
        String::new()
    }

    /// Mirrors a term changed elsewhere (e.g. by clearing all filters).
    ///
    /// A pending propagation of a different value is cancelled so it cannot
    /// overwrite the external change.
    pub fn sync_external(&mut self, term: &str) {
        if self.timer.pending_value().is_some_and(|pending| pending != term) {
            tracing::debug!("cancelling pending search propagation");
            self.timer.cancel();
        }
        if self.text != term {
            self.text = term.to_string();
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Tears the input down; nothing pending fires afterwards.
    pub fn unmount(mut self) {
        self.timer.cancel();
    }
}

impl Drop for SearchInput {
    fn drop(&mut self) {
        if self.timer.cancel() {
            tracing::trace!("pending search propagation dropped");
        }
    }
}
