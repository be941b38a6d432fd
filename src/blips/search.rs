// Debounced search input
//
// Keystrokes land in `pending`; only after the text has been quiet for the
// whole window does it move to `effective`, which is what the view filters
// on. The timer holds text only, never rows, so a late fire always filters
// whatever the collection looks like at that moment.

use std::time::{Duration, Instant};

/// Quiet period before a search takes effect
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    pending: String,
    effective: String,
    deadline: Option<Instant>,
    window: Duration,
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: String::new(),
            effective: String::new(),
            deadline: None,
            window,
        }
    }

    /// Record a keystroke; restarts the window rather than queueing another fire
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = text.into();
        self.deadline = Some(now + self.window);
    }

    /// When the pending text should be applied, if a fire is scheduled
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Apply the pending text if the window has elapsed.
    /// Returns true when the effective text changed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.effective == self.pending {
                    return false;
                }
                self.effective = self.pending.clone();
                true
            }
            _ => false,
        }
    }

    /// Text currently in the search box
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Text the view filters on
    pub fn effective(&self) -> &str {
        &self.effective
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}
