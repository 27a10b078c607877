use std::time::{Duration, Instant};

/// Cancellable, re-armable single-shot task used for debouncing.
///
/// Arming while already pending pushes the deadline out instead of queueing a
/// second run.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    due: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn arm(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }

    /// Consume the task if its deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
