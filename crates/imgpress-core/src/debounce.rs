//! Debounce logic for coalescing rapid quality changes.
//!
//! The debouncer is clock-agnostic: callers pass the current time in
//! milliseconds. Each `push` replaces the pending value and restarts the
//! quiescence window, so only the last value pushed within a window is ever
//! released.

#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    value: T,
    deadline_ms: u64,
}

/// Holds at most one pending value until its window has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Replace any pending value and restart the window at `now_ms`.
    pub fn push(&mut self, value: T, now_ms: u64) {
        self.pending = Some(Pending {
            value,
            deadline_ms: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Release the pending value if its window has elapsed by `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some(pending) if now_ms >= pending.deadline_ms => {
                self.pending.take().map(|pending| pending.value)
            }
            _ => None,
        }
    }

    /// When the pending value becomes due, if any.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|pending| pending.deadline_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }
}
