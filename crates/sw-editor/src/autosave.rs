//! Debounced autosave scheduling.
//!
//! Pure deadline arithmetic over host-supplied monotonic milliseconds; the
//! engine never reads a clock. Every mark pushes the deadline out by the
//! quiet period, so a burst of edits coalesces into a single save once the
//! author pauses.

/// Default quiet period before an autosave fires, milliseconds.
pub const DEFAULT_QUIET_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy)]
pub struct Autosave {
    quiet_ms: u64,
    deadline: Option<u64>,
}

impl Autosave {
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            deadline: None,
        }
    }

    /// Something changed at `now_ms`: (re)arm the deadline.
    pub fn mark(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.quiet_ms);
    }

    /// Whether the quiet period has elapsed with no further marks.
    pub fn due(&self, now_ms: u64) -> bool {
        self.deadline.is_some_and(|d| now_ms >= d)
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm, after a flush (explicit or scheduled).
    pub fn clear(&mut self) {
        self.deadline = None;
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_push_the_deadline_out() {
        let mut a = Autosave::new(100);
        a.mark(0);
        assert!(!a.due(99));
        a.mark(50); // keeps typing
        assert!(!a.due(100));
        assert!(a.due(150));
    }

    #[test]
    fn clear_disarms() {
        let mut a = Autosave::new(100);
        a.mark(0);
        a.clear();
        assert!(!a.due(10_000));
        assert!(!a.pending());
    }
}
