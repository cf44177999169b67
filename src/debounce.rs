//! Trailing-edge debouncing of analysis re-triggers
//!
//! Edits arrive in bursts (typing a target, dragging a split). The
//! [`Debouncer`] keeps only the latest request and releases it once the
//! input has been quiet for the whole window. Time is passed in by the
//! caller so the queue never sleeps or spawns.

use std::time::{Duration, Instant};

/// Coalescing queue of depth one
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Queue `request`, replacing anything pending and restarting the window
    pub fn submit(&mut self, request: T, now: Instant) {
        self.pending = Some((request, now));
    }

    /// Take the pending request once the window has elapsed since the last submit
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, submitted)) if now.saturating_duration_since(*submitted) >= self.window => {
                self.pending.take().map(|(request, _)| request)
            }
            _ => None,
        }
    }

    /// When the pending request becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, submitted)| *submitted + self.window)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending request
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(request, _)| request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(80);

    #[test]
    fn test_trailing_edge() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.submit(1, start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(79)), None);
        assert_eq!(debouncer.poll(start + WINDOW), Some(1));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + WINDOW * 2), None);
    }

    #[test]
    fn test_burst_coalesces_to_latest() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        for i in 0..5u32 {
            debouncer.submit(i, start + Duration::from_millis(20 * u64::from(i)));
        }
        // Window restarts at the last submit (80ms)
        assert_eq!(debouncer.poll(start + Duration::from_millis(120)), None);
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(160)));
        assert_eq!(debouncer.poll(start + Duration::from_millis(160)), Some(4));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.submit("a", start);
        assert_eq!(debouncer.cancel(), Some("a"));
        assert_eq!(debouncer.poll(start + WINDOW), None);
        assert_eq!(debouncer.deadline(), None);
    }
}
