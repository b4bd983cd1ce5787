//! Coalescing of user interactions into activity touches.
//!
//! Every interaction re-arms a trailing deadline `delay` in the future.
//! When the deadline passes, a touch fires only if at least `min_gap` has
//! elapsed since the previous one; otherwise it is dropped.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct ActivityDebouncer {
    delay: Duration,
    min_gap: Duration,
    deadline: Option<DateTime<Utc>>,
    last_fired: Option<DateTime<Utc>>,
}

impl Default for ActivityDebouncer {
    fn default() -> Self {
        Self::new(Duration::seconds(5), Duration::seconds(10))
    }
}

impl ActivityDebouncer {
    pub fn new(delay: Duration, min_gap: Duration) -> Self {
        Self {
            delay,
            min_gap,
            deadline: None,
            last_fired: None,
        }
    }

    /// Records an interaction, pushing the deadline back.
    pub fn interact(&mut self, now: DateTime<Utc>) {
        self.deadline = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns `true` when a touch should be performed now.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                let due = self.last_fired.map_or(true, |last| now - last >= self.min_gap);
                if due {
                    self.last_fired = Some(now);
                }
                due
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn fires_after_trailing_delay() {
        let mut debouncer = ActivityDebouncer::default();
        debouncer.interact(t(0));
        assert!(!debouncer.poll(t(4)));
        assert!(debouncer.poll(t(5)));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn bursts_are_coalesced() {
        let mut debouncer = ActivityDebouncer::default();
        for s in 0..4 {
            debouncer.interact(t(s));
        }
        assert!(!debouncer.poll(t(7)));
        assert!(debouncer.poll(t(8)));
    }

    #[test]
    fn min_gap_drops_early_touch() {
        let mut debouncer = ActivityDebouncer::default();
        debouncer.interact(t(0));
        assert!(debouncer.poll(t(5)));
        debouncer.interact(t(6));
        // 11 - 5 = 6s since the last touch
        assert!(!debouncer.poll(t(11)));
        debouncer.interact(t(12));
        assert!(debouncer.poll(t(17)));
    }
}
