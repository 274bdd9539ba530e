//! Wall-clock throttling for the expensive rebuild paths.
//!
//! Two of these run independently per session: one for the category-region
//! rebuild (tight), one for the background mesh outline (loose). Whether a
//! refresh is due is a pure function of (now, last refresh, interval), so
//! the decision logic is testable without a scheduler.

/// Remembers when an expensive recomputation last ran.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshTimer {
    last: f64,
}

impl RefreshTimer {
    /// True when more than `interval` seconds have passed since the last
    /// [`mark`](RefreshTimer::mark).
    pub fn due(&self, now: f64, interval: f64) -> bool {
        now - self.last > interval
    }

    pub fn mark(&mut self, now: f64) {
        self.last = now;
    }
}

/// An interval that tightens while the pointer is active.
#[derive(Clone, Copy, Debug)]
pub struct IntervalPair {
    pub active: f64,
    pub idle: f64,
}

impl IntervalPair {
    pub fn current(&self, pointer_active: bool) -> f64 {
        if pointer_active {
            self.active
        } else {
            self.idle
        }
    }
}
