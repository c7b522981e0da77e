/// Coalesces bursts of triggers into one event after a quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: f64,
    last_trigger: Option<f64>,
}

impl Debouncer {
    /// `delay` is in seconds.
    pub fn new(delay: f64) -> Self {
        Self {
            delay: delay.max(0.0),
            last_trigger: None,
        }
    }

    pub fn trigger(&mut self, now: f64) {
        self.last_trigger = Some(now);
    }

    /// Seconds left before a pending trigger fires.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.last_trigger
            .map(|last| (last + self.delay - now).max(0.0))
    }

    /// Returns true exactly once per burst, when the quiet period has passed.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.last_trigger {
            Some(last) if now - last >= self.delay => {
                self.last_trigger = None;
                true
            }
            _ => false,
        }
    }
}
