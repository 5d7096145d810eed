//! Fixed-delay recurring task driven by frame time.

use std::time::Duration;

/// A task that becomes due once every `delay` of accumulated frame time.
///
/// The delay restarts from the tick on which the task fires, so frame
/// time beyond the deadline is dropped rather than carried over, and the
/// task fires at most once per tick. The first run happens after one full
/// delay, not immediately.
#[derive(Debug, Clone)]
pub struct RecurringTask {
    delay: Duration,
    elapsed: Duration,
    runs: u64,
    cancelled: bool,
}

impl RecurringTask {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
            runs: 0,
            cancelled: false,
        }
    }

    /// Advance by one tick of `dt`. Returns true if the task is due on
    /// this tick. A cancelled task is never due.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.cancelled {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.delay {
            return false;
        }
        self.elapsed = Duration::ZERO;
        self.runs += 1;
        true
    }

    /// Stop the task for good.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of times the task has come due.
    pub fn runs(&self) -> u64 {
        self.runs
    }
}
