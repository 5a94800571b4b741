//! Nullable clock — deterministic elapsed time for testing.

use chrono::{DateTime, Utc};
use siteverify_engine::Clock;
use std::sync::Mutex;
use std::time::Duration;

/// A deterministic clock for testing.
///
/// Reports the same elapsed time for every timestamp until told otherwise.
pub struct NullClock {
    elapsed: Mutex<Duration>,
}

impl NullClock {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed: Mutex::new(elapsed),
        }
    }

    /// Advance the reported elapsed time.
    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap();
        *elapsed += by;
    }

    /// Set the reported elapsed time to a specific value.
    pub fn set(&self, elapsed: Duration) {
        *self.elapsed.lock().unwrap() = elapsed;
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Clock for NullClock {
    fn since(&self, _t: DateTime<Utc>) -> Duration {
        *self.elapsed.lock().unwrap()
    }
}
