//! Time source used for the response-age check.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Measures how long ago a challenge was solved.
pub trait Clock: Send + Sync {
    /// Time elapsed since `t`. Never negative: a timestamp in the future
    /// yields zero.
    fn since(&self, t: DateTime<Utc>) -> Duration;
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn since(&self, t: DateTime<Utc>) -> Duration {
        (Utc::now() - t).to_std().unwrap_or(Duration::ZERO)
    }
}
