//! Caller-supplied acceptance policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Criteria a verified token must also meet.
///
/// Every field left at its zero value disables that check, with one
/// exception: a zero `score_threshold` means "use
/// [`DEFAULT_THRESHOLD`](crate::DEFAULT_THRESHOLD)", so a caller cannot ask
/// for a threshold of exactly zero. Score and action are only consulted
/// under [`ProtocolVersion::V3`](crate::ProtocolVersion::V3).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyOptions {
    pub score_threshold: f32,
    pub required_action: String,
    pub required_hostname: String,
    pub required_app_package_name: String,
    #[serde(with = "duration_secs")]
    pub max_response_age: Duration,
    pub caller_address: String,
}

impl PolicyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.required_action = action.into();
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.required_hostname = hostname.into();
        self
    }

    pub fn with_app_package_name(mut self, name: impl Into<String>) -> Self {
        self.required_app_package_name = name.into();
        self
    }

    pub fn with_max_response_age(mut self, age: Duration) -> Self {
        self.max_response_age = age;
        self
    }

    pub fn with_caller_address(mut self, addr: impl Into<String>) -> Self {
        self.caller_address = addr.into();
        self
    }

    /// The threshold a V3 score is compared against.
    pub fn effective_threshold(&self) -> f32 {
        if self.score_threshold != 0.0 {
            self.score_threshold
        } else {
            crate::DEFAULT_THRESHOLD
        }
    }

    pub fn caller_address(&self) -> Option<&str> {
        Some(self.caller_address.as_str()).filter(|addr| !addr.is_empty())
    }
}

/// Durations as fractional seconds in config files.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
