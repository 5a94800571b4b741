//! The parsed response of the verification service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// What the verification service said about a token.
///
/// Unknown fields in the response are ignored. Absent optional fields take
/// their defaults: a zero score, no error codes, empty strings, and the Unix
/// epoch for the challenge timestamp.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
    #[serde(rename = "challenge_ts", default)]
    challenge_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hostname: Option<String>,
    #[serde(rename = "apk_package_name", default, skip_serializing_if = "Option::is_none")]
    app_package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    score: f32,
    #[serde(rename = "error-codes", default, skip_serializing_if = "Option::is_none")]
    error_codes: Option<Vec<String>>,
}

/// `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl VerificationResult {
    /// Parse a raw response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn challenge_timestamp(&self) -> DateTime<Utc> {
        self.challenge_timestamp
    }

    /// Hostname the challenge was solved on, empty when absent.
    pub fn hostname(&self) -> &str {
        self.hostname.as_deref().unwrap_or_default()
    }

    /// Android package the challenge was solved in, empty when absent.
    pub fn app_package_name(&self) -> &str {
        self.app_package_name.as_deref().unwrap_or_default()
    }

    /// V3 action name, empty when absent.
    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or_default()
    }

    /// V3 score in `[0, 1]`, zero when absent.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Error codes reported by the service, `None` when there are none.
    pub fn error_codes(&self) -> Option<&[String]> {
        self.error_codes
            .as_deref()
            .filter(|codes| !codes.is_empty())
    }
}
