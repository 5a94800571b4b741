//! Protocol version selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Minimum score accepted under [`ProtocolVersion::V3`] when the caller
/// supplies no threshold of their own.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Which shape of verification response the engine expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    /// Pass/fail only. Score and action are ignored.
    #[default]
    V2,
    /// Adds a per-request score and action.
    V3,
}

impl ProtocolVersion {
    /// Whether score and action checks apply under this version.
    pub fn checks_score(&self) -> bool {
        matches!(self, Self::V3)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolVersion {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            other => Err(TypesError::UnknownVersion(other.to_string())),
        }
    }
}
