//! Fundamental types for challenge-token verification.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! the protocol version, the outbound verification request, the parsed
//! verification result, and the caller-supplied acceptance policy.

pub mod error;
pub mod options;
pub mod request;
pub mod result;
pub mod version;

pub use error::TypesError;
pub use options::PolicyOptions;
pub use request::VerificationRequest;
pub use result::VerificationResult;
pub use version::{ProtocolVersion, DEFAULT_THRESHOLD};

/// The fixed verification endpoint.
pub const VERIFY_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";
