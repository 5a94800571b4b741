//! Challenge-token verification engine.
//!
//! A token is posted to the verification service, the JSON reply is parsed,
//! and the caller's acceptance policy is applied to it. The network call and
//! the wall clock are both injected capabilities so the policy logic can be
//! exercised deterministically:
//!
//! - [`FormPoster`] sends the form-encoded request ([`HttpFormPoster`] in production).
//! - [`Clock`] measures how long ago a challenge was solved ([`SystemClock`] in production).
//!
//! Every failure is returned as a [`VerificationError`]; nothing in here panics
//! or retries.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod transport;

pub use clock::{Clock, SystemClock};
pub use config::EngineConfig;
pub use engine::VerifyEngine;
pub use error::{ConfigError, ErrorKind, TransportError, VerificationError};
pub use policy::{evaluate, Verdict};
pub use transport::{FormPoster, HttpFormPoster, ResponseBody};

pub use siteverify_types::{
    PolicyOptions, ProtocolVersion, VerificationRequest, VerificationResult, DEFAULT_THRESHOLD,
    VERIFY_ENDPOINT,
};
