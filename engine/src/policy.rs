//! Acceptance policy applied to a parsed verification result.
//!
//! Checks run in a fixed order and stop at the first failure, so the same
//! inputs always produce the same error message:
//!
//! 1. V3 only: action match, then score threshold.
//! 2. Remote error codes, regardless of the success flag.
//! 3. Success flag.
//! 4. Hostname match.
//! 5. App package match.
//! 6. Response age.

use siteverify_types::{PolicyOptions, ProtocolVersion, VerificationResult};

use crate::clock::Clock;
use crate::error::VerificationError;

/// Everything a single evaluation looks at besides the policy itself.
pub struct Verdict<'a> {
    pub result: &'a VerificationResult,
    /// The body `result` was parsed from, attached to every rejection.
    pub raw_body: &'a str,
    /// Whether the request carried a caller address.
    pub caller_address_sent: bool,
}

/// Accept or reject a verdict under `options`.
///
/// A pure function of its inputs plus the clock reading; no state is kept
/// between calls.
pub fn evaluate(
    verdict: &Verdict<'_>,
    options: &PolicyOptions,
    version: ProtocolVersion,
    clock: &dyn Clock,
) -> Result<(), VerificationError> {
    let result = verdict.result;
    let body = || verdict.raw_body.to_string();

    if version.checks_score() {
        if !options.required_action.is_empty() && options.required_action != result.action() {
            return Err(VerificationError::ActionMismatch {
                received: result.action().to_string(),
                expected: options.required_action.clone(),
                body: body(),
            });
        }

        // A threshold of exactly zero cannot be requested: it reads as unset.
        let threshold = options.effective_threshold();
        if threshold > result.score() {
            return Err(VerificationError::ScoreBelowMinimum {
                score: result.score(),
                threshold,
                body: body(),
            });
        }
    }

    if let Some(codes) = result.error_codes() {
        return Err(VerificationError::RemoteErrorCodes {
            codes: codes.to_vec(),
            body: body(),
        });
    }

    if !result.success() {
        return Err(VerificationError::InvalidSolution {
            caller_address_sent: verdict.caller_address_sent,
            body: body(),
        });
    }

    if !options.required_hostname.is_empty() && options.required_hostname != result.hostname() {
        return Err(VerificationError::HostnameMismatch {
            received: result.hostname().to_string(),
            expected: options.required_hostname.clone(),
            body: body(),
        });
    }

    if !options.required_app_package_name.is_empty()
        && options.required_app_package_name != result.app_package_name()
    {
        return Err(VerificationError::AppPackageMismatch {
            received: result.app_package_name().to_string(),
            expected: options.required_app_package_name.clone(),
            body: body(),
        });
    }

    if !options.max_response_age.is_zero() {
        let elapsed = clock.since(result.challenge_timestamp());
        if elapsed > options.max_response_age {
            return Err(VerificationError::ResponseTooSlow {
                elapsed,
                max: options.max_response_age,
                body: body(),
            });
        }
    }

    Ok(())
}
