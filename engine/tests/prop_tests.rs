use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;
use siteverify_engine::{ErrorKind, PolicyOptions, ProtocolVersion, VerificationResult, Verdict};
use siteverify_nullables::NullClock;

fn verdict_for(body: &str) -> VerificationResult {
    VerificationResult::from_json(body).unwrap()
}

fn run(
    body: &str,
    options: &PolicyOptions,
    version: ProtocolVersion,
) -> Result<(), siteverify_engine::VerificationError> {
    let result = verdict_for(body);
    let verdict = Verdict {
        result: &result,
        raw_body: body,
        caller_address_sent: options.caller_address().is_some(),
    };
    let clock = NullClock::new(Duration::ZERO);
    siteverify_engine::evaluate(&verdict, options, version, &clock)
}

proptest! {
    /// Under V3 a differing action always rejects; under V2 it never matters.
    #[test]
    fn action_mismatch_only_under_v3(
        required in "[a-z]{1,12}",
        actual in "[a-z]{1,12}",
    ) {
        prop_assume!(required != actual);
        let body = json!({ "success": true, "action": actual, "score": 1.0 }).to_string();
        let opts = PolicyOptions::new().with_action(required);

        let v3 = run(&body, &opts, ProtocolVersion::V3);
        prop_assert_eq!(v3.unwrap_err().kind(), ErrorKind::ActionMismatch);
        prop_assert!(run(&body, &opts, ProtocolVersion::V2).is_ok());
    }

    /// Unset threshold: reject below 0.5, proceed at or above it.
    #[test]
    fn default_threshold_splits_at_half(score in 0.0f32..=1.0) {
        let body = json!({ "success": true, "score": score }).to_string();
        let outcome = run(&body, &PolicyOptions::new(), ProtocolVersion::V3);
        let parsed = verdict_for(&body).score();
        if parsed < 0.5 {
            prop_assert_eq!(outcome.unwrap_err().kind(), ErrorKind::ScoreBelowMinimum);
        } else {
            prop_assert!(outcome.is_ok());
        }
    }

    /// Explicit threshold: reject strictly below it, proceed otherwise.
    #[test]
    fn explicit_threshold_is_inclusive(score in 0.0f32..=1.0, threshold in 0.001f32..=1.0) {
        let body = json!({ "success": true, "score": score }).to_string();
        let opts = PolicyOptions::new().with_score_threshold(threshold);
        let outcome = run(&body, &opts, ProtocolVersion::V3);
        let parsed = verdict_for(&body).score();
        if parsed < threshold {
            prop_assert_eq!(outcome.unwrap_err().kind(), ErrorKind::ScoreBelowMinimum);
        } else {
            prop_assert!(outcome.is_ok());
        }
    }

    /// Remote error codes reject for any success flag and come back verbatim.
    #[test]
    fn error_codes_always_reject(
        success in any::<bool>(),
        codes in prop::collection::vec("[a-z-]{1,24}", 1..5),
    ) {
        let body = json!({ "success": success, "error-codes": codes }).to_string();
        let err = run(&body, &PolicyOptions::new(), ProtocolVersion::V2).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::RemoteErrorCodes);
        prop_assert_eq!(err.error_codes().unwrap(), codes.as_slice());
    }

    /// An unsuccessful verdict rejects the same way with or without a caller
    /// address; only the message differs.
    #[test]
    fn invalid_solution_independent_of_caller_address(addr in "[0-9]{1,3}(\\.[0-9]{1,3}){3}") {
        let body = json!({ "success": false }).to_string();
        let plain = run(&body, &PolicyOptions::new(), ProtocolVersion::V2).unwrap_err();
        let with_addr = run(
            &body,
            &PolicyOptions::new().with_caller_address(addr),
            ProtocolVersion::V2,
        )
        .unwrap_err();
        prop_assert_eq!(plain.kind(), with_addr.kind());
        prop_assert_ne!(plain.to_string(), with_addr.to_string());
    }
}
