// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz `verify_token`'s JSON envelope deserialization and verification
//! pipeline end to end.
//!
//! Feeds arbitrary byte strings in as a token's JSON encoding, verifying
//! that deserialization failures, expiry/signature/PoP envelope
//! failures, and policy parse/eval failures all surface as documented
//! (`Err` for parser/evaluator faults, `Ok(VerifyOutcome)` otherwise)
//! without panicking.
#![no_main]
use libfuzzer_sys::fuzz_target;
use spl_core::Request;
use spl_token::VerifyOptions;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    match spl_token::verify_token(json, Request::new(), &VerifyOptions::default()) {
        Ok(outcome) => {
            let _ = serde_json::to_string(&outcome);
        }
        Err(e) => {
            let _ = e.to_string();
        }
    }
});
