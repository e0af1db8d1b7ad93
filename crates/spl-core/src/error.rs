// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the parser and evaluator.
//!
//! Envelope failures (expiry, signature, PoP) are **not** represented here —
//! per the envelope's error handling design they are never thrown, only
//! returned as a diagnostic string alongside `allow: false`. See
//! `spl-token`'s `VerifyOutcome`.

use thiserror::Error;

/// Errors surfaced by parsing or evaluating a policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplError {
    /// Tokenizer or parser failure. The message matches the documented
    /// wording (`"unexpected )"`, `"extra tokens"`, `"unterminated ("`,
    /// `"unexpected EOF"`) so host logs and tests can match on it.
    #[error("{0}")]
    Syntax(String),

    /// The gas budget was exhausted before evaluation completed.
    #[error("gas budget exceeded")]
    GasExhausted,

    /// Evaluation nested past the hard depth cap.
    #[error("max nesting depth exceeded")]
    DepthExceeded,

    /// The first element of a non-empty list was not a recognized operator.
    #[error("Unknown op: {0}")]
    PolicyError(String),
}

impl SplError {
    /// Build a [`SplError::PolicyError`] for an unrecognized operator name.
    #[must_use]
    pub fn unknown_op(name: impl Into<String>) -> Self {
        SplError::PolicyError(name.into())
    }
}
