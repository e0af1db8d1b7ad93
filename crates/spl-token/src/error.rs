// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors `mint` can raise. `verify_token` never raises — see
//! [`crate::VerifyOutcome`] for how envelope failures are reported instead.

use thiserror::Error;

/// Failures minting a token.
#[derive(Debug, Error)]
pub enum MintError {
    /// `private_key_hex` did not decode to a 32-byte Ed25519 seed.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
}
