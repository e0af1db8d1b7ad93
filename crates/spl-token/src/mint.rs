// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token minting.

use spl_crypto::sign;
use tracing::debug;

use crate::error::MintError;
use crate::payload::canonical_payload;
use crate::types::{MintOptions, Token, TOKEN_VERSION};

/// Mint a signed capability token over `policy`, using `private_key_hex`
/// (a 32-byte Ed25519 seed, hex-encoded) as the issuer key.
///
/// # Errors
///
/// Returns [`MintError::InvalidPrivateKey`] if `private_key_hex` does not
/// decode to a 32-byte seed.
pub fn mint(policy: &str, private_key_hex: &str, options: &MintOptions) -> Result<Token, MintError> {
    let public_key = spl_crypto::public_key_for_seed(private_key_hex)
        .map_err(MintError::InvalidPrivateKey)?;

    let payload = canonical_payload(
        policy,
        options.merkle_root.as_deref(),
        options.hash_chain_commitment.as_deref(),
        options.sealed,
        options.expires.as_deref(),
    );
    let signature = sign(&payload, private_key_hex).map_err(MintError::InvalidPrivateKey)?;

    debug!(sealed = options.sealed, has_pop_key = options.pop_key.is_some(), "minted token");

    Ok(Token {
        version: TOKEN_VERSION.to_string(),
        policy: policy.trim().to_string(),
        sealed: options.sealed,
        public_key,
        signature,
        merkle_root: options.merkle_root.clone(),
        hash_chain_commitment: options.hash_chain_commitment.clone(),
        expires: options.expires.clone(),
        pop_key: options.pop_key.clone(),
    })
}
