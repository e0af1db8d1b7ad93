// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hash-chain commitment verification: a preimage is hashed
//! `chain_length - index` times and compared to the commitment.

use crate::hash::sha256;

/// Verify a hash-chain receipt.
///
/// Never panics: a malformed `preimage_hex` fails the check rather than
/// erroring. An `index` past `chain_length` hashes zero times, comparing
/// the raw preimage bytes against the commitment.
#[must_use]
pub fn verify_hash_chain(commitment: &str, preimage_hex: &str, index: u32, chain_length: u32) -> bool {
    let Ok(mut current) = hex::decode(preimage_hex) else {
        return false;
    };
    let steps = chain_length.saturating_sub(index);
    for _ in 0..steps {
        current = sha256(&current).to_vec();
    }
    hex::encode(current) == commitment
}
