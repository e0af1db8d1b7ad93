// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canonical signing payload: the byte string `mint` signs and
//! `verify_token` re-derives before checking the signature.

/// Build the canonical signing payload.
///
/// Five fields, NUL-joined in a fixed order: the trimmed policy source, the
/// Merkle root (or empty), the hash-chain commitment (or empty), the seal
/// bit (`"1"`/`"0"`), and the expiry (or empty). Covering the seal bit and
/// expiry here, not just the policy, keeps an attacker from stripping
/// either field after minting without invalidating the signature.
#[must_use]
pub fn canonical_payload(
    policy: &str,
    merkle_root: Option<&str>,
    hash_chain_commitment: Option<&str>,
    sealed: bool,
    expires: Option<&str>,
) -> Vec<u8> {
    let parts = [
        policy.trim(),
        merkle_root.unwrap_or(""),
        hash_chain_commitment.unwrap_or(""),
        if sealed { "1" } else { "0" },
        expires.unwrap_or(""),
    ];
    parts.join("\0").into_bytes()
}
