// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proof-of-possession presentation signatures: the agent holding a
//! `pop_key`-bound token signs `sha256(canonical_payload)` with its own
//! key to prove it, not merely a copier, is presenting the token.

use spl_crypto::sha256;

use crate::error::MintError;
use crate::payload::canonical_payload;
use crate::types::Token;

/// Create a presentation signature for `token`, to be supplied as
/// `VerifyOptions::presentation_signature` by whoever holds `token`.
///
/// # Errors
///
/// Returns [`MintError::InvalidPrivateKey`] if `agent_private_key_hex` does
/// not decode to a 32-byte Ed25519 seed.
pub fn create_presentation_signature(token: &Token, agent_private_key_hex: &str) -> Result<String, MintError> {
    let payload = canonical_payload(
        &token.policy,
        token.merkle_root.as_deref(),
        token.hash_chain_commitment.as_deref(),
        token.sealed,
        token.expires.as_deref(),
    );
    let pop_payload = sha256(&payload);
    spl_crypto::sign(&pop_payload, agent_private_key_hex).map_err(MintError::InvalidPrivateKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mint::mint;
    use crate::types::MintOptions;

    #[test]
    fn presentation_signature_verifies_against_the_agent_key() {
        let (_, issuer_priv) = spl_crypto::generate_keypair();
        let (agent_pub, agent_priv) = spl_crypto::generate_keypair();
        let token = mint(
            "(and #t)",
            &issuer_priv,
            &MintOptions {
                pop_key: Some(agent_pub.clone()),
                ..MintOptions::default()
            },
        )
        .unwrap();

        let presentation_sig = create_presentation_signature(&token, &agent_priv).unwrap();

        let payload = canonical_payload(
            &token.policy,
            token.merkle_root.as_deref(),
            token.hash_chain_commitment.as_deref(),
            token.sealed,
            token.expires.as_deref(),
        );
        let pop_payload = sha256(&payload);
        assert!(spl_crypto::verify_ed25519(&pop_payload, &presentation_sig, &agent_pub));
    }
}
