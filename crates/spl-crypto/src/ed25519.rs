// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ed25519 keypair generation and signature verification.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Generate a fresh Ed25519 keypair.
///
/// Returns `(public_key_hex, private_key_hex)`, where the private key is the
/// 32-byte seed, matching the source SDK's key representation.
#[must_use]
pub fn generate_keypair() -> (String, String) {
    let signing_key = SigningKey::generate(&mut rand_core::OsRng);
    let public_hex = hex::encode(signing_key.verifying_key().to_bytes());
    let private_hex = hex::encode(signing_key.to_bytes());
    (public_hex, private_hex)
}

/// Sign `message` with the Ed25519 seed `private_key_hex` (32 bytes, hex).
///
/// # Errors
///
/// Returns an error string if `private_key_hex` does not decode to a
/// 32-byte seed.
pub fn sign(message: &[u8], private_key_hex: &str) -> Result<String, String> {
    let seed = decode_seed(private_key_hex)?;
    let signing_key = SigningKey::from_bytes(&seed);
    let signature = signing_key.sign(message);
    Ok(hex::encode(signature.to_bytes()))
}

/// Derive the Ed25519 public key (hex) for the seed `private_key_hex`.
///
/// # Errors
///
/// Returns an error string if `private_key_hex` does not decode to a
/// 32-byte seed.
pub fn public_key_for_seed(private_key_hex: &str) -> Result<String, String> {
    let seed = decode_seed(private_key_hex)?;
    let signing_key = SigningKey::from_bytes(&seed);
    Ok(hex::encode(signing_key.verifying_key().to_bytes()))
}

/// Verify an Ed25519 signature over `message`.
///
/// Never panics and never propagates a parse error: any malformed
/// `signature_hex` or `public_key_hex`, or a signature that does not
/// verify, simply yields `false`.
#[must_use]
pub fn verify_ed25519(message: &[u8], signature_hex: &str, public_key_hex: &str) -> bool {
    let Some(public_key) = decode_verifying_key(public_key_hex) else {
        return false;
    };
    let Some(signature) = decode_signature(signature_hex) else {
        return false;
    };
    public_key.verify(message, &signature).is_ok()
}

fn decode_seed(hex_str: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(hex_str).map_err(|e| e.to_string())?;
    bytes
        .try_into()
        .map_err(|_| "private key must be a 32-byte hex seed".to_string())
}

fn decode_verifying_key(hex_str: &str) -> Option<VerifyingKey> {
    let bytes: [u8; 32] = hex::decode(hex_str).ok()?.try_into().ok()?;
    VerifyingKey::from_bytes(&bytes).ok()
}

fn decode_signature(hex_str: &str) -> Option<Signature> {
    let bytes: [u8; 64] = hex::decode(hex_str).ok()?.try_into().ok()?;
    Some(Signature::from_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trips() {
        let (public_hex, private_hex) = generate_keypair();
        let message = b"mint this token";
        let sig = sign(message, &private_hex).unwrap();
        assert!(verify_ed25519(message, &sig, &public_hex));
    }

    #[test]
    fn tampered_message_fails_verification() {
        let (public_hex, private_hex) = generate_keypair();
        let sig = sign(b"original", &private_hex).unwrap();
        assert!(!verify_ed25519(b"tampered", &sig, &public_hex));
    }

    #[test]
    fn malformed_signature_hex_is_false_not_a_panic() {
        let (public_hex, _) = generate_keypair();
        assert!(!verify_ed25519(b"anything", "not-hex", &public_hex));
        assert!(!verify_ed25519(b"anything", "ab", &public_hex));
    }

    #[test]
    fn malformed_public_key_hex_is_false_not_a_panic() {
        let (_, private_hex) = generate_keypair();
        let sig = sign(b"anything", &private_hex).unwrap();
        assert!(!verify_ed25519(b"anything", &sig, "zz"));
    }

    #[test]
    fn public_key_for_seed_matches_generated_pair() {
        let (public_hex, private_hex) = generate_keypair();
        assert_eq!(public_key_for_seed(&private_hex).unwrap(), public_hex);
    }
}
