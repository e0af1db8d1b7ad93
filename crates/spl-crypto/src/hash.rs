// SPDX-License-Identifier: MIT OR Apache-2.0

//! SHA-256 hashing primitives shared by the Merkle and hash-chain verifiers.

use sha2::{Digest, Sha256};

/// SHA-256 digest of `data`.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 digest of `data`, hex-encoded.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_of_empty_string_is_the_well_known_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hex_encoding_matches_raw_digest() {
        assert_eq!(sha256_hex(b"hello"), hex::encode(sha256(b"hello")));
    }

    #[test]
    fn different_inputs_hash_differently() {
        assert_ne!(sha256(b"a"), sha256(b"b"));
    }
}
