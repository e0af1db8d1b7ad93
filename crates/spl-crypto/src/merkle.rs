// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merkle inclusion proof verification.

use crate::hash::sha256;

/// Which side of the running hash a proof step's sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Sibling is to the left: `sha256(sibling ‖ current)`.
    Left,
    /// Sibling is to the right: `sha256(current ‖ sibling)`.
    Right,
}

/// One step of a Merkle inclusion proof: a sibling hash and its position.
#[derive(Debug, Clone)]
pub struct ProofStep {
    /// Sibling hash, hex-encoded.
    pub hash: String,
    /// Which side the sibling sits on relative to the running hash.
    pub position: Position,
}

/// Verify that `leaf` is included in the tree committed to by `root_hex`.
///
/// Never panics: a malformed sibling hash in any step simply fails the
/// proof (returns `false`).
#[must_use]
pub fn verify_merkle_proof(leaf: &str, proof: &[ProofStep], root_hex: &str) -> bool {
    let mut current = sha256(leaf.as_bytes());
    for step in proof {
        let Ok(sibling) = hex::decode(&step.hash) else {
            return false;
        };
        current = match step.position {
            Position::Right => {
                let mut combined = current.to_vec();
                combined.extend_from_slice(&sibling);
                sha256(&combined)
            }
            Position::Left => {
                let mut combined = sibling;
                combined.extend_from_slice(&current);
                sha256(&combined)
            }
        };
    }
    hex::encode(current) == root_hex
}
