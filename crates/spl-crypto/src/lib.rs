// SPDX-License-Identifier: MIT OR Apache-2.0

//! The token envelope's crypto adapter: SHA-256, Ed25519 signing and
//! verification, Merkle inclusion proofs, and hash-chain commitments.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod ed25519;
mod hash;
mod merkle;

pub use chain::verify_hash_chain;
pub use ed25519::{generate_keypair, public_key_for_seed, sign, verify_ed25519};
pub use hash::{sha256, sha256_hex};
pub use merkle::{verify_merkle_proof, Position, ProofStep};
