// SPDX-License-Identifier: MIT OR Apache-2.0

//! The signed capability-token envelope: canonical signing payload, mint,
//! proof-of-possession presentation signatures, and the two verification
//! entry points (`verify` for an already-trusted AST, `verify_token` for a
//! full signed envelope).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod mint;
mod payload;
mod presentation;
mod types;
mod verify;
mod verify_ast;

pub use error::MintError;
pub use mint::mint;
pub use payload::canonical_payload;
pub use presentation::create_presentation_signature;
pub use spl_crypto::generate_keypair;
pub use types::{MintOptions, Token, TokenInput, VerifyOptions, VerifyOutcome, TOKEN_VERSION};
pub use verify::verify_token;
pub use verify_ast::verify;
