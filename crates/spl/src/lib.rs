// SPDX-License-Identifier: MIT OR Apache-2.0
//! The capability-token policy language, end to end.
//!
//! If you only take one dependency, take this one. `spl-core`,
//! `spl-parser`, `spl-eval`, `spl-crypto`, and `spl-token` remain
//! available individually for hosts that only need, say, the parser for
//! static policy linting.
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use spl_core::{Bindings, CryptoHost, Request, SplError, Value, DEFAULT_MAX_GAS, MAX_DEPTH};
pub use spl_crypto::generate_keypair;
pub use spl_eval::eval_policy;
pub use spl_parser::parse;
pub use spl_token::{
    canonical_payload, create_presentation_signature, mint, verify, verify_token, MintError,
    MintOptions, Token, TokenInput, VerifyOptions, VerifyOutcome, TOKEN_VERSION,
};
