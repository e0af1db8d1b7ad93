// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared types for the capability-token policy language: the AST/runtime
//! `Value`, the evaluation `Bindings` a host supplies, and the error
//! taxonomy parsing and evaluation surface.
//!
//! This crate has no knowledge of S-expression syntax (see `spl-parser`),
//! tree-walk evaluation (see `spl-eval`), or token envelopes (see
//! `spl-token`) — it only defines the vocabulary those crates share.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bindings;
mod error;
mod value;

pub use bindings::{Bindings, CryptoHost, Request, DEFAULT_MAX_GAS, MAX_DEPTH};
pub use error::SplError;
pub use value::Value;
