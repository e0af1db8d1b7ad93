// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the token envelope.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spl_core::{Bindings, CryptoHost, Request, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The current token format version this crate mints and accepts.
pub const TOKEN_VERSION: &str = "0.1.0";

/// A signed capability token.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Token {
    /// Token format version.
    pub version: String,
    /// Trimmed policy source, signed over verbatim.
    pub policy: String,
    /// Whether the token has been sealed against further attenuation.
    pub sealed: bool,
    /// Issuer's Ed25519 public key, hex-encoded.
    pub public_key: String,
    /// Ed25519 signature over the canonical payload, hex-encoded.
    pub signature: String,
    /// Optional Merkle root binding the token to an inclusion set.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub merkle_root: Option<String>,
    /// Optional hash-chain commitment.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hash_chain_commitment: Option<String>,
    /// Optional ISO 8601 expiry timestamp.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires: Option<String>,
    /// Optional proof-of-possession key the holder must sign presentations with.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pop_key: Option<String>,
}

/// A token as handed to `verify_token`: either an already-parsed [`Token`]
/// or a JSON string to parse first.
pub enum TokenInput {
    /// A token already deserialized by the caller.
    Parsed(Token),
    /// A token encoded as a JSON string.
    Json(String),
}

impl From<Token> for TokenInput {
    fn from(token: Token) -> Self {
        TokenInput::Parsed(token)
    }
}

impl From<String> for TokenInput {
    fn from(json: String) -> Self {
        TokenInput::Json(json)
    }
}

impl From<&str> for TokenInput {
    fn from(json: &str) -> Self {
        TokenInput::Json(json.to_string())
    }
}

/// Optional inputs to [`crate::mint`] beyond the policy source and issuer key.
#[derive(Debug, Clone, Default)]
pub struct MintOptions {
    /// Merkle root to bind the token to.
    pub merkle_root: Option<String>,
    /// Hash-chain commitment to bind the token to.
    pub hash_chain_commitment: Option<String>,
    /// Whether to seal the token against further attenuation.
    pub sealed: bool,
    /// ISO 8601 expiry timestamp.
    pub expires: Option<String>,
    /// Proof-of-possession key the holder must sign presentations with.
    pub pop_key: Option<String>,
}

/// Options for [`crate::verify_token`].
#[derive(Clone, Default)]
pub struct VerifyOptions {
    /// Host-provided free variables for policy evaluation.
    pub vars: BTreeMap<String, Value>,
    /// `(action, day) -> count` callback for `(per-day-count ...)`.
    pub per_day_count: Option<Arc<dyn Fn(&str, &str) -> i64 + Send + Sync>>,
    /// Crypto side-channel predicates.
    pub crypto: CryptoHost,
    /// Override the clock used for expiry and `(before now ...)`. Defaults
    /// to the system UTC time when absent.
    pub now: Option<String>,
    /// Presentation signature over `sha256(canonical_payload)`, required
    /// when the token carries a `pop_key`.
    pub presentation_signature: Option<String>,
    /// Evaluation gas budget override.
    pub max_gas: Option<u32>,
}

impl VerifyOptions {
    /// Build evaluation [`Bindings`] for `req` with the given resolved `now`.
    ///
    /// `vars["now"]` is seeded from `now` when the caller didn't already set
    /// it, so `(before now ...)` and the `now` symbol see the same clock
    /// `verify_token` used for expiry.
    pub(crate) fn bindings(&self, req: Request, now: String) -> Bindings {
        let mut vars = self.vars.clone();
        vars.entry("now".to_string()).or_insert_with(|| Value::Str(now.clone()));
        Bindings {
            req,
            vars,
            now,
            per_day_count: self.per_day_count.clone(),
            crypto: self.crypto.clone(),
            max_gas: self.max_gas.unwrap_or(spl_core::DEFAULT_MAX_GAS),
        }
    }
}

/// The result of [`crate::verify_token`]. Envelope failures never panic or
/// propagate as errors — they are represented here as `allow: false` with a
/// diagnostic `error`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Whether the request is allowed.
    pub allow: bool,
    /// The token's `sealed` flag, passed through unchanged.
    pub sealed: bool,
    /// A diagnostic when `allow` is false due to an envelope failure.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl VerifyOutcome {
    pub(crate) fn deny(sealed: bool, error: impl Into<String>) -> Self {
        Self {
            allow: false,
            sealed,
            error: Some(error.into()),
        }
    }

    pub(crate) fn decided(allow: bool, sealed: bool) -> Self {
        Self {
            allow,
            sealed,
            error: None,
        }
    }
}
