// SPDX-License-Identifier: MIT OR Apache-2.0

//! `verify`: evaluate an already-parsed, already-trusted policy AST.
//!
//! Unlike [`crate::verify_token`], this path never touches a signature —
//! it's for callers that parsed and authenticated a policy some other way
//! (e.g. it was embedded directly in their own config) and just need the
//! evaluation step.

use spl_core::{Request, SplError, Value};

use crate::types::{VerifyOptions, VerifyOutcome};

/// Evaluate `ast` against `req` and `options`, without any signature
/// checking. The returned `sealed` is always `false`: sealing is a
/// property of a signed token envelope, not of a bare AST.
///
/// # Errors
///
/// Returns `Err` if evaluation exhausts gas, exceeds the depth cap, or
/// hits an unknown operator.
pub fn verify(ast: &Value, req: Request, options: &VerifyOptions) -> Result<VerifyOutcome, SplError> {
    let now = options
        .now
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
    let bindings = options.bindings(req, now);
    let result = spl_eval::eval_policy(ast, &bindings)?;
    Ok(VerifyOutcome::decided(result.truthy(), false))
}
