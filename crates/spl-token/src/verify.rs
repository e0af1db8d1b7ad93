// SPDX-License-Identifier: MIT OR Apache-2.0

//! The signature-checking entry point: `verify_token`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use spl_core::{Request, SplError};
use tracing::{debug, info, warn};

use crate::payload::canonical_payload;
use crate::types::{Token, TokenInput, VerifyOptions, VerifyOutcome};

/// Verify a token's signature, any proof-of-possession binding, and
/// evaluate its policy against `req`.
///
/// The pipeline short-circuits on the first failure. Expiry, signature,
/// and PoP failures are **envelope failures**: they never panic or return
/// `Err`, only `Ok(VerifyOutcome { allow: false, error: Some(..), .. })`.
/// A malformed policy or an evaluator fault (gas/depth/unknown operator)
/// is surfaced as `Err`, since it indicates an issuer bug or a hostile
/// input rather than a normal access-control decision.
///
/// # Errors
///
/// Returns `Err` if the token's policy fails to parse, or if evaluating it
/// exhausts gas, exceeds the depth cap, or hits an unknown operator.
pub fn verify_token(
    token: impl Into<TokenInput>,
    req: Request,
    options: &VerifyOptions,
) -> Result<VerifyOutcome, SplError> {
    let token = match token.into() {
        TokenInput::Parsed(t) => t,
        TokenInput::Json(json) => {
            serde_json::from_str::<Token>(&json).map_err(|e| SplError::Syntax(e.to_string()))?
        }
    };
    let sealed = token.sealed;

    let now = options
        .now
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    if let Some(expires) = &token.expires {
        let Some(exp) = parse_datetime(expires) else {
            debug!(expires = %expires, "invalid expires timestamp");
            return Ok(VerifyOutcome::deny(sealed, "invalid expires timestamp"));
        };
        let Some(current) = parse_datetime(&now) else {
            debug!(now = %now, "invalid expires timestamp");
            return Ok(VerifyOutcome::deny(sealed, "invalid expires timestamp"));
        };
        if current > exp {
            warn!(expires = %expires, "token expired");
            return Ok(VerifyOutcome::deny(sealed, "token expired"));
        }
    }

    let payload = canonical_payload(
        &token.policy,
        token.merkle_root.as_deref(),
        token.hash_chain_commitment.as_deref(),
        sealed,
        token.expires.as_deref(),
    );
    if !spl_crypto::verify_ed25519(&payload, &token.signature, &token.public_key) {
        debug!("invalid signature");
        return Ok(VerifyOutcome::deny(sealed, "invalid signature"));
    }

    if let Some(pop_key) = &token.pop_key {
        let Some(presentation_sig) = &options.presentation_signature else {
            debug!("PoP binding requires presentation signature");
            return Ok(VerifyOutcome::deny(sealed, "PoP binding requires presentation signature"));
        };
        let pop_payload = spl_crypto::sha256(&payload);
        if !spl_crypto::verify_ed25519(&pop_payload, presentation_sig, pop_key) {
            debug!("invalid presentation signature");
            return Ok(VerifyOutcome::deny(sealed, "invalid presentation signature"));
        }
    }

    let ast = spl_parser::parse(&token.policy)?;
    let bindings = options.bindings(req, now);
    let result = spl_eval::eval_policy(&ast, &bindings)?;

    let allow = result.truthy();
    info!(allow, sealed, "policy evaluated");
    Ok(VerifyOutcome::decided(allow, sealed))
}

/// Parse an ISO 8601 timestamp, defaulting to UTC when no offset is given.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mint::mint;
    use crate::types::MintOptions;
    use std::collections::BTreeMap;

    fn payments_policy() -> &'static str {
        r#"(and (= (get req "action") "payments.create") (<= (get req "amount") 100) (member (get req "recipient") allowed_recipients))"#
    }

    fn req_with(amount: i64, recipient: &str) -> Request {
        let mut req = Request::new();
        req.insert("action".into(), spl_core::Value::Str("payments.create".into()));
        req.insert("amount".into(), spl_core::Value::Int(amount));
        req.insert("recipient".into(), spl_core::Value::Str(recipient.into()));
        req
    }

    fn options_with_recipients() -> VerifyOptions {
        let mut vars = BTreeMap::new();
        vars.insert(
            "allowed_recipients".to_string(),
            spl_core::Value::List(vec![
                spl_core::Value::Str("niece@example.com".to_string()),
                spl_core::Value::Str("mom@example.com".to_string()),
            ]),
        );
        VerifyOptions {
            vars,
            ..VerifyOptions::default()
        }
    }

    #[test]
    fn happy_path_allows() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let token = mint(payments_policy(), &priv_hex, &MintOptions::default()).unwrap();
        let outcome = verify_token(token, req_with(50, "niece@example.com"), &options_with_recipients()).unwrap();
        assert!(outcome.allow);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn over_limit_denies() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let token = mint(payments_policy(), &priv_hex, &MintOptions::default()).unwrap();
        let outcome = verify_token(token, req_with(200, "niece@example.com"), &options_with_recipients()).unwrap();
        assert!(!outcome.allow);
    }

    #[test]
    fn recipient_not_in_set_denies() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let token = mint(payments_policy(), &priv_hex, &MintOptions::default()).unwrap();
        let outcome =
            verify_token(token, req_with(50, "stranger@example.com"), &options_with_recipients()).unwrap();
        assert!(!outcome.allow);
    }

    #[test]
    fn tampered_seal_bit_invalidates_signature() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let mut token = mint("(and #t)", &priv_hex, &MintOptions::default()).unwrap();
        token.sealed = true;
        let outcome = verify_token(token, Request::new(), &VerifyOptions::default()).unwrap();
        assert!(!outcome.allow);
        assert_eq!(outcome.error.as_deref(), Some("invalid signature"));
    }

    #[test]
    fn expired_token_is_denied_before_any_signature_check() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let token = mint(
            "(and #t)",
            &priv_hex,
            &MintOptions {
                expires: Some("2020-01-01T00:00:00Z".to_string()),
                ..MintOptions::default()
            },
        )
        .unwrap();
        let options = VerifyOptions {
            now: Some("2025-01-01T00:00:00Z".to_string()),
            ..VerifyOptions::default()
        };
        let outcome = verify_token(token, Request::new(), &options).unwrap();
        assert!(!outcome.allow);
        assert_eq!(outcome.error.as_deref(), Some("token expired"));
    }

    #[test]
    fn unexpired_token_proceeds_past_expiry_check() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let token = mint(
            "(and #t)",
            &priv_hex,
            &MintOptions {
                expires: Some("2030-01-01T00:00:00Z".to_string()),
                ..MintOptions::default()
            },
        )
        .unwrap();
        let options = VerifyOptions {
            now: Some("2025-01-01T00:00:00Z".to_string()),
            ..VerifyOptions::default()
        };
        let outcome = verify_token(token, Request::new(), &options).unwrap();
        assert!(outcome.allow);
    }

    #[test]
    fn pop_binding_requires_presentation_signature() {
        let (_, issuer_priv) = spl_crypto::generate_keypair();
        let (agent_pub, _agent_priv) = spl_crypto::generate_keypair();
        let token = mint(
            "(and #t)",
            &issuer_priv,
            &MintOptions {
                pop_key: Some(agent_pub),
                ..MintOptions::default()
            },
        )
        .unwrap();
        let outcome = verify_token(token, Request::new(), &VerifyOptions::default()).unwrap();
        assert!(!outcome.allow);
        assert_eq!(
            outcome.error.as_deref(),
            Some("PoP binding requires presentation signature")
        );
    }

    #[test]
    fn pop_binding_accepts_a_valid_presentation_signature() {
        let (_, issuer_priv) = spl_crypto::generate_keypair();
        let (agent_pub, agent_priv) = spl_crypto::generate_keypair();
        let token = mint(
            "(and #t)",
            &issuer_priv,
            &MintOptions {
                pop_key: Some(agent_pub),
                ..MintOptions::default()
            },
        )
        .unwrap();
        let presentation_sig = crate::presentation::create_presentation_signature(&token, &agent_priv).unwrap();
        let options = VerifyOptions {
            presentation_signature: Some(presentation_sig),
            ..VerifyOptions::default()
        };
        let outcome = verify_token(token, Request::new(), &options).unwrap();
        assert!(outcome.allow);
    }

    #[test]
    fn malformed_policy_surfaces_as_an_error_not_a_denial() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let token = mint(")", &priv_hex, &MintOptions::default()).unwrap();
        let err = verify_token(token, Request::new(), &VerifyOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "unexpected )");
    }

    #[test]
    fn json_string_input_is_parsed_before_verification() {
        let (_, priv_hex) = spl_crypto::generate_keypair();
        let token = mint("(and #t)", &priv_hex, &MintOptions::default()).unwrap();
        let json = serde_json::to_string(&token).unwrap();
        let outcome = verify_token(json, Request::new(), &VerifyOptions::default()).unwrap();
        assert!(outcome.allow);
    }
}
