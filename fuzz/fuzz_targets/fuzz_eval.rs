// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz the evaluator with parser-derived policy ASTs and a bounded gas
//! budget.
//!
//! Parses arbitrary source into an AST, then evaluates it against a
//! small set of `req`/`vars` bindings with `max_gas` itself derived from
//! the fuzzer input (including zero). Verifies evaluation always
//! terminates with either a `Value` or a well-formed `SplError`, never
//! a panic or an unbounded loop.
#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spl_core::{Bindings, Value};
use std::collections::BTreeMap;

#[derive(Debug, Arbitrary)]
struct EvalFuzzInput<'a> {
    policy_src: &'a str,
    max_gas: u32,
    amount: i64,
    recipient: &'a str,
}

fuzz_target!(|input: EvalFuzzInput| {
    let Ok(ast) = spl_parser::parse(input.policy_src) else {
        return;
    };

    let mut req = BTreeMap::new();
    req.insert("amount".to_string(), Value::Int(input.amount));
    req.insert("recipient".to_string(), Value::Str(input.recipient.to_string()));

    let mut vars = BTreeMap::new();
    vars.insert(
        "allowed_recipients".to_string(),
        Value::List(vec![Value::Str("niece@example.com".to_string())]),
    );

    let bindings = Bindings {
        req,
        vars,
        now: "2025-01-01T00:00:00Z".to_string(),
        max_gas: input.max_gas,
        ..Bindings::default()
    };

    // Must terminate regardless of gas budget (zero included) or nesting.
    let _ = spl_eval::eval_policy(&ast, &bindings);
});
