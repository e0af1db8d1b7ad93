// SPDX-License-Identifier: MIT OR Apache-2.0
//! Benchmarks for the parse/eval/mint/verify hot paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spl_core::{Bindings, Request, Value};
use spl_token::{MintOptions, VerifyOptions};
use std::collections::BTreeMap;

fn payments_policy() -> &'static str {
    r#"(and (= (get req "action") "payments.create") (<= (get req "amount") 100) (member (get req "recipient") allowed_recipients))"#
}

fn req_with(amount: i64) -> Request {
    let mut req = BTreeMap::new();
    req.insert("action".into(), Value::Str("payments.create".into()));
    req.insert("amount".into(), Value::Int(amount));
    req.insert("recipient".into(), Value::Str("niece@example.com".into()));
    req
}

fn options_with_recipients() -> VerifyOptions {
    let mut vars = BTreeMap::new();
    vars.insert(
        "allowed_recipients".to_string(),
        Value::List(vec![Value::Str("niece@example.com".to_string())]),
    );
    VerifyOptions {
        vars,
        ..VerifyOptions::default()
    }
}

fn bindings_with_recipients(req: Request) -> Bindings {
    let mut vars = BTreeMap::new();
    vars.insert(
        "allowed_recipients".to_string(),
        Value::List(vec![Value::Str("niece@example.com".to_string())]),
    );
    vars.insert("now".to_string(), Value::Str("2025-01-01T00:00:00Z".to_string()));
    Bindings {
        req,
        vars,
        now: "2025-01-01T00:00:00Z".to_string(),
        ..Bindings::default()
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for depth in [1, 8, 32] {
        let src = format!("{}{}{}", "(and ".repeat(depth), "#t", ")".repeat(depth));
        group.bench_with_input(BenchmarkId::new("nested_and", depth), &src, |b, src| {
            b.iter(|| spl_parser::parse(black_box(src)).unwrap());
        });
    }
    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let ast = spl_parser::parse(payments_policy()).unwrap();
    let bindings = bindings_with_recipients(req_with(50));

    c.bench_function("eval_payments_policy", |b| {
        b.iter(|| spl_eval::eval_policy(black_box(&ast), black_box(&bindings)).unwrap());
    });
}

fn bench_mint(c: &mut Criterion) {
    let (_, priv_hex) = spl_crypto::generate_keypair();
    c.bench_function("mint", |b| {
        b.iter(|| spl_token::mint(black_box(payments_policy()), black_box(&priv_hex), &MintOptions::default()).unwrap());
    });
}

fn bench_verify_token(c: &mut Criterion) {
    let (_, priv_hex) = spl_crypto::generate_keypair();
    let token = spl_token::mint(payments_policy(), &priv_hex, &MintOptions::default()).unwrap();
    let options = options_with_recipients();

    c.bench_function("verify_token", |b| {
        b.iter(|| {
            spl_token::verify_token(
                black_box(token.clone()),
                black_box(req_with(50)),
                black_box(&options),
            )
            .unwrap()
        });
    });
}

criterion_group!(benches, bench_parse, bench_eval, bench_mint, bench_verify_token);
criterion_main!(benches);
