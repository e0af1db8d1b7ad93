// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree-walk evaluation with gas metering and a hard recursion-depth cap.

use spl_core::{Bindings, SplError, Value, MAX_DEPTH};

struct EvalState {
    gas: i64,
    depth: u32,
}

/// Evaluate `ast` against `bindings`.
///
/// # Errors
///
/// Returns [`SplError::GasExhausted`] if the gas budget is exhausted,
/// [`SplError::DepthExceeded`] if nesting exceeds the hard cap, or
/// [`SplError::PolicyError`] for an unrecognized operator symbol.
pub fn eval_policy(ast: &Value, bindings: &Bindings) -> Result<Value, SplError> {
    let mut state = EvalState {
        gas: i64::from(bindings.max_gas),
        depth: 0,
    };
    eval(ast, bindings, &mut state)
}

/// Decrement gas and track depth around one recursive evaluation step, then
/// dispatch. Both counters are adjusted on every exit path, mirroring the
/// source evaluator's `try`/`finally` structure.
fn eval(node: &Value, bindings: &Bindings, state: &mut EvalState) -> Result<Value, SplError> {
    state.gas -= 1;
    if state.gas < 0 {
        return Err(SplError::GasExhausted);
    }
    state.depth += 1;
    if state.depth > MAX_DEPTH {
        state.depth -= 1;
        return Err(SplError::DepthExceeded);
    }
    let result = eval_inner(node, bindings, state);
    state.depth -= 1;
    result
}

fn eval_inner(node: &Value, bindings: &Bindings, state: &mut EvalState) -> Result<Value, SplError> {
    let items = match node {
        Value::List(items) => items,
        other => return Ok(resolve_symbol(other, bindings)),
    };
    if items.is_empty() {
        return Ok(Value::Null);
    }
    let args = &items[1..];
    let op = match items[0].as_str() {
        Some(s) => s,
        None => return Err(SplError::unknown_op(items[0].to_text())),
    };

    match op {
        "and" => {
            for a in args {
                if !eval(a, bindings, state)?.truthy() {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        "or" => {
            for a in args {
                if eval(a, bindings, state)?.truthy() {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        "not" => {
            let v = eval(arg(args, 0)?, bindings, state)?;
            Ok(Value::Bool(!v.truthy()))
        }
        "=" => {
            let a = eval(arg(args, 0)?, bindings, state)?;
            let b = eval(arg(args, 1)?, bindings, state)?;
            Ok(Value::Bool(a == b))
        }
        "<=" | "<" | ">=" | ">" => {
            let a = eval(arg(args, 0)?, bindings, state)?.to_float();
            let b = eval(arg(args, 1)?, bindings, state)?.to_float();
            let result = match op {
                "<=" => a <= b,
                "<" => a < b,
                ">=" => a >= b,
                _ => a > b,
            };
            Ok(Value::Bool(result))
        }
        "member" | "in" => {
            let val = eval(arg(args, 0)?, bindings, state)?;
            let lst = eval(arg(args, 1)?, bindings, state)?;
            Ok(Value::Bool(match lst.as_list() {
                Some(items) => items.contains(&val),
                None => false,
            }))
        }
        "subset?" => {
            let a = eval(arg(args, 0)?, bindings, state)?;
            let b = eval(arg(args, 1)?, bindings, state)?;
            let result = match (a.as_list(), b.as_list()) {
                (Some(a_items), Some(b_items)) => a_items.iter().all(|item| b_items.contains(item)),
                _ => false,
            };
            Ok(Value::Bool(result))
        }
        "before" => {
            let a = eval(arg(args, 0)?, bindings, state)?;
            let b = eval(arg(args, 1)?, bindings, state)?;
            Ok(Value::Bool(a.to_text() < b.to_text()))
        }
        "get" => {
            let key = eval(arg(args, 1)?, bindings, state)?;
            Ok(get(arg(args, 0)?, &key, bindings))
        }
        "tuple" => {
            let mut values = Vec::with_capacity(args.len());
            for a in args {
                values.push(eval(a, bindings, state)?);
            }
            Ok(Value::List(values))
        }
        "per-day-count" => {
            let action = eval(arg(args, 0)?, bindings, state)?.to_text();
            let day = eval(arg(args, 1)?, bindings, state)?.to_text();
            Ok(Value::Int(bindings.per_day_count(&action, &day)))
        }
        "dpop_ok?" => Ok(Value::Bool(bindings.crypto.dpop_ok())),
        "merkle_ok?" => {
            let mut evaluated = Vec::with_capacity(args.len());
            for a in args {
                evaluated.push(eval(a, bindings, state)?);
            }
            Ok(Value::Bool(bindings.crypto.merkle_ok(&evaluated)))
        }
        "vrf_ok?" => {
            let day = eval(arg(args, 0)?, bindings, state)?.to_text();
            let amount = eval(arg(args, 1)?, bindings, state)?.to_float();
            Ok(Value::Bool(bindings.crypto.vrf_ok(&day, amount)))
        }
        "thresh_ok?" => Ok(Value::Bool(bindings.crypto.thresh_ok())),
        other => Err(SplError::unknown_op(other)),
    }
}

/// Fetch argument `idx`, or fail with the same "unknown op"-flavored error
/// the source raises on a malformed arity (an `IndexError` there has no
/// dedicated variant here; a short-arity form is as malformed as an unknown
/// operator and callers should not see it in well-formed policies).
fn arg<'a>(args: &'a [Value], idx: usize) -> Result<&'a Value, SplError> {
    args.get(idx)
        .ok_or_else(|| SplError::Syntax(format!("missing argument {idx}")))
}

/// `(get obj key)`: `obj` must be a bare name, resolved directly against
/// `req` or `vars` rather than recursively evaluated. `req` is the only
/// binding that is itself a mapping; any other name resolves to a scalar
/// [`Value`] (never a further mapping), so `get` on it is always null.
fn get(obj: &Value, key: &Value, bindings: &spl_core::Bindings) -> Value {
    let (Some(name), Some(key)) = (obj.as_str(), key.as_str()) else {
        return Value::Null;
    };
    if name == "req" {
        return bindings.req.get(key).cloned().unwrap_or(Value::Null);
    }
    Value::Null
}

/// Resolve a non-list AST node to its runtime value.
fn resolve_symbol(node: &Value, bindings: &Bindings) -> Value {
    let Value::Str(name) = node else {
        return node.clone();
    };
    match name.as_str() {
        "#t" => Value::Bool(true),
        "#f" => Value::Bool(false),
        // The request mapping itself, not a lookup into it; always truthy,
        // even when `req` is empty (matches `ctx.get("req", {})`, which
        // `_truthy()` treats as truthy). `(get req key)` is the only path
        // that reads actual fields off it.
        "req" => Value::Bool(true),
        "now" => bindings.vars.get("now").cloned().unwrap_or_else(|| node.clone()),
        other => bindings.vars.get(other).cloned().unwrap_or_else(|| node.clone()),
    }
}
