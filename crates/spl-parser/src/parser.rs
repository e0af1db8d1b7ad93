// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recursive-descent parser producing a [`Value`] AST from a token stream.

use spl_core::{SplError, Value};

use crate::tokenizer::tokenize;

/// Parse a policy source string into an AST.
///
/// # Errors
///
/// Returns [`SplError::Syntax`] with one of the documented messages:
/// `"unexpected EOF"`, `"unexpected )"`, `"unterminated ("`, or
/// `"extra tokens"`.
pub fn parse(src: &str) -> Result<Value, SplError> {
    let tokens = tokenize(src.trim());
    if tokens.is_empty() {
        return Err(SplError::Syntax("unexpected EOF".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.parse_value()?;
    if parser.pos != parser.tokens.len() {
        return Err(SplError::Syntax("extra tokens".to_string()));
    }
    Ok(value)
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn parse_value(&mut self) -> Result<Value, SplError> {
        let tok = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| SplError::Syntax("unexpected EOF".to_string()))?
            .clone();
        self.pos += 1;

        if tok == "(" {
            let mut items = Vec::new();
            loop {
                match self.tokens.get(self.pos) {
                    None => return Err(SplError::Syntax("unterminated (".to_string())),
                    Some(t) if t == ")" => {
                        self.pos += 1;
                        break;
                    }
                    _ => items.push(self.parse_value()?),
                }
            }
            return Ok(Value::List(items));
        }
        if tok == ")" {
            return Err(SplError::Syntax("unexpected )".to_string()));
        }
        Ok(atom(&tok))
    }
}

/// Classify a single token as a boolean, number, quoted string, or bare
/// symbol. Symbols and quoted strings both produce [`Value::Str`]; nothing
/// downstream distinguishes them (see `spl-core::Value`).
fn atom(tok: &str) -> Value {
    if tok == "#t" {
        return Value::Bool(true);
    }
    if tok == "#f" {
        return Value::Bool(false);
    }

    let numeric = if tok.contains('.') {
        tok.parse::<f64>().ok().map(Value::Float)
    } else {
        let stripped = tok.trim_start_matches('-');
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
            tok.parse::<i64>().ok().map(Value::Int)
        } else {
            tok.parse::<f64>().ok().map(Value::Float)
        }
    };
    if let Some(v) = numeric {
        return v;
    }

    if tok.len() >= 2 && tok.starts_with('"') && tok.ends_with('"') {
        let inner = &tok[1..tok.len() - 1];
        return Value::Str(inner.replace("\\\"", "\""));
    }

    Value::Str(tok.to_string())
}
