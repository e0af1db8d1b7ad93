// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gas- and depth-bounded tree-walk evaluator for policy ASTs produced by
//! `spl-parser`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod eval;

pub use eval::eval_policy;
