// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! # ruletree. Composable packrat grammars
//!
//! ruletree builds parsing expression grammars out of ordinary Rust values. Rules are
//! immutable, cheap to clone and safe to share between threads; they are combined with
//! functions from [`grammar`] and the `+` (sequence) and `|` (ordered choice) operators.
//!
//! Matching is packrat: the outcome of every capturing rule is cached by position for the
//! duration of a parse, so backtracking never matches the same capture twice.
//!
//! ```
//! use ruletree::grammar::{char, end, node};
//!
//! let digit = char(|c| c.is_ascii_digit());
//! let number = node("number", digit.one_or_more());
//! let list = &number + (node("comma", ',') + &number).zero_or_more() + end();
//!
//! let tree = list.parse_tree("1,22,333").unwrap();
//! let numbers: Vec<_> = tree
//!     .find_nodes(|n| n.name() == Some("number"))
//!     .map(|n| n.as_str())
//!     .collect();
//!
//! assert_eq!(numbers, vec!["1", "22", "333"]);
//! ```
//!
//! ## Capturing
//!
//! Only rules wrapped with [`grammar::node`] (or built by the functions in [`value`]) produce
//! nodes. Everything else matches silently and just advances the position.
//!
//! ## Values
//!
//! The [`value`] module turns captures into typed values that are computed once and kept in
//! the tree.
//!
//! ## Recursion
//!
//! Rules refer to each other either lazily, with [`grammar::func`], or through a
//! [`grammar::Recursive`] handle that is bound once the whole grammar has been built.
//!
//! ## Limits
//!
//! Pathological grammars can be stopped with a call limit, set per parse with
//! [`ParserConfig`] or for the whole process with [`set_call_limit`].
//!
//! [`grammar`]: grammar/index.html
//! [`grammar::node`]: grammar/fn.node.html
//! [`grammar::func`]: grammar/fn.func.html
//! [`grammar::Recursive`]: grammar/struct.Recursive.html
//! [`value`]: value/index.html
//! [`ParserConfig`]: struct.ParserConfig.html
//! [`set_call_limit`]: fn.set_call_limit.html

#![doc(html_root_url = "https://docs.rs/ruletree")]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub use crate::config::ParserConfig;
pub use crate::error::Error;
pub use crate::node::{Descendants, Node};
pub use crate::parser_state::{set_call_limit, ParseResult, ParserState};
pub use crate::rule::{Rule, RuleId};
pub use crate::value::{Value, ValueRule};

mod config;
mod error;
pub mod grammar;
#[doc(hidden)]
#[macro_use]
pub mod macros;
mod node;
mod parser_state;
mod rule;
pub mod value;
