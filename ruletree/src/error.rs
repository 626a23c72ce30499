// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Types for different kinds of errors.

/// Errors raised while matching a grammar or reading typed values out of a parse tree.
///
/// `Rule::is_match` never returns an error; every other fallible operation in the crate
/// reports one of these variants.
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum Error {
    /// The root rule did not match the input.
    #[error("'{rule}' failed to match '{input}'")]
    Parse {
        /// Display form of the rule that failed
        rule: String,
        /// The complete input that was being parsed
        input: String,
    },
    /// The configured call limit stopped the parse before it could finish.
    #[error("call limit reached while matching '{rule}'")]
    CallLimitReached {
        /// Display form of the root rule
        rule: String,
    },
    /// A typed value could not be produced or found.
    #[error("{message}")]
    Evaluation {
        /// Short explanation
        message: String,
    },
    /// A parser state was requested at an offset that is not a character boundary of the input.
    #[error("position {position} is not a valid start in an input of length {len}")]
    InvalidPosition {
        /// The requested byte offset
        position: usize,
        /// Length of the input in bytes
        len: usize,
    },
    /// A regular expression rule was built from an invalid pattern.
    #[error("invalid regex `{pattern}`: {message}")]
    InvalidRegex {
        /// The pattern as written by the caller
        pattern: String,
        /// The message reported by the regex compiler
        message: String,
    },
    /// `Recursive::bind` was called on a handle that already has a target.
    #[error("recursive rule is already bound")]
    AlreadyBound,
}

impl Error {
    pub(crate) fn evaluation(message: impl Into<String>) -> Self {
        Error::Evaluation {
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised by the typed value overlay.
    pub fn is_evaluation(&self) -> bool {
        matches!(self, Error::Evaluation { .. })
    }
}
