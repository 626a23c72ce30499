// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use core::num::NonZeroUsize;

use crate::parser_state::global_call_limit;

/// Per-call settings for a [`ParserState`].
///
/// The default configuration memoizes capturing rules and takes its call limit from
/// [`set_call_limit`].
///
/// # Examples
///
/// ```
/// # use core::num::NonZeroUsize;
/// # use ruletree::ParserConfig;
/// let config = ParserConfig::new()
///     .memoize(false)
///     .call_limit(NonZeroUsize::new(10_000));
///
/// assert!(!config.memoize);
/// assert_eq!(config.call_limit.map(|limit| limit.get()), Some(10_000));
/// ```
///
/// [`ParserState`]: struct.ParserState.html
/// [`set_call_limit`]: fn.set_call_limit.html
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParserConfig {
    /// Cache the outcome of every capturing rule by `(rule, position)`.
    pub memoize: bool,
    /// Maximum number of rule applications, or `None` for no limit.
    pub call_limit: Option<NonZeroUsize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            memoize: true,
            call_limit: global_call_limit(),
        }
    }
}

impl ParserConfig {
    /// Same as `ParserConfig::default()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns the packrat cache on or off.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Overrides the process-wide call limit for this configuration.
    pub fn call_limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.call_limit = limit;
        self
    }
}
