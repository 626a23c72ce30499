// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::collections::HashMap;
use std::mem;
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;
use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};

use crate::config::ParserConfig;
use crate::error::Error;
use crate::node::Node;
use crate::rule::{Rule, RuleId};

/// Type alias to simplify specifying the return value of chained closures.
///
/// Both arms carry the state: a failed attempt hands the state back so the caller can try
/// something else from the restored position.
pub type ParseResult<S> = Result<S, S>;

static CALL_LIMIT: AtomicUsize = AtomicUsize::new(0);

/// Sets the maximum call limit for every parser state created afterwards with a default
/// [`ParserConfig`], to prevent stack overflows or excessive execution times in some
/// grammars.
/// If set, the calls are tracked as a running total over all rule applications of one parse.
///
/// # Arguments
///
/// * `limit` - The maximum number of calls. If None,
///             the number of calls is unlimited.
///
/// [`ParserConfig`]: struct.ParserConfig.html
pub fn set_call_limit(limit: Option<NonZeroUsize>) {
    CALL_LIMIT.store(limit.map(|f| f.get()).unwrap_or(0), Ordering::Relaxed);
}

pub(crate) fn global_call_limit() -> Option<NonZeroUsize> {
    NonZeroUsize::new(CALL_LIMIT.load(Ordering::Relaxed))
}

#[derive(Debug)]
struct CallLimitTracker {
    current_call_limit: Option<(usize, usize)>,
    refused: bool,
}

impl CallLimitTracker {
    fn new(limit: Option<NonZeroUsize>) -> Self {
        Self {
            current_call_limit: limit.map(|limit| (0, limit.get())),
            refused: false,
        }
    }

    fn limit_reached(&self) -> bool {
        self.current_call_limit
            .map_or(false, |(current, limit)| current >= limit)
    }

    fn increment_depth(&mut self) {
        if let Some((current, _)) = &mut self.current_call_limit {
            *current += 1;
        }
    }
}

type MemoKey = (RuleId, usize);

#[derive(Debug)]
enum Memo<'i> {
    Matched(Node<'i>),
    Failed,
}

/// The complete state of one `is_match` or `parse_tree` call.
///
/// The state is threaded by value through every matching primitive. Each primitive returns
/// `Ok` with the advanced state when it matches and `Err` with the restored state otherwise,
/// which makes backtracking a matter of handing the `Err` state to the next alternative.
#[derive(Debug)]
pub struct ParserState<'i> {
    input: &'i str,
    position: usize,
    nodes: Vec<Node<'i>>,
    memo: HashMap<MemoKey, Memo<'i>>,
    memoize: bool,
    call_tracker: CallLimitTracker,
}

impl<'i> ParserState<'i> {
    /// Allocates a fresh `ParserState` at the start of `input` with the default
    /// [`ParserConfig`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// let state = ParserState::new("abc");
    /// assert_eq!(state.position(), 0);
    /// ```
    ///
    /// [`ParserConfig`]: struct.ParserConfig.html
    pub fn new(input: &'i str) -> Box<Self> {
        Self::with_config(input, &ParserConfig::default())
    }

    /// Allocates a fresh `ParserState` at the start of `input`.
    pub fn with_config(input: &'i str, config: &ParserConfig) -> Box<Self> {
        Box::new(ParserState {
            input,
            position: 0,
            nodes: vec![],
            memo: HashMap::new(),
            memoize: config.memoize,
            call_tracker: CallLimitTracker::new(config.call_limit),
        })
    }

    /// Allocates a fresh `ParserState` starting at byte offset `position`.
    ///
    /// Fails with `Error::InvalidPosition` when `position` is past the end of the input or
    /// inside a multi-byte character.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// let state = ParserState::new_at("abc", 2).unwrap();
    /// assert_eq!(state.position(), 2);
    ///
    /// assert!(ParserState::new_at("abc", 4).is_err());
    /// assert!(ParserState::new_at("ß", 1).is_err());
    /// ```
    pub fn new_at(input: &'i str, position: usize) -> Result<Box<Self>, Error> {
        Self::new_at_with(input, position, &ParserConfig::default())
    }

    /// Allocates a fresh `ParserState` starting at byte offset `position` with the given
    /// [`ParserConfig`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::{ParserConfig, ParserState};
    /// let config = ParserConfig::default().memoize(false);
    /// let state = ParserState::new_at_with("abc", 1, &config).unwrap();
    /// assert_eq!(state.position(), 1);
    /// ```
    ///
    /// [`ParserConfig`]: struct.ParserConfig.html
    pub fn new_at_with(
        input: &'i str,
        position: usize,
        config: &ParserConfig,
    ) -> Result<Box<Self>, Error> {
        if !input.is_char_boundary(position) {
            return Err(Error::InvalidPosition {
                position,
                len: input.len(),
            });
        }

        let mut state = Self::with_config(input, config);
        state.position = position;
        Ok(state)
    }

    /// Returns the complete input of the parse.
    #[inline]
    pub fn input(&self) -> &'i str {
        self.input
    }

    /// Returns the current byte offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the nodes captured so far at the active nesting level.
    #[inline]
    pub fn nodes(&self) -> &[Node<'i>] {
        &self.nodes
    }

    /// Consumes the state and returns the nodes captured at the top level.
    pub fn into_nodes(self: Box<Self>) -> Vec<Node<'i>> {
        self.nodes
    }

    /// Returns `true` once the call limit stopped this parse, i.e. a rule application was
    /// refused because the limit had been used up.
    #[inline]
    pub fn reached_call_limit(&self) -> bool {
        self.call_tracker.refused
    }

    #[inline]
    pub(crate) fn inc_call_check_limit(mut self: Box<Self>) -> ParseResult<Box<Self>> {
        if self.call_tracker.limit_reached() {
            self.call_tracker.refused = true;
            return Err(self);
        }
        self.call_tracker.increment_depth();
        Ok(self)
    }

    /// Runs `f` and, if it fails, restores the position and the captured nodes to what they
    /// were before the call.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// let state = ParserState::new("ab");
    /// let result = state.sequence(|s| s.match_string("a").and_then(|s| s.match_string("c")));
    ///
    /// assert_eq!(result.unwrap_err().position(), 0);
    /// ```
    #[inline]
    pub fn sequence<F>(self: Box<Self>, f: F) -> ParseResult<Box<Self>>
    where
        F: FnOnce(Box<Self>) -> ParseResult<Box<Self>>,
    {
        let node_index = self.nodes.len();
        let initial_pos = self.position;

        match f(self) {
            Ok(new_state) => Ok(new_state),
            Err(mut new_state) => {
                // Restore the initial position and drop anything captured by the attempt.
                new_state.position = initial_pos;
                new_state.nodes.truncate(node_index);
                Err(new_state)
            }
        }
    }

    /// Alias of [`sequence`] for call sites that only care about the restoring behaviour,
    /// such as the alternatives of an ordered choice.
    ///
    /// [`sequence`]: #method.sequence
    #[inline]
    pub fn restore_on_err<F>(self: Box<Self>, f: F) -> ParseResult<Box<Self>>
    where
        F: FnOnce(Box<Self>) -> ParseResult<Box<Self>>,
    {
        self.sequence(f)
    }

    /// Repeatedly applies `f` until it fails and always returns `Ok`.
    ///
    /// An iteration that succeeds without consuming input stops the loop, so that a repeated
    /// rule which can match the empty string terminates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// let state = ParserState::new("aab");
    /// let state = state.repeat(|s| s.match_string("a")).unwrap();
    /// assert_eq!(state.position(), 2);
    ///
    /// let state = ParserState::new("aab");
    /// let state = state.repeat(|s| s.match_string("")).unwrap();
    /// assert_eq!(state.position(), 0);
    /// ```
    #[inline]
    pub fn repeat<F>(mut self: Box<Self>, mut f: F) -> ParseResult<Box<Self>>
    where
        F: FnMut(Box<Self>) -> ParseResult<Box<Self>>,
    {
        loop {
            let initial_pos = self.position;

            match f(self) {
                Ok(state) if state.position == initial_pos => return Ok(state),
                Ok(state) => self = state,
                Err(state) => return Ok(state),
            }
        }
    }

    /// Optionally applies `f`. Returns `Ok` regardless of the outcome of `f`.
    #[inline]
    pub fn optional<F>(self: Box<Self>, f: F) -> ParseResult<Box<Self>>
    where
        F: FnOnce(Box<Self>) -> ParseResult<Box<Self>>,
    {
        match self.restore_on_err(f) {
            Ok(state) | Err(state) => Ok(state),
        }
    }

    /// Applies `f` as a zero-width predicate. The position and the captured nodes are always
    /// restored; the result is `Ok` when the outcome of `f` agrees with `is_positive`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// let state = ParserState::new("a");
    /// let state = state.lookahead(true, |s| s.match_string("a")).unwrap();
    /// assert_eq!(state.position(), 0);
    ///
    /// let result = state.lookahead(false, |s| s.match_string("a"));
    /// assert!(result.is_err());
    /// ```
    #[inline]
    pub fn lookahead<F>(self: Box<Self>, is_positive: bool, f: F) -> ParseResult<Box<Self>>
    where
        F: FnOnce(Box<Self>) -> ParseResult<Box<Self>>,
    {
        let node_index = self.nodes.len();
        let initial_pos = self.position;

        let (matched, mut state) = match f(self) {
            Ok(state) => (true, state),
            Err(state) => (false, state),
        };

        state.position = initial_pos;
        state.nodes.truncate(node_index);

        if matched == is_positive {
            Ok(state)
        } else {
            Err(state)
        }
    }

    /// Runs `f` in a fresh node list and, on success, appends one node produced by `rule`
    /// that owns whatever `f` captured.
    ///
    /// With memoization enabled the outcome is cached by `(rule, position)`: a cached success
    /// is replayed without running `f`, a cached failure fails immediately.
    pub(crate) fn capture<F>(mut self: Box<Self>, rule: &Rule, f: F) -> ParseResult<Box<Self>>
    where
        F: FnOnce(Box<Self>) -> ParseResult<Box<Self>>,
    {
        let begin = self.position;
        let key = (rule.id(), begin);

        if self.memoize {
            match self.memo.get(&key) {
                Some(Memo::Matched(node)) => {
                    trace!("memo hit for `{}` at {}", rule, begin);
                    let node = node.clone();
                    self.position = node.end();
                    self.nodes.push(node);
                    return Ok(self);
                }
                Some(Memo::Failed) => {
                    trace!("memoized failure for `{}` at {}", rule, begin);
                    return Err(self);
                }
                None => {}
            }
        }

        let parent = mem::take(&mut self.nodes);

        match f(self) {
            Ok(mut state) => {
                let children = mem::replace(&mut state.nodes, parent);
                let node = Node::new(rule, state.input, begin, state.position, children);

                if state.memoize {
                    state.memo.insert(key, Memo::Matched(node.clone()));
                }
                state.nodes.push(node);

                Ok(state)
            }
            Err(mut state) => {
                state.nodes = parent;
                state.position = begin;

                // A failure caused by the call limit says nothing about the rule itself.
                if state.memoize && !state.reached_call_limit() {
                    state.memo.insert(key, Memo::Failed);
                }

                Err(state)
            }
        }
    }

    /// Attempts to match a single character based on a filter function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// let state = ParserState::new("ab");
    /// let state = state.match_char_by(|c| c.is_ascii()).unwrap();
    /// assert_eq!(state.position(), 1);
    ///
    /// let state = ParserState::new("❤");
    /// assert!(state.match_char_by(|c| c.is_ascii()).is_err());
    /// ```
    #[inline]
    pub fn match_char_by<F>(mut self: Box<Self>, f: F) -> ParseResult<Box<Self>>
    where
        F: FnOnce(char) -> bool,
    {
        match self.input[self.position..].chars().next() {
            Some(c) if f(c) => {
                self.position += c.len_utf8();
                Ok(self)
            }
            _ => Err(self),
        }
    }

    /// Attempts to match the given string.
    #[inline]
    pub fn match_string(mut self: Box<Self>, string: &str) -> ParseResult<Box<Self>> {
        if self.input[self.position..].starts_with(string) {
            self.position += string.len();
            Ok(self)
        } else {
            Err(self)
        }
    }

    /// Attempts to case-insensitively match the given string.
    ///
    /// Characters are compared through their Unicode lowercase mapping, so the number of
    /// bytes consumed is the length of the matched input, not of `string`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// let state = ParserState::new("CaT");
    /// let state = state.match_insensitive("cat").unwrap();
    /// assert_eq!(state.position(), 3);
    /// ```
    #[inline]
    pub fn match_insensitive(mut self: Box<Self>, string: &str) -> ParseResult<Box<Self>> {
        let mut chars = self.input[self.position..].chars();
        let mut consumed = 0;

        for expected in string.chars() {
            match chars.next() {
                Some(actual)
                    if actual == expected || actual.to_lowercase().eq(expected.to_lowercase()) =>
                {
                    consumed += actual.len_utf8();
                }
                _ => return Err(self),
            }
        }

        self.position += consumed;
        Ok(self)
    }

    /// Attempts to match a single character from the given inclusive range.
    #[inline]
    pub fn match_range(self: Box<Self>, range: RangeInclusive<char>) -> ParseResult<Box<Self>> {
        self.match_char_by(|c| range.contains(&c))
    }

    /// Attempts to match `regex` starting exactly at the current position. The whole input
    /// stays visible to the regex, so look-around assertions like `\b` see the text before
    /// the position.
    #[inline]
    pub fn match_regex(mut self: Box<Self>, regex: &Regex) -> ParseResult<Box<Self>> {
        let search = Input::new(self.input)
            .range(self.position..)
            .anchored(Anchored::Yes);

        match regex.search(&search) {
            Some(found) => {
                self.position = found.end();
                Ok(self)
            }
            None => Err(self),
        }
    }

    /// Matches only at the start of the input. Consumes nothing.
    #[inline]
    pub fn start_of_input(self: Box<Self>) -> ParseResult<Box<Self>> {
        if self.position == 0 {
            Ok(self)
        } else {
            Err(self)
        }
    }

    /// Matches only at the end of the input. Consumes nothing.
    #[inline]
    pub fn end_of_input(self: Box<Self>) -> ParseResult<Box<Self>> {
        if self.position == self.input.len() {
            Ok(self)
        } else {
            Err(self)
        }
    }
}
