// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Constructors for terminal rules and combinators.
//!
//! Sequences and ordered choices are usually written with the `+` and `|` operators, which
//! accept anything convertible into a [`Rule`]: other rules, references to rules, `char`s and
//! string literals.
//!
//! ```
//! # use ruletree::grammar::*;
//! let sign = match_char('+') | '-';
//! let digits = char(|c| c.is_ascii_digit()).one_or_more();
//! let integer = sign.optional() + &digits + end();
//!
//! assert!(integer.is_match("-12"));
//! assert!(!integer.is_match("12a"));
//! ```
//!
//! [`Rule`]: ../struct.Rule.html

use std::sync::Arc;

use once_cell::sync::OnceCell;
use regex_automata::meta::Regex;

use crate::error::Error;
use crate::rule::{Rule, RuleKind};

/// Matches one character for which `predicate` returns `true`.
pub fn char<F>(predicate: F) -> Rule
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    char_with_definition(predicate, "f(char)".to_owned())
}

fn char_with_definition<F>(predicate: F, definition: String) -> Rule
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Rule::from_kind(RuleKind::Char {
        predicate: Arc::new(predicate),
        definition,
    })
}

/// Matches exactly `c`.
pub fn match_char(c: char) -> Rule {
    char_with_definition(move |actual| actual == c, format!("'{}'", c))
}

/// Matches one character in `start..=end`.
pub fn char_range(start: char, end: char) -> Rule {
    char_with_definition(
        move |c| (start..=end).contains(&c),
        format!("('{}'..'{}')", start, end),
    )
}

/// Matches the literal `pattern`.
pub fn string(pattern: &str) -> Rule {
    Rule::from_kind(RuleKind::String {
        pattern: pattern.to_owned(),
        ignore_case: false,
    })
}

/// Matches `pattern` ignoring case.
pub fn string_insensitive(pattern: &str) -> Rule {
    Rule::from_kind(RuleKind::String {
        pattern: pattern.to_owned(),
        ignore_case: true,
    })
}

/// Matches the regular expression `pattern` starting exactly at the current position.
///
/// # Examples
///
/// ```
/// # use ruletree::grammar::regex;
/// let word = regex(r"\w+").unwrap();
///
/// assert!(word.is_match("hello world"));
/// assert!(!word.is_match(" hello"));
/// assert!(regex("(").is_err());
/// ```
pub fn regex(pattern: &str) -> Result<Rule, Error> {
    let regex = Regex::new(pattern).map_err(|error| Error::InvalidRegex {
        pattern: pattern.to_owned(),
        message: error.to_string(),
    })?;

    Ok(Rule::from_kind(RuleKind::Regex {
        pattern: pattern.to_owned(),
        regex,
    }))
}

/// Matches the start of the input.
pub fn start() -> Rule {
    Rule::from_kind(RuleKind::Start)
}

/// Matches the end of the input.
pub fn end() -> Rule {
    Rule::from_kind(RuleKind::End)
}

/// Matches every rule in order. Unnamed nested sequences are flattened.
pub fn sequence<I>(rules: I) -> Rule
where
    I: IntoIterator,
    I::Item: Into<Rule>,
{
    Rule::from_kind(RuleKind::Sequence(flatten(rules, true)))
}

/// Matches the first rule that matches. Unnamed nested choices are flattened.
pub fn or<I>(rules: I) -> Rule
where
    I: IntoIterator,
    I::Item: Into<Rule>,
{
    Rule::from_kind(RuleKind::Or(flatten(rules, false)))
}

fn flatten<I>(rules: I, sequence: bool) -> Vec<Rule>
where
    I: IntoIterator,
    I::Item: Into<Rule>,
{
    let mut flat = vec![];

    for rule in rules.into_iter().map(Into::into) {
        let children = match (rule.name(), rule.kind()) {
            (None, RuleKind::Sequence(children)) if sequence => Some(children),
            (None, RuleKind::Or(children)) if !sequence => Some(children),
            _ => None,
        };

        match children {
            Some(children) => flat.extend_from_slice(children),
            None => flat.push(rule.clone()),
        }
    }

    flat
}

/// Same as [`Rule::optional`](../struct.Rule.html#method.optional).
pub fn optional(rule: impl Into<Rule>) -> Rule {
    rule.into().optional()
}

/// Same as [`Rule::zero_or_more`](../struct.Rule.html#method.zero_or_more).
pub fn zero_or_more(rule: impl Into<Rule>) -> Rule {
    rule.into().zero_or_more()
}

/// Same as [`Rule::one_or_more`](../struct.Rule.html#method.one_or_more).
pub fn one_or_more(rule: impl Into<Rule>) -> Rule {
    rule.into().one_or_more()
}

/// Same as [`Rule::not`](../struct.Rule.html#method.not).
pub fn not(rule: impl Into<Rule>) -> Rule {
    rule.into().not()
}

/// Succeeds if `rule` matches, without consuming input or capturing nodes.
pub fn lookahead(rule: impl Into<Rule>) -> Rule {
    Rule::from_kind(RuleKind::And(rule.into()))
}

/// Captures whatever `rule` matches in a node named `name`.
pub fn node(name: &str, rule: impl Into<Rule>) -> Rule {
    Rule::from_parts(
        Some(Arc::from(name)),
        Arc::new(RuleKind::Node {
            child: rule.into(),
            evaluator: None,
        }),
    )
}

/// A reference to a rule that is produced by `resolver` the first time it is needed.
///
/// This is how a grammar refers to itself: the resolver usually clones a rule stored in a
/// static, which is fully built by the time the reference is first matched.
///
/// # Examples
///
/// ```
/// # use once_cell::sync::Lazy;
/// # use ruletree::Rule;
/// # use ruletree::grammar::*;
/// static PARENS: Lazy<Rule> =
///     Lazy::new(|| (match_char('(') + func(|| PARENS.clone()) + ')').optional());
///
/// assert!((PARENS.clone() + end()).is_match("((()))"));
/// assert!(!(PARENS.clone() + end()).is_match("(()"));
/// ```
pub fn func<F>(resolver: F) -> Rule
where
    F: Fn() -> Rule + Send + Sync + 'static,
{
    Rule::from_kind(RuleKind::Func {
        resolver: Box::new(resolver),
        resolved: OnceCell::new(),
    })
}

/// Creates a reference whose target is supplied later with [`Recursive::bind`].
///
/// # Examples
///
/// ```
/// # use ruletree::grammar::*;
/// let list = recursive();
/// let item = match_char('x') + (match_char(',') + list.rule()).optional();
/// list.bind(item).unwrap();
///
/// assert!((list.rule() + end()).is_match("x,x,x"));
/// ```
///
/// [`Recursive::bind`]: struct.Recursive.html#method.bind
pub fn recursive() -> Recursive {
    let slot = Arc::new(OnceCell::new());
    let rule = Rule::from_kind(RuleKind::Recursive(Arc::clone(&slot)));

    Recursive { slot, rule }
}

/// Two-phase handle to a self-referential rule.
///
/// Binding a target that contains the handle's own rule forms a reference cycle, so a bound
/// recursive grammar is never freed. Build such grammars once, typically in a static.
#[derive(Clone, Debug)]
pub struct Recursive {
    slot: Arc<OnceCell<Rule>>,
    rule: Rule,
}

impl Recursive {
    /// Returns the placeholder rule to use inside the grammar.
    pub fn rule(&self) -> Rule {
        self.rule.clone()
    }

    /// Sets the target of the placeholder. Fails with `Error::AlreadyBound` on a second call.
    pub fn bind(&self, target: impl Into<Rule>) -> Result<(), Error> {
        self.slot
            .set(target.into())
            .map_err(|_| Error::AlreadyBound)
    }

    /// Returns `true` once [`bind`](#method.bind) succeeded.
    pub fn is_bound(&self) -> bool {
        self.slot.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_consumes_one_code_point() {
        let state = char(|c| c == '❤')
            .apply(crate::ParserState::new("❤a"))
            .unwrap();

        assert_eq!(state.position(), '❤'.len_utf8());
    }

    #[test]
    fn regex_is_anchored() {
        let digits = regex("[0-9]+").unwrap();

        assert!(digits.is_match("12ab"));
        assert!(!digits.is_match("ab12"));
    }

    #[test]
    fn regex_from_later_position() {
        let digits = regex("[0-9]+").unwrap();
        let state = crate::ParserState::new_at("ab12", 2).unwrap();

        assert_eq!(digits.apply(state).unwrap().position(), 4);
    }

    #[test]
    fn regex_sees_text_before_position() {
        let word_start = string("x") + regex(r"\bfoo").unwrap();
        let after_space = string("x ") + regex(r"\bfoo").unwrap();

        assert!(!word_start.is_match("xfoo"));
        assert!(after_space.is_match("x foo"));
    }

    #[test]
    fn regex_line_anchor_uses_whole_input() {
        let line_start = regex("(?m)^b").unwrap();
        let state = crate::ParserState::new_at("ab", 1).unwrap();

        assert!(line_start.apply(state).is_err());
        assert!((string("a\n") + regex("(?m)^b").unwrap()).is_match("a\nb"));
    }

    #[test]
    fn invalid_regex() {
        match regex("a(") {
            Err(Error::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "a("),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bind_twice() {
        let handle = recursive();

        assert!(!handle.is_bound());
        handle.bind(string("a")).unwrap();
        assert!(handle.is_bound());
        assert_eq!(handle.bind(string("b")), Err(Error::AlreadyBound));
        assert!(handle.rule().is_match("a"));
    }

    #[test]
    fn unbound_recursive_rule_fails() {
        let handle = recursive();

        assert!(!handle.rule().is_match("a"));
        assert_eq!(handle.rule().definition(), "<unbound>");
    }

    #[test]
    fn string_insensitive_rule() {
        let cat = string_insensitive("cat");

        assert!(cat.is_match("CAT"));
        assert!(cat.is_match("cAt"));
        assert!(!cat.is_match("dog"));
    }

    #[test]
    fn lookahead_does_not_consume() {
        let rule = lookahead(string("ab")) + "a";
        let state = rule.apply(crate::ParserState::new("ab")).unwrap();

        assert_eq!(state.position(), 1);
        assert!(!rule.is_match("ac"));
    }
}
