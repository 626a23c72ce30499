// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::fmt;
use std::ops::{Add, BitOr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use log::{debug, trace, warn};
use once_cell::sync::OnceCell;
use regex_automata::meta::Regex;

use crate::config::ParserConfig;
use crate::error::Error;
use crate::grammar;
use crate::node::Node;
use crate::parser_state::{ParseResult, ParserState};
use crate::value::Evaluate;

pub(crate) type Predicate = Arc<dyn Fn(char) -> bool + Send + Sync>;
pub(crate) type Resolver = Box<dyn Fn() -> Rule + Send + Sync>;

static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// Process-wide identity of a rule, used to key the packrat cache.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RuleId(u32);

impl RuleId {
    fn fresh() -> Self {
        RuleId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    pub fn get(self) -> u32 {
        self.0
    }
}

pub(crate) enum RuleKind {
    Char {
        predicate: Predicate,
        definition: String,
    },
    String {
        pattern: String,
        ignore_case: bool,
    },
    Regex {
        pattern: String,
        regex: Regex,
    },
    Start,
    End,
    Sequence(Vec<Rule>),
    Or(Vec<Rule>),
    Optional(Rule),
    ZeroOrMore(Rule),
    OneOrMore(Rule),
    Not(Rule),
    And(Rule),
    Func {
        resolver: Resolver,
        resolved: OnceCell<Rule>,
    },
    Recursive(Arc<OnceCell<Rule>>),
    Node {
        child: Rule,
        evaluator: Option<Arc<dyn Evaluate>>,
    },
}

impl RuleKind {
    fn definition(&self) -> String {
        match self {
            RuleKind::Char { definition, .. } => definition.clone(),
            RuleKind::String {
                pattern,
                ignore_case: false,
            } => format!("\"{}\"", pattern),
            RuleKind::String {
                pattern,
                ignore_case: true,
            } => format!("^\"{}\"", pattern),
            RuleKind::Regex { pattern, .. } => format!("regex({})", pattern),
            RuleKind::Start => "^".to_owned(),
            RuleKind::End => "$".to_owned(),
            RuleKind::Sequence(rules) => format!("({})", join(rules, " + ")),
            RuleKind::Or(rules) => format!("({})", join(rules, " | ")),
            RuleKind::Optional(rule) => format!("({})?", rule),
            RuleKind::ZeroOrMore(rule) => format!("({})*", rule),
            RuleKind::OneOrMore(rule) => format!("({})+", rule),
            RuleKind::Not(rule) => format!("Not({})", rule),
            RuleKind::And(rule) => format!("&({})", rule),
            RuleKind::Func { resolver, resolved } => resolve(resolver, resolved).definition(),
            RuleKind::Recursive(slot) => slot
                .get()
                .map_or_else(|| "<unbound>".to_owned(), Rule::definition),
            RuleKind::Node { child, .. } => child.definition(),
        }
    }
}

fn join(rules: &[Rule], separator: &str) -> String {
    rules
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

fn resolve<'r>(resolver: &Resolver, resolved: &'r OnceCell<Rule>) -> &'r Rule {
    resolved.get_or_init(|| {
        let rule = resolver();
        trace!("resolved lazy reference to `{}`", rule);
        rule
    })
}

#[derive(Clone, Copy)]
enum Derived {
    Optional,
    Not,
    OneOrMore,
    ZeroOrMore,
}

struct RuleInner {
    id: RuleId,
    name: Option<Arc<str>>,
    kind: Arc<RuleKind>,
    // Weak so that a cached wrapper, which owns its parent, does not form a cycle.
    derived: [Mutex<Weak<RuleInner>>; 4],
}

/// A node of an immutable grammar graph.
///
/// `Rule` is a cheap, thread-safe handle: cloning it clones an `Arc`. Grammars are built once,
/// usually from the functions in [`grammar`] and the `+` (sequence) and `|` (ordered choice)
/// operators, and can then be matched against any number of inputs concurrently.
///
/// # Examples
///
/// ```
/// # use ruletree::grammar::{char, node};
/// let digit = char(|c| c.is_ascii_digit());
/// let number = node("number", digit.one_or_more());
///
/// assert!(number.is_match("123"));
/// assert!(!number.is_match("a1"));
///
/// let tree = number.parse_tree("42").unwrap();
/// assert_eq!(tree.to_string(), "number: 42");
/// ```
///
/// [`grammar`]: grammar/index.html
#[derive(Clone)]
pub struct Rule(Arc<RuleInner>);

impl Rule {
    pub(crate) fn from_kind(kind: RuleKind) -> Self {
        Self::from_parts(None, Arc::new(kind))
    }

    pub(crate) fn from_parts(name: Option<Arc<str>>, kind: Arc<RuleKind>) -> Self {
        Rule(Arc::new(RuleInner {
            id: RuleId::fresh(),
            name,
            kind,
            derived: Default::default(),
        }))
    }

    pub(crate) fn kind(&self) -> &RuleKind {
        &self.0.kind
    }

    pub(crate) fn name_arc(&self) -> Option<Arc<str>> {
        self.0.name.clone()
    }

    pub(crate) fn evaluator(&self) -> Option<&Arc<dyn Evaluate>> {
        match self.kind() {
            RuleKind::Node { evaluator, .. } => evaluator.as_ref(),
            _ => None,
        }
    }

    /// Returns the identity of this rule.
    #[inline]
    pub fn id(&self) -> RuleId {
        self.0.id
    }

    /// Returns the display name of this rule, if it was given one.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Returns a new rule with the same matching behaviour under a new name.
    ///
    /// When `self` is a capturing rule, the nodes produced by the returned rule carry `name`.
    /// `self` is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::grammar::string;
    /// let cat = string("cat");
    /// let named = cat.named("feline");
    ///
    /// assert_eq!(cat.to_string(), "\"cat\"");
    /// assert_eq!(named.to_string(), "feline");
    /// assert_eq!(named.definition(), "\"cat\"");
    /// ```
    pub fn named(&self, name: &str) -> Rule {
        Self::from_parts(Some(Arc::from(name)), Arc::clone(&self.0.kind))
    }

    /// Returns the textual form of this rule, built from the display form of its children.
    ///
    /// A lazy reference is resolved by this call.
    pub fn definition(&self) -> String {
        self.0.kind.definition()
    }

    /// `(self)?`, built once and shared while it is alive.
    pub fn optional(&self) -> Rule {
        self.derived(Derived::Optional, RuleKind::Optional)
    }

    /// `Not(self)`, built once and shared while it is alive.
    pub fn not(&self) -> Rule {
        self.derived(Derived::Not, RuleKind::Not)
    }

    /// `(self)+`, built once and shared while it is alive.
    pub fn one_or_more(&self) -> Rule {
        self.derived(Derived::OneOrMore, RuleKind::OneOrMore)
    }

    /// `(self)*`, built once and shared while it is alive.
    pub fn zero_or_more(&self) -> Rule {
        self.derived(Derived::ZeroOrMore, RuleKind::ZeroOrMore)
    }

    fn derived(&self, form: Derived, build: fn(Rule) -> RuleKind) -> Rule {
        let mut cached = self.0.derived[form as usize]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(inner) = cached.upgrade() {
            return Rule(inner);
        }

        let rule = Rule::from_kind(build(self.clone()));
        *cached = Arc::downgrade(&rule.0);
        rule
    }

    /// Applies this rule to `state`.
    ///
    /// Returns `Ok` with the advanced state if the rule matched and `Err` with the state
    /// restored to where it was otherwise. Every application counts towards the call limit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::ParserState;
    /// # use ruletree::grammar::char;
    /// let digits = char(|c| c.is_ascii_digit()).one_or_more();
    ///
    /// let state = digits.apply(ParserState::new("123abc")).unwrap();
    /// assert_eq!(state.position(), 3);
    ///
    /// let state = digits.apply(ParserState::new_at("123abc", 3).unwrap()).unwrap_err();
    /// assert_eq!(state.position(), 3);
    /// ```
    pub fn apply<'i>(&self, state: Box<ParserState<'i>>) -> ParseResult<Box<ParserState<'i>>> {
        let state = state.inc_call_check_limit()?;

        match self.kind() {
            RuleKind::Char { predicate, .. } => state.match_char_by(|c| predicate(c)),
            RuleKind::String {
                pattern,
                ignore_case: false,
            } => state.match_string(pattern),
            RuleKind::String {
                pattern,
                ignore_case: true,
            } => state.match_insensitive(pattern),
            RuleKind::Regex { regex, .. } => state.match_regex(regex),
            RuleKind::Start => state.start_of_input(),
            RuleKind::End => state.end_of_input(),
            RuleKind::Sequence(rules) => state.sequence(|mut state| {
                for rule in rules {
                    state = rule.apply(state)?;
                }
                Ok(state)
            }),
            RuleKind::Or(rules) => {
                let mut state = state;
                for rule in rules {
                    match state.restore_on_err(|s| rule.apply(s)) {
                        Ok(state) => return Ok(state),
                        Err(restored) => state = restored,
                    }
                }
                Err(state)
            }
            RuleKind::Optional(rule) => state.optional(|s| rule.apply(s)),
            RuleKind::ZeroOrMore(rule) => state.repeat(|s| rule.apply(s)),
            RuleKind::OneOrMore(rule) => state.sequence(|s| {
                rule.apply(s)
                    .and_then(|s| s.repeat(|s| rule.apply(s)))
            }),
            RuleKind::Not(rule) => state.lookahead(false, |s| rule.apply(s)),
            RuleKind::And(rule) => state.lookahead(true, |s| rule.apply(s)),
            RuleKind::Func { resolver, resolved } => resolve(resolver, resolved).apply(state),
            RuleKind::Recursive(slot) => match slot.get() {
                Some(rule) => rule.apply(state),
                None => {
                    warn!("matched a recursive rule that was never bound");
                    Err(state)
                }
            },
            RuleKind::Node { child, .. } => state.capture(self, |s| child.apply(s)),
        }
    }

    /// Returns `true` if the rule matches a prefix of `input`.
    ///
    /// A parse stopped by the call limit never counts as a match.
    ///
    /// The whole input only has to be consumed when the rule ends with [`end`].
    ///
    /// [`end`]: grammar/fn.end.html
    pub fn is_match(&self, input: &str) -> bool {
        self.is_match_with(input, &ParserConfig::default())
    }

    /// Same as [`is_match`] with an explicit configuration.
    ///
    /// [`is_match`]: #method.is_match
    pub fn is_match_with(&self, input: &str, config: &ParserConfig) -> bool {
        match self.apply(ParserState::with_config(input, config)) {
            Ok(state) => !state.reached_call_limit(),
            Err(_) => false,
        }
    }

    /// Matches `input` and returns the captured tree.
    ///
    /// If exactly one top-level node was captured it is returned as is. Otherwise the top-level
    /// nodes are wrapped in a node named after this rule's display form that spans the whole
    /// input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::grammar::{node, string};
    /// let pets = node("pet", string("cat") | "dog").one_or_more();
    ///
    /// let tree = pets.parse_tree("catdog").unwrap();
    /// assert_eq!(tree.leafs().len(), 2);
    /// assert_eq!(tree.leafs()[1].as_str(), "dog");
    ///
    /// assert!(pets.parse_tree("cow").is_err());
    /// ```
    pub fn parse_tree<'i>(&self, input: &'i str) -> Result<Node<'i>, Error> {
        self.parse_tree_with(input, &ParserConfig::default())
    }

    /// Same as [`parse_tree`] with an explicit configuration.
    ///
    /// [`parse_tree`]: #method.parse_tree
    pub fn parse_tree_with<'i>(
        &self,
        input: &'i str,
        config: &ParserConfig,
    ) -> Result<Node<'i>, Error> {
        let (matched, state) = match self.apply(ParserState::with_config(input, config)) {
            Ok(state) => (true, state),
            Err(state) => (false, state),
        };

        if state.reached_call_limit() {
            debug!("call limit reached while matching `{}`", self);
            return Err(Error::CallLimitReached {
                rule: self.to_string(),
            });
        }

        if !matched {
            debug!("`{}` failed to match {:?}", self, input);
            return Err(Error::Parse {
                rule: self.to_string(),
                input: input.to_owned(),
            });
        }

        let mut nodes = state.into_nodes();
        match nodes.pop() {
            Some(node) if nodes.is_empty() => Ok(node),
            Some(node) => {
                nodes.push(node);
                Ok(Node::synthetic(self, input, nodes))
            }
            None => Ok(Node::synthetic(self, input, nodes)),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.kind()) {
            (Some(name), _) => f.write_str(name),
            (None, RuleKind::Func { .. } | RuleKind::Recursive(_)) => f.write_str("recursive"),
            (None, kind) => f.write_str(&kind.definition()),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id())
            .field("rule", &format_args!("{}", self))
            .finish()
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Rule) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.name() == other.name() && self.definition() == other.definition())
    }
}

impl Eq for Rule {}

impl From<&Rule> for Rule {
    fn from(rule: &Rule) -> Self {
        rule.clone()
    }
}

impl From<char> for Rule {
    fn from(c: char) -> Self {
        grammar::match_char(c)
    }
}

impl From<&str> for Rule {
    fn from(pattern: &str) -> Self {
        grammar::string(pattern)
    }
}

impl<R: Into<Rule>> Add<R> for Rule {
    type Output = Rule;

    fn add(self, rhs: R) -> Rule {
        grammar::sequence([self, rhs.into()])
    }
}

impl<R: Into<Rule>> Add<R> for &Rule {
    type Output = Rule;

    fn add(self, rhs: R) -> Rule {
        grammar::sequence([self.clone(), rhs.into()])
    }
}

impl<R: Into<Rule>> BitOr<R> for Rule {
    type Output = Rule;

    fn bitor(self, rhs: R) -> Rule {
        grammar::or([self, rhs.into()])
    }
}

impl<R: Into<Rule>> BitOr<R> for &Rule {
    type Output = Rule;

    fn bitor(self, rhs: R) -> Rule {
        grammar::or([self.clone(), rhs.into()])
    }
}
