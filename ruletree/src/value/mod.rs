// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Rules that attach typed values to the nodes they produce.
//!
//! A value rule is a capturing rule whose nodes carry a value of type `T`. Constant and
//! converted values are computed when the node is created; accumulated, first-of and
//! range-checked values are computed the first time they are read and then kept.
//!
//! Values are read back with the traversal helpers on [`Node`] (`first_value`, `process`,
//! `try_get_value`, ...) or directly from a [`ValueRule`].
//!
//! ```
//! # use ruletree::grammar::*;
//! # use ruletree::value::*;
//! let digits = char(|c| c.is_ascii_digit()).one_or_more();
//! let number = try_convert_to_value(str::parse::<i64>, digits);
//! let add = accumulate(|l: i64, r: i64| l + r, &number + '+' + &number);
//!
//! assert_eq!(add.first_value("5+6").unwrap(), 11);
//! assert_eq!(add.first_value("15+6").unwrap(), 21);
//! ```
//!
//! [`Node`]: ../struct.Node.html
//! [`ValueRule`]: struct.ValueRule.html

mod evaluators;
mod traverse;

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, BitOr, Deref};
use std::sync::Arc;

use crate::error::Error;
use crate::grammar;
use crate::node::Node;
use crate::rule::{Rule, RuleKind};

pub(crate) use self::evaluators::{Evaluate, TypedValue};
use self::evaluators::{Accumulate, Constant, ConvertNode, ConvertText, First, Range, TryConvert};

/// Types that can be carried by the nodes of a value rule.
pub trait Value: Any + Clone + Send + Sync {}

impl<T: Any + Clone + Send + Sync> Value for T {}

/// A capturing rule whose nodes carry a `T`.
///
/// `ValueRule<T>` dereferences to [`Rule`] and converts into one, so it composes with every
/// other rule. Its own `value`/`first_value`/... methods parse an input and read back a `T`
/// without a type annotation.
///
/// [`Rule`]: ../struct.Rule.html
pub struct ValueRule<T> {
    rule: Rule,
    marker: PhantomData<fn() -> T>,
}

impl<T: Value> ValueRule<T> {
    fn new(evaluator: impl Evaluate + 'static, rule: impl Into<Rule>) -> Self {
        ValueRule {
            rule: Rule::from_kind(RuleKind::Node {
                child: rule.into(),
                evaluator: Some(Arc::new(evaluator)),
            }),
            marker: PhantomData,
        }
    }

    /// Returns the same value rule under `name`; its nodes carry that name.
    pub fn named(&self, name: &str) -> ValueRule<T> {
        ValueRule {
            rule: self.rule.named(name),
            marker: PhantomData,
        }
    }

    /// Returns the underlying rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Parses `input` and returns the value of the root node.
    pub fn value(&self, input: &str) -> Result<T, Error> {
        self.rule.parse_tree(input)?.value::<T>()
    }

    /// Parses `input` and returns the first `T` in the tree.
    pub fn first_value(&self, input: &str) -> Result<T, Error> {
        self.rule.first_value::<T>(input)
    }

    /// Parses `input` and returns the first `T` in the tree, or `T::default()` if there is none
    /// or the input does not match.
    pub fn first_value_or_default(&self, input: &str) -> Result<T, Error>
    where
        T: Default,
    {
        self.rule.first_value_or_default::<T>(input)
    }

    /// Parses `input` and returns the first `T` carried by a node named `name`.
    pub fn first_value_by_name(&self, input: &str, name: &str) -> Result<T, Error> {
        self.rule.first_value_by_name::<T>(input, name)
    }

    /// Parses `input` and returns the first `T` carried by a node named `name`, or
    /// `T::default()` if there is none or the input does not match.
    pub fn first_value_by_name_or_default(&self, input: &str, name: &str) -> Result<T, Error>
    where
        T: Default,
    {
        self.rule.first_value_by_name_or_default::<T>(input, name)
    }

    /// Parses `input` and folds every `T` in the tree with `accumulator`.
    pub fn process<F>(&self, input: &str, accumulator: F) -> Result<T, Error>
    where
        T: Default,
        F: FnMut(T, T) -> T,
    {
        self.rule.process::<T, F>(input, accumulator)
    }

    /// Parses `input` and returns the value of the root node, or `None` if parsing or
    /// evaluation fails.
    pub fn try_get_value(&self, input: &str) -> Option<T> {
        self.rule.try_get_value::<T>(input)
    }

    /// Parses `input` and checks whether the tree contains a `T`. An input that does not match
    /// contains nothing.
    pub fn contains_value_node(&self, input: &str) -> Result<bool, Error> {
        self.rule.contains_value_node::<T>(input)
    }
}

impl<T> Clone for ValueRule<T> {
    fn clone(&self) -> Self {
        ValueRule {
            rule: self.rule.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> Deref for ValueRule<T> {
    type Target = Rule;

    fn deref(&self) -> &Rule {
        &self.rule
    }
}

impl<T> fmt::Display for ValueRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rule, f)
    }
}

impl<T> fmt::Debug for ValueRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueRule")
            .field(&std::any::type_name::<T>())
            .field(&self.rule)
            .finish()
    }
}

impl<T> From<ValueRule<T>> for Rule {
    fn from(rule: ValueRule<T>) -> Self {
        rule.rule
    }
}

impl<T> From<&ValueRule<T>> for Rule {
    fn from(rule: &ValueRule<T>) -> Self {
        rule.rule.clone()
    }
}

impl<T, R: Into<Rule>> Add<R> for ValueRule<T> {
    type Output = Rule;

    fn add(self, rhs: R) -> Rule {
        grammar::sequence([self.rule, rhs.into()])
    }
}

impl<T, R: Into<Rule>> Add<R> for &ValueRule<T> {
    type Output = Rule;

    fn add(self, rhs: R) -> Rule {
        grammar::sequence([self.rule.clone(), rhs.into()])
    }
}

impl<T, R: Into<Rule>> BitOr<R> for ValueRule<T> {
    type Output = Rule;

    fn bitor(self, rhs: R) -> Rule {
        grammar::or([self.rule, rhs.into()])
    }
}

impl<T, R: Into<Rule>> BitOr<R> for &ValueRule<T> {
    type Output = Rule;

    fn bitor(self, rhs: R) -> Rule {
        grammar::or([self.rule.clone(), rhs.into()])
    }
}

/// Nodes matched by `rule` carry `value`, whatever text they matched.
pub fn constant_value<T: Value>(value: T, rule: impl Into<Rule>) -> ValueRule<T> {
    ValueRule::new(Constant(value), rule)
}

/// Nodes matched by `rule` carry `convert` applied to the matched text.
pub fn convert_to_value<T, F>(convert: F, rule: impl Into<Rule>) -> ValueRule<T>
where
    T: Value,
    F: Fn(&str) -> T + Send + Sync + 'static,
{
    ValueRule::new(ConvertText::new(convert), rule)
}

/// Nodes matched by `rule` carry `convert` applied to the node itself, so the value can be
/// built from its children.
///
/// # Examples
///
/// ```
/// # use ruletree::grammar::*;
/// # use ruletree::value::*;
/// let letter = node("letter", char(char::is_alphabetic));
/// let count = convert_node_to_value(|node| node.leafs().len(), letter.one_or_more());
///
/// assert_eq!(count.value("abc").unwrap(), 3);
/// ```
pub fn convert_node_to_value<T, F>(convert: F, rule: impl Into<Rule>) -> ValueRule<T>
where
    T: Value,
    F: Fn(&Node<'_>) -> T + Send + Sync + 'static,
{
    ValueRule::new(ConvertNode::new(convert), rule)
}

/// Like [`convert_to_value`] for fallible conversions. A conversion error is stored in the
/// node and surfaces as `Error::Evaluation` when the value is read.
///
/// [`convert_to_value`]: fn.convert_to_value.html
pub fn try_convert_to_value<T, E, F>(convert: F, rule: impl Into<Rule>) -> ValueRule<T>
where
    T: Value,
    E: fmt::Display + 'static,
    F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
{
    ValueRule::new(TryConvert::new(convert), rule)
}

/// Nodes matched by `rule` carry the matched text.
pub fn text(rule: impl Into<Rule>) -> ValueRule<String> {
    convert_to_value(str::to_owned, rule)
}

/// Nodes matched by `rule` carry the left fold of the `T` values found below them.
///
/// The search is breadth first and stops at the first `T` along each branch, so nested
/// accumulations are folded once, as a single value. The first value found is the seed.
/// Reading the value fails when nothing was found.
pub fn accumulate<T, F>(accumulate: F, rule: impl Into<Rule>) -> ValueRule<T>
where
    T: Value,
    F: Fn(T, T) -> T + Send + Sync + 'static,
{
    ValueRule::new(Accumulate::new(accumulate), rule)
}

/// Nodes matched by `rule` carry the first `T` found below them, searching breadth first.
pub fn first_value<T: Value>(rule: impl Into<Rule>) -> ValueRule<T> {
    ValueRule::new(First::<T>::new(), rule)
}

/// Nodes matched by `rule` carry the first `T` found below them, which has to lie in
/// `minimum..=maximum`.
///
/// # Examples
///
/// ```
/// # use ruletree::grammar::*;
/// # use ruletree::value::*;
/// let digit = try_convert_to_value(str::parse::<u8>, char(|c| c.is_ascii_digit()));
/// let small = range(1u8, 5, digit);
///
/// assert_eq!(small.first_value("3").unwrap(), 3);
/// assert!(small.first_value("7").unwrap_err().is_evaluation());
/// ```
pub fn range<T>(minimum: T, maximum: T, rule: impl Into<Rule>) -> ValueRule<T>
where
    T: Value + PartialOrd + fmt::Debug,
{
    ValueRule::new(
        Range::new(minimum, maximum, Box::new(T::partial_cmp)),
        rule,
    )
}

/// Like [`range`] with a custom ordering.
///
/// [`range`]: fn.range.html
pub fn range_by<T, C>(minimum: T, maximum: T, compare: C, rule: impl Into<Rule>) -> ValueRule<T>
where
    T: Value + fmt::Debug,
    C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    ValueRule::new(
        Range::new(minimum, maximum, Box::new(move |a: &T, b: &T| Some(compare(a, b)))),
        rule,
    )
}
