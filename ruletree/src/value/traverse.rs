// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::any::{type_name, TypeId};

use crate::error::Error;
use crate::node::Node;
use crate::rule::Rule;

use super::{Evaluate, Value};

fn not_found<T>() -> Error {
    Error::evaluation(format!("value node of type {} not found", type_name::<T>()))
}

fn not_found_by_name<T>(name: &str) -> Error {
    Error::evaluation(format!(
        "value node of type {} with name '{}' not found",
        type_name::<T>(),
        name
    ))
}

/// Typed value helpers.
///
/// Searches run depth first over the node and its descendants, parents before children, and
/// return the first node that qualifies.
impl<'i> Node<'i> {
    /// Returns `true` if this node carries a `T`.
    pub fn is_value_node<T: Value>(&self) -> bool {
        self.value_type() == Some(TypeId::of::<T>())
    }

    /// Returns `true` if this node carries a value of any type.
    pub fn is_any_value_node(&self) -> bool {
        self.value_type().is_some()
    }

    /// Returns the value carried by this node.
    ///
    /// Fails if the node does not carry a `T` or if computing the value failed.
    pub fn value<T: Value>(&self) -> Result<T, Error> {
        if !self.is_value_node::<T>() {
            return Err(Error::evaluation(format!(
                "'{}' is not a value node of type {}",
                self,
                type_name::<T>()
            )));
        }

        match self.evaluated() {
            Some(Ok(value)) => value.downcast_ref::<T>().cloned().ok_or_else(not_found::<T>),
            Some(Err(error)) => Err(error.clone()),
            None => Err(not_found::<T>()),
        }
    }

    /// Returns the value carried by this node, without searching its descendants.
    pub fn try_get_value<T: Value>(&self) -> Option<T> {
        self.value::<T>().ok()
    }

    /// Returns the first node carrying a `T`.
    pub fn first_value_node<T: Value>(&self) -> Option<&Node<'i>> {
        self.descendants().find(|node| node.is_value_node::<T>())
    }

    /// Returns the first `T` in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::grammar::*;
    /// # use ruletree::value::*;
    /// let digit = try_convert_to_value(str::parse::<u8>, char(|c| c.is_ascii_digit()));
    /// let word = text(char(char::is_alphabetic).one_or_more());
    /// let tree = node("pair", &word + '=' + &digit).parse_tree("x=7").unwrap();
    ///
    /// assert_eq!(tree.first_value::<u8>().unwrap(), 7);
    /// assert_eq!(tree.first_value::<String>().unwrap(), "x");
    /// assert!(tree.first_value::<i64>().is_err());
    /// ```
    pub fn first_value<T: Value>(&self) -> Result<T, Error> {
        self.first_value_node::<T>()
            .ok_or_else(not_found::<T>)?
            .value::<T>()
    }

    /// Returns the first `T` in the tree, or `T::default()` when there is none.
    ///
    /// Still fails if a `T` was found but computing it failed.
    pub fn first_value_or_default<T: Value + Default>(&self) -> Result<T, Error> {
        match self.first_value_node::<T>() {
            Some(node) => node.value::<T>(),
            None => Ok(T::default()),
        }
    }

    fn first_value_node_by_name<T: Value>(&self, name: &str) -> Option<&Node<'i>> {
        self.descendants()
            .find(|node| node.is_value_node::<T>() && node.name() == Some(name))
    }

    /// Returns the first `T` carried by a node named `name`.
    pub fn first_value_by_name<T: Value>(&self, name: &str) -> Result<T, Error> {
        self.first_value_node_by_name::<T>(name)
            .ok_or_else(|| not_found_by_name::<T>(name))?
            .value::<T>()
    }

    /// Returns the first `T` carried by a node named `name`, or `T::default()` when there is
    /// none.
    pub fn first_value_by_name_or_default<T: Value + Default>(
        &self,
        name: &str,
    ) -> Result<T, Error> {
        match self.first_value_node_by_name::<T>(name) {
            Some(node) => node.value::<T>(),
            None => Ok(T::default()),
        }
    }

    /// Returns the first node named `name`, if any.
    pub fn find_first_node_by_name(&self, name: &str) -> Option<&Node<'i>> {
        self.descendants().find(|node| node.name() == Some(name))
    }

    /// Returns the first node named `name`.
    pub fn first_node_by_name(&self, name: &str) -> Result<&Node<'i>, Error> {
        self.find_first_node_by_name(name)
            .ok_or_else(|| Error::evaluation(format!("node with name '{}' not found", name)))
    }

    /// Returns `true` if the tree contains a node carrying a `T`.
    pub fn contains_value_node<T: Value>(&self) -> bool {
        self.first_value_node::<T>().is_some()
    }

    /// Returns `true` if the tree contains a node carrying a value of any type.
    pub fn contains_any_value_node(&self) -> bool {
        self.descendants().any(Node::is_any_value_node)
    }

    /// Folds every `T` in the tree with `accumulator`, starting from `T::default()`.
    ///
    /// Nodes carrying a `T` are folded as a whole; the nodes below them are not visited.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::grammar::*;
    /// # use ruletree::value::*;
    /// let digit = try_convert_to_value(str::parse::<u32>, char(|c| c.is_ascii_digit()));
    /// let list = &digit + (match_char(',') + &digit).zero_or_more();
    /// let tree = node("list", list).parse_tree("1,2,3").unwrap();
    ///
    /// assert_eq!(tree.process(|sum: u32, n| sum + n).unwrap(), 6);
    /// ```
    pub fn process<T, F>(&self, mut accumulator: F) -> Result<T, Error>
    where
        T: Value + Default,
        F: FnMut(T, T) -> T,
    {
        let mut total = T::default();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if node.is_value_node::<T>() {
                total = accumulator(total, node.value::<T>()?);
            } else {
                stack.extend(node.leafs().iter().rev());
            }
        }

        Ok(total)
    }
}

/// Shortcuts that parse an input first and then query the resulting tree.
///
/// The `*_or_default`, `find_*` and `contains_*` forms treat an input that does not match like
/// a tree without the value they look for. Every other error is returned.
impl Rule {
    /// Returns `true` if the nodes captured by this rule carry a `T`.
    pub fn is_value_rule<T: Value>(&self) -> bool {
        self.value_type() == Some(TypeId::of::<T>())
    }

    /// Returns `true` if the nodes captured by this rule carry a value of any type.
    pub fn is_any_value_rule(&self) -> bool {
        self.value_type().is_some()
    }

    fn value_type(&self) -> Option<TypeId> {
        self.evaluator().map(|evaluator| evaluator.value_type())
    }

    fn parse_tree_if_match<'i>(&self, input: &'i str) -> Result<Option<Node<'i>>, Error> {
        match self.parse_tree(input) {
            Ok(tree) => Ok(Some(tree)),
            Err(Error::Parse { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Parses `input` and returns the first node carrying a `T`.
    pub fn first_value_node<'i, T: Value>(&self, input: &'i str) -> Result<Node<'i>, Error> {
        self.parse_tree(input)?
            .first_value_node::<T>()
            .cloned()
            .ok_or_else(not_found::<T>)
    }

    /// Parses `input` and returns the first node carrying a `T`, or `None` if there is none or
    /// the input does not match.
    pub fn find_first_value_node<'i, T: Value>(
        &self,
        input: &'i str,
    ) -> Result<Option<Node<'i>>, Error> {
        Ok(self
            .parse_tree_if_match(input)?
            .and_then(|tree| tree.first_value_node::<T>().cloned()))
    }

    /// Parses `input` and returns the first `T` in the tree.
    pub fn first_value<T: Value>(&self, input: &str) -> Result<T, Error> {
        self.parse_tree(input)?.first_value::<T>()
    }

    /// Parses `input` and returns the first `T` in the tree, or `T::default()` if there is none
    /// or the input does not match.
    pub fn first_value_or_default<T: Value + Default>(&self, input: &str) -> Result<T, Error> {
        match self.parse_tree_if_match(input)? {
            Some(tree) => tree.first_value_or_default::<T>(),
            None => Ok(T::default()),
        }
    }

    /// Parses `input` and returns the first `T` carried by a node named `name`.
    pub fn first_value_by_name<T: Value>(&self, input: &str, name: &str) -> Result<T, Error> {
        self.parse_tree(input)?.first_value_by_name::<T>(name)
    }

    /// Parses `input` and returns the first `T` carried by a node named `name`, or
    /// `T::default()` if there is none or the input does not match.
    pub fn first_value_by_name_or_default<T: Value + Default>(
        &self,
        input: &str,
        name: &str,
    ) -> Result<T, Error> {
        match self.parse_tree_if_match(input)? {
            Some(tree) => tree.first_value_by_name_or_default::<T>(name),
            None => Ok(T::default()),
        }
    }

    /// Parses `input` and checks whether the tree contains a `T`. An input that does not
    /// match contains nothing.
    pub fn contains_value_node<T: Value>(&self, input: &str) -> Result<bool, Error> {
        Ok(self
            .parse_tree_if_match(input)?
            .map_or(false, |tree| tree.contains_value_node::<T>()))
    }

    /// Parses `input` and checks whether the tree contains a value of any type.
    pub fn contains_any_value_node(&self, input: &str) -> Result<bool, Error> {
        Ok(self
            .parse_tree_if_match(input)?
            .map_or(false, |tree| tree.contains_any_value_node()))
    }

    /// Parses `input` and folds every `T` in the tree with `accumulator`.
    pub fn process<T, F>(&self, input: &str, accumulator: F) -> Result<T, Error>
    where
        T: Value + Default,
        F: FnMut(T, T) -> T,
    {
        self.parse_tree(input)?.process(accumulator)
    }

    /// Parses `input` and returns the root node's own value, or `None` if parsing or
    /// evaluation fails.
    pub fn try_get_value<T: Value>(&self, input: &str) -> Option<T> {
        self.parse_tree(input).ok()?.try_get_value::<T>()
    }
}
