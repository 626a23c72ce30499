// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::any::TypeId;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::OnceCell;

#[cfg(feature = "pretty-print")]
use serde::ser::SerializeStruct;

use crate::error::Error;
use crate::rule::Rule;
use crate::value::{Evaluate, TypedValue};

struct NodeInner<'i> {
    name: Option<Arc<str>>,
    rule: Rule,
    input: &'i str,
    start: usize,
    end: usize,
    children: Vec<Node<'i>>,
    evaluator: Option<Arc<dyn Evaluate>>,
    value: OnceCell<Result<TypedValue, Error>>,
}

/// A node of a parse tree: the part of the input matched by a capturing rule, together with
/// the nodes captured inside it.
///
/// Nodes are immutable once created and cheap to clone.
#[derive(Clone)]
pub struct Node<'i>(Arc<NodeInner<'i>>);

impl<'i> Node<'i> {
    pub(crate) fn new(
        rule: &Rule,
        input: &'i str,
        start: usize,
        end: usize,
        children: Vec<Node<'i>>,
    ) -> Self {
        let node = Node(Arc::new(NodeInner {
            name: rule.name_arc(),
            rule: rule.clone(),
            input,
            start,
            end,
            children,
            evaluator: rule.evaluator().cloned(),
            value: OnceCell::new(),
        }));

        if node.0.evaluator.as_ref().map_or(false, |e| e.is_eager()) {
            node.evaluated();
        }

        node
    }

    /// Wrapper for a parse that produced zero or several top-level nodes.
    pub(crate) fn synthetic(rule: &Rule, input: &'i str, children: Vec<Node<'i>>) -> Self {
        Node(Arc::new(NodeInner {
            name: Some(Arc::from(rule.to_string())),
            rule: rule.clone(),
            input,
            start: 0,
            end: input.len(),
            children,
            evaluator: None,
            value: OnceCell::new(),
        }))
    }

    /// Returns the name of the rule that produced this node, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Returns the rule that produced this node.
    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.0.rule
    }

    /// Returns the complete input the node was matched in.
    #[inline]
    pub fn input(&self) -> &'i str {
        self.0.input
    }

    /// Byte offset of the first matched character.
    #[inline]
    pub fn start(&self) -> usize {
        self.0.start
    }

    /// Byte offset just past the match. Never smaller than `start`.
    #[inline]
    pub fn end(&self) -> usize {
        self.0.end.max(self.0.start)
    }

    /// Returns `start()..end()`.
    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Returns the matched text.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::grammar::{node, string};
    /// let tree = node("greeting", string("hi")).parse_tree("hi there").unwrap();
    /// assert_eq!(tree.as_str(), "hi");
    /// ```
    #[inline]
    pub fn as_str(&self) -> &'i str {
        &self.0.input[self.as_range()]
    }

    /// Length of the matched text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Returns `true` for a zero-width match.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the child nodes in input order.
    #[inline]
    pub fn leafs(&self) -> &[Node<'i>] {
        &self.0.children
    }

    /// Returns `true` when the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.0.children.is_empty()
    }

    /// Iterates over this node and all of its descendants, depth first, parents before children.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ruletree::grammar::{match_char, node};
    /// let a = node("a", match_char('a'));
    /// let b = node("b", match_char('b'));
    /// let ab = node("ab", &a + &b);
    ///
    /// let tree = ab.parse_tree("ab").unwrap();
    /// let names: Vec<_> = tree.descendants().filter_map(|n| n.name()).collect();
    ///
    /// assert_eq!(names, vec!["ab", "a", "b"]);
    /// ```
    pub fn descendants(&self) -> Descendants<'_, 'i> {
        Descendants { stack: vec![self] }
    }

    /// Iterates over the nodes of [`descendants`](#method.descendants) that satisfy `predicate`.
    pub fn find_nodes<P>(&self, mut predicate: P) -> impl Iterator<Item = &Node<'i>>
    where
        P: FnMut(&Node<'i>) -> bool,
    {
        self.descendants().filter(move |node| predicate(node))
    }

    pub(crate) fn value_type(&self) -> Option<TypeId> {
        self.0.evaluator.as_ref().map(|evaluator| evaluator.value_type())
    }

    /// Computes the value on first use; later calls return the stored outcome.
    pub(crate) fn evaluated(&self) -> Option<&Result<TypedValue, Error>> {
        let evaluator = self.0.evaluator.as_ref()?;
        Some(self.0.value.get_or_init(|| evaluator.evaluate(self)))
    }

    /// Generates a string that stores the tree in a pretty-printed JSON format.
    #[cfg(feature = "pretty-print")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'i> fmt::Display for Node<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name().unwrap_or("anon"), self.as_str())
    }
}

impl<'i> fmt::Debug for Node<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("span", &self.as_range())
            .field("text", &self.as_str())
            .field("children", &self.0.children)
            .finish()
    }
}

impl<'i> PartialEq for Node<'i> {
    fn eq(&self, other: &Node<'i>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.name() == other.name()
                && self.as_range() == other.as_range()
                && self.as_str() == other.as_str()
                && self.0.children == other.0.children)
    }
}

impl<'i> Eq for Node<'i> {}

#[cfg(feature = "pretty-print")]
impl<'i> serde::Serialize for Node<'i> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser = serializer.serialize_struct("Node", 3)?;
        ser.serialize_field("pos", &(self.start(), self.end()))?;
        ser.serialize_field("name", &self.name().unwrap_or("anon"))?;

        if self.is_leaf() {
            ser.serialize_field("inner", self.as_str())?;
        } else {
            ser.serialize_field("inner", self.leafs())?;
        }

        ser.end()
    }
}

/// Pre-order iterator over a node and its descendants, created by [`Node::descendants`].
///
/// [`Node::descendants`]: struct.Node.html#method.descendants
pub struct Descendants<'a, 'i> {
    stack: Vec<&'a Node<'i>>,
}

impl<'a, 'i> Iterator for Descendants<'a, 'i> {
    type Item = &'a Node<'i>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.leafs().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::*;

    fn letters() -> Rule {
        node("letter", char(char::is_alphabetic)).one_or_more()
    }

    #[test]
    fn display() {
        let named = node("node", match_char('a')).parse_tree("a").unwrap();
        let anon = crate::value::text(match_char('a')).parse_tree("a").unwrap();

        assert_eq!(named.to_string(), "node: a");
        assert_eq!(anon.to_string(), "anon: a");
    }

    #[test]
    fn synthetic_wrapper() {
        let tree = letters().parse_tree("abc1").unwrap();

        assert_eq!(tree.name(), Some("(letter)+"));
        assert_eq!(tree.as_range(), 0..4);
        assert_eq!(tree.leafs().len(), 3);
        assert!(tree.leafs().iter().all(Node::is_leaf));
    }

    #[test]
    fn empty_wrapper() {
        let tree = letters().optional().parse_tree("123").unwrap();

        assert!(tree.is_leaf());
        assert_eq!(tree.as_str(), "123");
    }

    #[test]
    fn single_top_level_node_is_returned() {
        let word = node("word", letters());
        let tree = word.parse_tree("ab cd").unwrap();

        assert_eq!(tree.name(), Some("word"));
        assert_eq!(tree.as_str(), "ab");
        assert_eq!(tree.rule(), &word);
    }

    #[test]
    fn descendants_pre_order() {
        let tree = node("word", letters()).parse_tree("ab").unwrap();
        let texts: Vec<_> = tree.descendants().map(Node::as_str).collect();

        assert_eq!(texts, vec!["ab", "a", "b"]);
    }

    #[test]
    fn find_nodes_by_predicate() {
        let tree = node("word", letters()).parse_tree("abc").unwrap();

        assert_eq!(tree.find_nodes(|n| n.name() == Some("letter")).count(), 3);
    }

    #[test]
    fn zero_width_node() {
        let tree = node("empty", start()).parse_tree("abc").unwrap();

        assert!(tree.is_empty());
        assert_eq!(tree.as_str(), "");
    }

    #[test]
    #[cfg(feature = "pretty-print")]
    fn to_json() {
        let tree = node("word", letters()).parse_tree("ab").unwrap();

        let expected = r#"{
  "pos": [
    0,
    2
  ],
  "name": "word",
  "inner": [
    {
      "pos": [
        0,
        1
      ],
      "name": "letter",
      "inner": "a"
    },
    {
      "pos": [
        1,
        2
      ],
      "name": "letter",
      "inner": "b"
    }
  ]
}"#;

        assert_eq!(tree.to_json().unwrap(), expected);
    }
}
