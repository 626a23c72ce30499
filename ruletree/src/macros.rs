// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Testing helpers behind the `parses_to!` and `fails_with!` macros.

use crate::node::Node;

/// Shape of a node as written in a `parses_to!` invocation.
#[doc(hidden)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExpectedNode {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub children: Vec<ExpectedNode>,
}

impl ExpectedNode {
    #[doc(hidden)]
    pub fn from_node(node: &Node<'_>) -> Self {
        ExpectedNode {
            name: node.name().unwrap_or("anon").to_owned(),
            start: node.start(),
            end: node.end(),
            children: node.leafs().iter().map(ExpectedNode::from_node).collect(),
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! expected_nodes {
    ( [ $( $name:ident ( $start:expr, $end:expr $( , [ $( $names:ident $calls:tt ),* $(,)? ] )? ) ),* $(,)? ] ) => {
        ::std::vec![
            $(
                $crate::macros::ExpectedNode {
                    name: ::std::string::ToString::to_string(stringify!($name)),
                    start: $start,
                    end: $end,
                    children: $crate::expected_nodes!([ $( $( $names $calls ),* )? ]),
                }
            ),*
        ]
    };
}

/// Testing tool that compares the nodes captured by a rule with a description of the
/// expected tree.
///
/// Nodes are written as `name(start, end)` or `name(start, end, [children])`. Unnamed nodes
/// (produced by value rules) are written as `anon`. The rule only has to match a prefix of
/// the input.
///
/// # Examples
///
/// ```
/// # #[macro_use]
/// # extern crate ruletree;
/// # use ruletree::grammar::{match_char, node};
/// # fn main() {
/// let b = node("b", match_char('b'));
/// let a = node("a", match_char('a') + &b + 'c');
/// let abc = &a + ' ' + &a;
///
/// parses_to! {
///     rule: abc,
///     input: "abc abc",
///     nodes: [
///         a(0, 3, [
///             b(1, 2)
///         ]),
///         a(4, 7, [
///             b(5, 6)
///         ])
///     ]
/// };
/// # }
/// ```
#[macro_export]
macro_rules! parses_to {
    ( rule: $rule:expr, input: $input:expr, nodes: [ $( $names:ident $calls:tt ),* $(,)? ] ) => {
        {
            let rule: $crate::Rule = ::std::convert::Into::into(&$rule);
            let expected: ::std::vec::Vec<$crate::macros::ExpectedNode> =
                $crate::expected_nodes!([ $( $names $calls ),* ]);

            match rule.apply($crate::ParserState::new($input)) {
                ::std::result::Result::Ok(state) => {
                    let actual: ::std::vec::Vec<$crate::macros::ExpectedNode> = state
                        .nodes()
                        .iter()
                        .map($crate::macros::ExpectedNode::from_node)
                        .collect();

                    assert_eq!(actual, expected);
                }
                ::std::result::Result::Err(_) => {
                    panic!("expected `{}` to match {:?}", rule, $input)
                }
            }
        }
    };
}

/// Testing tool that asserts that a rule fails to parse an input.
///
/// # Examples
///
/// ```
/// # #[macro_use]
/// # extern crate ruletree;
/// # use ruletree::grammar::{end, string};
/// # fn main() {
/// let cat = string("cat") + end();
///
/// fails_with! {
///     rule: cat,
///     input: "cats"
/// };
/// # }
/// ```
#[macro_export]
macro_rules! fails_with {
    ( rule: $rule:expr, input: $input:expr ) => {
        {
            let rule: $crate::Rule = ::std::convert::Into::into(&$rule);

            match rule.parse_tree($input) {
                ::std::result::Result::Ok(node) => {
                    panic!("expected `{}` to fail on {:?}, got {:?}", rule, $input, node)
                }
                ::std::result::Result::Err(error) => assert_eq!(
                    error,
                    $crate::Error::Parse {
                        rule: ::std::string::ToString::to_string(&rule),
                        input: ::std::string::ToString::to_string($input),
                    }
                ),
            }
        }
    };
}

#[cfg(test)]
pub mod tests {
    use crate::grammar::*;
    use crate::value::text;
    use crate::Rule;

    fn abc() -> Rule {
        let b = node("b", match_char('b'));
        let a = node("a", match_char('a') + b + 'c');
        let c = node("c", match_char('e'));

        a + 'd' + c
    }

    #[test]
    fn parses_to() {
        parses_to! {
            rule: abc(),
            input: "abcde",
            nodes: [
                a(0, 3, [
                    b(1, 2)
                ]),
                c(4, 5)
            ]
        };
    }

    #[test]
    fn anonymous_nodes() {
        parses_to! {
            rule: text(string("hi")),
            input: "hi",
            nodes: [
                anon(0, 2)
            ]
        };
    }

    #[test]
    fn no_nodes() {
        parses_to! {
            rule: string("hi"),
            input: "hi",
            nodes: []
        };
    }

    #[test]
    #[should_panic]
    fn missing_end() {
        parses_to! {
            rule: abc(),
            input: "abcde",
            nodes: [
                a(0, 3, [
                    b(1, 2)
                ])
            ]
        };
    }

    #[test]
    #[should_panic]
    fn wrong_span() {
        parses_to! {
            rule: abc(),
            input: "abcde",
            nodes: [
                a(0, 3, [
                    b(1, 3)
                ]),
                c(4, 5)
            ]
        };
    }

    #[test]
    #[should_panic]
    fn no_match() {
        parses_to! {
            rule: abc(),
            input: "xyz",
            nodes: []
        };
    }

    #[test]
    fn fails() {
        fails_with! {
            rule: abc(),
            input: "abd"
        };
    }

    #[test]
    #[should_panic]
    fn does_not_fail() {
        fails_with! {
            rule: abc(),
            input: "abcde"
        };
    }
}
