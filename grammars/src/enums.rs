// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use ruletree::grammar::{or, string_insensitive};
use ruletree::value::{constant_value, first_value};
use ruletree::{Value, ValueRule};

/// Matches `key` ignoring case; the node is named `key` and carries `value`.
pub fn key_value<T: Value>(key: &str, value: T) -> ValueRule<T> {
    constant_value(value, string_insensitive(key)).named(key)
}

/// Matches one of the labels of `members`, ignoring case, and carries the value paired with
/// it. Labels are tried in order, so a label that is a prefix of a later one shadows it.
///
/// # Examples
///
/// ```
/// # use ruletree_grammars::enum_value;
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// let color = enum_value("color", &[("red", Color::Red), ("green", Color::Green)]);
///
/// assert_eq!(color.value("GREEN").unwrap(), Color::Green);
/// assert!(color.value("blue").is_err());
/// ```
pub fn enum_value<T: Value>(name: &str, members: &[(&str, T)]) -> ValueRule<T> {
    let choices = members
        .iter()
        .map(|(label, value)| key_value(label, value.clone()));

    first_value(or(choices)).named(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_node() {
        let yes = key_value("yes", true);
        let tree = yes.parse_tree("YeS").unwrap();

        assert_eq!(tree.name(), Some("yes"));
        assert!(tree.value::<bool>().unwrap());
    }

    #[test]
    fn enum_members_in_order() {
        let size = enum_value("size", &[("s", 1u8), ("small", 2)]);
        let tree = size.parse_tree("small").unwrap();

        assert_eq!(tree.name(), Some("size"));
        assert_eq!(tree.value::<u8>().unwrap(), 1);
        assert_eq!(tree.as_str(), "s");
    }
}
