// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use pretty_assertions::assert_eq;

use ruletree::grammar::*;
use ruletree::value::*;
use ruletree::{Error, Rule, ValueRule};

fn number() -> ValueRule<i64> {
    try_convert_to_value(str::parse::<i64>, char(|c| c.is_ascii_digit()).one_or_more())
}

fn add() -> ValueRule<i64> {
    accumulate(|l: i64, r: i64| l + r, number() + '+' + number())
}

#[test]
fn add_values() {
    assert_eq!(add().first_value("5+6").unwrap(), 11);
    assert_eq!(add().first_value("15+6").unwrap(), 21);
    assert!(add().first_value("5+").is_err());
}

#[test]
fn nested_letter_sums() {
    let letter = convert_to_value(
        |text: &str| text.chars().map(|c| c as u32 - 'a' as u32 + 1).sum::<u32>(),
        char_range('a', 'z'),
    );
    let word = accumulate(|l: u32, r: u32| l + r, letter.one_or_more());
    let sentence = accumulate(
        |l: u32, r: u32| l * r,
        &word + (match_char(' ') + &word).zero_or_more(),
    );

    // (a + b) * (c + d)
    assert_eq!(sentence.value("ab cd").unwrap(), 21);
}

#[test]
fn values_by_name() {
    let name = text(char(char::is_alphabetic).one_or_more()).named("name");
    let age = try_convert_to_value(
        str::parse::<u8>,
        char(|c| c.is_ascii_digit()).one_or_more(),
    )
    .named("age");
    let person = node("person", &name + ':' + &age);

    let tree = person.parse_tree("ada:36").unwrap();

    assert_eq!(tree.first_value_by_name::<String>("name").unwrap(), "ada");
    assert_eq!(tree.first_value_by_name::<u8>("age").unwrap(), 36);
    assert!(tree.first_value_by_name::<u8>("name").is_err());
    assert_eq!(tree.first_value_by_name_or_default::<u8>("height").unwrap(), 0);
    assert_eq!(tree.first_node_by_name("age").unwrap().as_str(), "36");
    assert!(tree.first_node_by_name("height").is_err());
    assert!(tree.find_first_node_by_name("height").is_none());
}

#[test]
fn rule_level_shortcuts() {
    let rule: Rule = number() + (match_char(',') + number()).zero_or_more();

    assert_eq!(rule.first_value::<i64>("4,5,6").unwrap(), 4);
    assert_eq!(rule.process("4,5,6", |l: i64, r: i64| l + r).unwrap(), 15);
    assert!(rule.contains_value_node::<i64>("4").unwrap());
    assert!(!rule.contains_value_node::<u8>("4").unwrap());
    assert_eq!(rule.first_value_or_default::<u8>("4").unwrap(), 0);
    assert_eq!(rule.try_get_value::<i64>("4,5"), None);
    assert!(rule.first_value::<i64>("x").is_err());
}

#[test]
fn defaults_when_input_does_not_match() {
    let digits = number().named("n");

    assert_eq!(digits.rule().first_value_or_default::<i64>("x").unwrap(), 0);
    assert_eq!(digits.first_value_or_default("x").unwrap(), 0);
    assert_eq!(digits.first_value_by_name_or_default("x", "n").unwrap(), 0);
    assert!(!digits.contains_value_node("x").unwrap());
    assert!(!digits.rule().contains_value_node::<i64>("x").unwrap());
    assert!(!digits.contains_any_value_node("x").unwrap());
    assert!(digits.find_first_value_node::<i64>("x").unwrap().is_none());

    // the strict forms still report the failed parse
    assert!(matches!(digits.first_value("x"), Err(Error::Parse { .. })));
    assert!(digits.first_value_node::<i64>("x").is_err());
}

#[test]
fn evaluation_errors_are_not_defaulted() {
    let byte = try_convert_to_value(
        str::parse::<u8>,
        char(|c| c.is_ascii_digit()).one_or_more(),
    );

    assert!(byte.first_value_or_default("999").unwrap_err().is_evaluation());
    assert_eq!(byte.first_value_or_default("x").unwrap(), 0);
}

#[test]
fn value_nodes_from_rules() {
    let digits = number();
    let list: Rule = node("list", &digits + (match_char(',') + &digits).zero_or_more());

    assert!(digits.is_value_rule::<i64>());
    assert!(!digits.is_value_rule::<u8>());
    assert!(digits.is_any_value_rule());
    assert!(!list.is_any_value_rule());

    let first = list.first_value_node::<i64>("12,34").unwrap();
    assert_eq!(first.as_str(), "12");
    assert_eq!(first.value::<i64>().unwrap(), 12);
    assert!(list.find_first_value_node::<u8>("12,34").unwrap().is_none());
    assert!(list.contains_any_value_node("12").unwrap());
    assert!(!node("word", string("ab")).contains_any_value_node("ab").unwrap());
}

#[test]
fn process_does_not_descend_into_values() {
    let pair = accumulate(|l: i64, r: i64| l * r, number() + '*' + number());
    let list = &pair + (match_char(',') + &pair).zero_or_more();

    // 2 * 3 + 4 * 5, the inner numbers are folded by their pairs
    assert_eq!(list.process::<i64, _>("2*3,4*5", |l, r| l + r).unwrap(), 26);
}

#[test]
fn process_without_values_is_default() {
    let tree = node("word", string("abc")).parse_tree("abc").unwrap();

    assert_eq!(tree.process(|l: i64, r: i64| l + r).unwrap(), 0);
    assert!(!tree.contains_any_value_node());
}

#[test]
fn value_rule_shortcuts() {
    let flag = constant_value(true, string_insensitive("on")).named("flag");
    let flags = node("flags", &flag + (match_char(',') + &flag).zero_or_more());

    assert!(flag.value("ON").unwrap());
    assert_eq!(flag.try_get_value("off"), None);
    assert!(flag.contains_value_node("on").unwrap());
    assert!(flag.first_value_by_name("on", "flag").unwrap());
    assert!(!flag.first_value_by_name_or_default("on", "other").unwrap());

    let tree = flags.parse_tree("on,On").unwrap();
    assert_eq!(tree.find_nodes(|n| n.is_value_node::<bool>()).count(), 2);
    assert!(tree.contains_any_value_node());
}

#[test]
fn first_value_is_depth_first_from_the_root() {
    let inner = node("inner", number());
    let rule = node("outer", &inner + '-' + number());

    assert_eq!(rule.first_value::<i64>("7-8").unwrap(), 7);
}

#[test]
fn conversion_errors_surface_on_read() {
    let byte = try_convert_to_value(
        str::parse::<u8>,
        char(|c| c.is_ascii_digit()).one_or_more(),
    );
    let tree = byte.parse_tree("999").unwrap();

    assert!(tree.value::<u8>().unwrap_err().is_evaluation());
    assert_eq!(tree.try_get_value::<u8>(), None);
    assert_eq!(tree.value::<u8>(), tree.value::<u8>());
}

#[test]
fn range_over_converted_values() {
    let percentage = range(0i64, 100, number());

    assert_eq!(percentage.value("55").unwrap(), 55);
    assert!(percentage.value("101").unwrap_err().is_evaluation());
}

#[test]
fn wrong_type_is_an_error() {
    let tree = number().parse_tree("12").unwrap();

    assert!(tree.is_value_node::<i64>());
    assert!(!tree.is_value_node::<i32>());
    assert!(tree.value::<i32>().unwrap_err().is_evaluation());
}
