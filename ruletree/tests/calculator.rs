// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

#[macro_use]
extern crate ruletree;

use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;

use ruletree::grammar::{char, end, func, match_char, node};
use ruletree::value::{accumulate, convert_node_to_value, try_convert_to_value};
use ruletree::{Rule, ValueRule};

static NUMBER: Lazy<ValueRule<i64>> = Lazy::new(|| {
    try_convert_to_value(str::parse::<i64>, char(|c| c.is_ascii_digit()).one_or_more())
        .named("number")
});

static PRIMARY: Lazy<Rule> =
    Lazy::new(|| &*NUMBER | (match_char('(') + func(|| SUM.rule().clone()) + ')'));

static PRODUCT: Lazy<ValueRule<i64>> = Lazy::new(|| {
    accumulate(
        |l: i64, r: i64| l * r,
        &*PRIMARY + (match_char('*') + &*PRIMARY).zero_or_more(),
    )
    .named("product")
});

static SUM: Lazy<ValueRule<i64>> = Lazy::new(|| {
    accumulate(
        |l: i64, r: i64| l + r,
        &*PRODUCT + (match_char('+') + &*PRODUCT).zero_or_more(),
    )
    .named("sum")
});

static CALCULATOR: Lazy<Rule> = Lazy::new(|| &*SUM + end());

fn evaluate(input: &str) -> i64 {
    CALCULATOR.first_value::<i64>(input).unwrap()
}

#[test]
fn single_number() {
    assert_eq!(evaluate("42"), 42);
}

#[test]
fn precedence() {
    assert_eq!(evaluate("1+2*3"), 7);
    assert_eq!(evaluate("2*3+1"), 7);
}

#[test]
fn parentheses() {
    assert_eq!(evaluate("2*(3+4)"), 14);
    assert_eq!(evaluate("((1+1)*(2+2))"), 8);
}

#[test]
fn incomplete_input() {
    assert!(!CALCULATOR.is_match("1+"));
    assert!(!CALCULATOR.is_match("(1+2"));
    assert!(CALCULATOR.first_value::<i64>("2*").is_err());
}

#[test]
fn tree() {
    parses_to! {
        rule: *CALCULATOR,
        input: "1+2*3",
        nodes: [
            sum(0, 5, [
                product(0, 1, [
                    number(0, 1)
                ]),
                product(2, 5, [
                    number(2, 3),
                    number(4, 5)
                ])
            ])
        ]
    };
}

#[test]
fn nested_sum_is_one_value() {
    let tree = CALCULATOR.parse_tree("(1+2)*3").unwrap();
    let product = tree.first_node_by_name("product").unwrap();

    assert_eq!(product.leafs().len(), 2);
    assert_eq!(product.leafs()[0].name(), Some("sum"));
    assert_eq!(product.value::<i64>().unwrap(), 9);
}

#[test]
fn operators_from_node() {
    // Left-to-right subtraction over the number children.
    let number = NUMBER.rule().clone();
    let difference = convert_node_to_value(
        |node| {
            let mut values = node.leafs().iter().filter_map(|n| n.try_get_value::<i64>());
            let first = values.next().unwrap_or_default();
            values.fold(first, |l, r| l - r)
        },
        &number + (node("minus", '-') + &number).zero_or_more(),
    );

    assert_eq!(difference.value("10-3-2").unwrap(), 5);
}
