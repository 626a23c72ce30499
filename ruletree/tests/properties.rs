// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Combinator laws checked over generated inputs.

use once_cell::sync::Lazy;
use proptest::prelude::*;

use ruletree::grammar::*;
use ruletree::{ParserConfig, ParserState, Rule};

static LETTERS: Lazy<Rule> = Lazy::new(|| node("letters", char_range('a', 'c').one_or_more()));
static DIGITS: Lazy<Rule> =
    Lazy::new(|| node("digits", char(|c| c.is_ascii_digit()).one_or_more()));

static LIST: Lazy<Rule> = Lazy::new(|| {
    let item = node(
        "item",
        &*DIGITS | &*LETTERS | (match_char('(') + func(|| LIST.clone()) + ')'),
    );
    node("list", &item + (match_char(',') + &item).zero_or_more())
});

fn input() -> impl Strategy<Value = String> {
    "[abc0-9(),x]{0,24}"
}

fn end_position(rule: &Rule, input: &str) -> Option<usize> {
    rule.apply(ParserState::new(input))
        .ok()
        .map(|state| state.position())
}

fn end_position_from(rule: &Rule, input: &str, position: usize) -> Option<usize> {
    ParserState::new_at(input, position)
        .ok()
        .and_then(|state| rule.apply(state).ok())
        .map(|state| state.position())
}

proptest! {
    #[test]
    fn memoization_is_transparent(input in input()) {
        let no_memo = ParserConfig::new().memoize(false);

        prop_assert_eq!(
            LIST.parse_tree(&input),
            LIST.parse_tree_with(&input, &no_memo)
        );
    }

    #[test]
    fn parsing_is_deterministic(input in input()) {
        prop_assert_eq!(LIST.parse_tree(&input), LIST.parse_tree(&input));
    }

    #[test]
    fn not_never_advances(input in input()) {
        let rule = LIST.not();

        match rule.apply(ParserState::new(&input)) {
            Ok(state) => {
                prop_assert_eq!(state.position(), 0);
                prop_assert!(state.nodes().is_empty());
                prop_assert!(!LIST.is_match(&input));
            }
            Err(state) => {
                prop_assert_eq!(state.position(), 0);
                prop_assert!(LIST.is_match(&input));
            }
        }
    }

    #[test]
    fn repetition_always_succeeds(input in input()) {
        prop_assert!(LETTERS.zero_or_more().is_match(&input));
        prop_assert!(LIST.optional().is_match(&input));
    }

    #[test]
    fn one_or_more_is_one_then_zero_or_more(input in input()) {
        let plus = end_position(&DIGITS.one_or_more(), &input);
        let once_then_star = end_position(&(&*DIGITS + DIGITS.zero_or_more()), &input);

        prop_assert_eq!(plus, once_then_star);
    }

    #[test]
    fn sequence_matches_parts_in_order(input in input()) {
        let sequence = &*LETTERS + &*DIGITS;

        let expected = end_position(&LETTERS, &input)
            .and_then(|middle| end_position_from(&DIGITS, &input, middle));

        prop_assert_eq!(end_position(&sequence, &input), expected);
    }

    #[test]
    fn choice_takes_first_alternative(input in input()) {
        let choice = &*LETTERS | &*DIGITS;

        let expected = end_position(&LETTERS, &input).or_else(|| end_position(&DIGITS, &input));

        prop_assert_eq!(end_position(&choice, &input), expected);
    }

    #[test]
    fn failed_match_restores_state(input in input()) {
        let rule = &*LIST + end();

        if let Err(state) = rule.apply(ParserState::new(&input)) {
            prop_assert_eq!(state.position(), 0);
            prop_assert!(state.nodes().is_empty());
        }
    }
}
