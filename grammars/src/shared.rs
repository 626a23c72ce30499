// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use once_cell::sync::Lazy;

use ruletree::grammar::{char, match_char, or, string, string_insensitive};
use ruletree::Rule;

/// One or more whitespace characters.
pub static WHITESPACE: Lazy<Rule> =
    Lazy::new(|| char(char::is_whitespace).one_or_more().named("whitespace"));

/// One or more word characters: letters, digits and `_`.
pub static WORD: Lazy<Rule> = Lazy::new(|| {
    char(|c| c.is_alphanumeric() || c == '_')
        .one_or_more()
        .named("word")
});

/// A single decimal digit.
pub static DIGIT: Lazy<Rule> = Lazy::new(|| char(|c| c.is_ascii_digit()).named("digit"));

/// One or more decimal digits.
pub static DIGITS: Lazy<Rule> = Lazy::new(|| DIGIT.one_or_more().named("digits"));

/// A single letter.
pub static LETTER: Lazy<Rule> = Lazy::new(|| char(char::is_alphabetic).named("letter"));

/// One or more letters.
pub static LETTERS: Lazy<Rule> = Lazy::new(|| LETTER.one_or_more().named("letters"));

/// A letter or `_`, followed by any number of letters, digits and `_`.
pub static LABEL: Lazy<Rule> = Lazy::new(|| {
    ((&*LETTER | '_') + (&*DIGIT | &*LETTER | '_').zero_or_more()).named("label")
});

/// `+` or `-`.
pub static PLUS_OR_MINUS: Lazy<Rule> =
    Lazy::new(|| (match_char('+') | '-').named("plus_or_minus"));

/// `e` or `E` with an optional sign.
pub static E: Lazy<Rule> =
    Lazy::new(|| ((match_char('e') | 'E') + PLUS_OR_MINUS.optional()).named("e"));

/// An exponent such as `e10` or `E-3`.
pub static EXPONENTIAL: Lazy<Rule> = Lazy::new(|| (&*E + &*DIGITS).named("exponential"));

/// A signed integer with an optional exponent. Fails on the integer part of a float.
pub static INTEGER: Lazy<Rule> = Lazy::new(|| {
    (PLUS_OR_MINUS.optional() + &*DIGITS + match_char('.').not() + EXPONENTIAL.optional())
        .named("integer")
});

/// A signed decimal number with a fractional part and an optional exponent.
pub static FLOAT: Lazy<Rule> = Lazy::new(|| {
    (PLUS_OR_MINUS.optional() + &*DIGITS + '.' + &*DIGITS + EXPONENTIAL.optional())
        .named("float")
});

/// A single hexadecimal digit.
pub static HEX: Lazy<Rule> = Lazy::new(|| char(|c| c.is_ascii_hexdigit()).named("hex"));

/// A hexadecimal number, either `0x`-prefixed or `h`-suffixed.
pub static HEX_NUMBER: Lazy<Rule> = Lazy::new(|| {
    ((string_insensitive("0x") + HEX.one_or_more()) | (HEX.one_or_more() + (match_char('h') | 'H')))
        .named("hex_number")
});

/// `0` or `1`.
pub static BINARY_DIGIT: Lazy<Rule> =
    Lazy::new(|| (match_char('0') | '1').named("binary_digit"));

/// Ordered choice over the space separated words of `words`.
///
/// # Examples
///
/// ```
/// # use ruletree_grammars::match_any_string;
/// let keyword = match_any_string("select from where", true);
///
/// assert!(keyword.is_match("FROM"));
/// assert!(!keyword.is_match("join"));
/// ```
pub fn match_any_string(words: &str, ignore_case: bool) -> Rule {
    or(words.split_whitespace().map(|word| {
        if ignore_case {
            string_insensitive(word)
        } else {
            string(word)
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit() {
        assert!(DIGIT.is_match("1"));
        assert!(!DIGIT.is_match("a"));
        assert!(!DIGIT.is_match(" "));
    }

    #[test]
    fn digits() {
        assert!(DIGITS.is_match("123"));
        assert!(!DIGITS.is_match("a1"));
        assert!(!DIGITS.is_match(" 1"));
    }

    #[test]
    fn e() {
        assert!(E.is_match("e+1"));
        assert!(E.is_match("E+1"));
        assert!(E.is_match("e-1"));
    }

    #[test]
    fn exponential() {
        assert!(EXPONENTIAL.is_match("e+10"));
        assert!(EXPONENTIAL.is_match("E+10"));
        assert!(EXPONENTIAL.is_match("e-10"));
        assert!(EXPONENTIAL.is_match("e10"));
        assert!(!EXPONENTIAL.is_match("e^1"));
        assert!(!EXPONENTIAL.is_match("e-"));
    }

    #[test]
    fn float() {
        assert!(!FLOAT.is_match("10"));
        assert!(!FLOAT.is_match("-10"));
        assert!(FLOAT.is_match("10.23"));
        assert!(FLOAT.is_match("-10.23"));
        assert!(FLOAT.is_match("+10.23"));
    }

    #[test]
    fn integer() {
        assert!(INTEGER.is_match("10"));
        assert!(INTEGER.is_match("-10"));
        assert!(INTEGER.is_match("+10"));
        assert!(!INTEGER.is_match("10.23"));
        assert!(!INTEGER.is_match("-10.23"));
    }

    #[test]
    fn hex() {
        assert!(HEX.is_match("A"));
        assert!(HEX.is_match("b"));
        assert!(HEX.is_match("0"));
        assert!(!HEX.is_match("g"));
    }

    #[test]
    fn hex_number() {
        assert!(HEX_NUMBER.is_match("0x1F"));
        assert!(HEX_NUMBER.is_match("0XfF"));
        assert!(HEX_NUMBER.is_match("1Fh"));
        assert!(!HEX_NUMBER.is_match("1F"));
        assert!(!HEX_NUMBER.is_match("0x"));
    }

    #[test]
    fn letters() {
        assert!(!LETTERS.is_match("123"));
        assert!(LETTERS.is_match("aa 123"));
        assert!(!LETTER.is_match(" "));
    }

    #[test]
    fn label() {
        assert!(LABEL.is_match("_tmp1"));
        assert!(LABEL.is_match("x"));
        assert!(!LABEL.is_match("1x"));
    }

    #[test]
    fn whitespace_and_word() {
        assert!(WHITESPACE.is_match(" "));
        assert!(WHITESPACE.is_match("\r"));
        assert!(!WHITESPACE.is_match("test"));
        assert!(WORD.is_match("word"));
        assert!(WORD.is_match("123 abc"));
        assert!(!WORD.is_match("\t"));
    }

    #[test]
    fn named_shared_rules() {
        assert_eq!(INTEGER.to_string(), "integer");
        assert_eq!(
            INTEGER.definition(),
            "((plus_or_minus)? + digits + Not('.') + (exponential)?)"
        );
    }

    #[test]
    fn any_string() {
        let pets = match_any_string("cat dog", false);

        assert!(pets.is_match("dog"));
        assert!(!pets.is_match("Dog"));
        assert_eq!(pets.definition(), "(\"cat\" | \"dog\")");
    }
}
