// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::num::ParseIntError;

use ruletree::grammar::{match_char, string_insensitive};
use ruletree::value::{first_value, try_convert_to_value};
use ruletree::{Value, ValueRule};

use crate::shared::{BINARY_DIGIT, HEX_NUMBER, INTEGER};

type Parse<T> = fn(&str) -> Result<T, ParseIntError>;

fn strip_radix<'a>(text: &'a str, prefix: &str, suffix: char) -> &'a str {
    let lower = text.get(..prefix.len()).map(str::to_ascii_lowercase);

    if lower.as_deref() == Some(prefix) && text.len() > prefix.len() {
        &text[prefix.len()..]
    } else {
        text.strip_suffix(suffix)
            .or_else(|| text.strip_suffix(suffix.to_ascii_uppercase()))
            .unwrap_or(text)
    }
}

fn hex_digits(text: &str) -> &str {
    strip_radix(text, "0x", 'h')
}

fn binary_digits(text: &str) -> &str {
    strip_radix(text, "0b", 'b')
}

/// Hexadecimal (`hex`) or decimal (`dec`) integer, hexadecimal first.
fn integer<T: Value>(hex: Parse<T>, dec: Parse<T>) -> ValueRule<T> {
    first_value(
        try_convert_to_value(hex, &*HEX_NUMBER).named("hex")
            | try_convert_to_value(dec, &*INTEGER).named("dec"),
    )
}

/// A byte (`0..=255`) written in decimal or hexadecimal.
pub fn int8() -> ValueRule<u8> {
    integer(|text| u8::from_str_radix(hex_digits(text), 16), str::parse::<u8>)
}

/// An `i16` written in decimal or hexadecimal.
pub fn int16() -> ValueRule<i16> {
    integer(
        |text| u16::from_str_radix(hex_digits(text), 16).map(|bits| bits as i16),
        str::parse::<i16>,
    )
}

/// An `i32` written in decimal or hexadecimal.
///
/// # Examples
///
/// ```
/// # use ruletree_grammars::int32;
/// assert_eq!(int32().first_value("-42").unwrap(), -42);
/// assert_eq!(int32().first_value("0x2A").unwrap(), 42);
/// assert_eq!(int32().first_value("2Ah").unwrap(), 42);
/// ```
pub fn int32() -> ValueRule<i32> {
    integer(
        |text| u32::from_str_radix(hex_digits(text), 16).map(|bits| bits as i32),
        str::parse::<i32>,
    )
}

/// An `i64` written in decimal or hexadecimal.
pub fn int64() -> ValueRule<i64> {
    integer(
        |text| u64::from_str_radix(hex_digits(text), 16).map(|bits| bits as i64),
        str::parse::<i64>,
    )
}

/// A binary number, either `0b`-prefixed or `b`-suffixed.
pub fn binary_number() -> ValueRule<u64> {
    let prefixed = string_insensitive("0b") + BINARY_DIGIT.one_or_more();
    let suffixed = BINARY_DIGIT.one_or_more() + (match_char('b') | 'B');

    try_convert_to_value(
        |text: &str| u64::from_str_radix(binary_digits(text), 2),
        prefixed | suffixed,
    )
}

/// Renders `value` in binary.
///
/// With a `width` the result is padded with leading zeros, or cut down to its `width`
/// low-order digits.
///
/// # Examples
///
/// ```
/// # use ruletree_grammars::binary_string;
/// assert_eq!(binary_string(5, None), "101");
/// assert_eq!(binary_string(5, Some(8)), "00000101");
/// assert_eq!(binary_string(0b1101, Some(2)), "01");
/// ```
pub fn binary_string(value: u64, width: Option<usize>) -> String {
    let digits = format!("{:b}", value);

    match width {
        Some(width) if digits.len() < width => format!("{:0>width$}", digits, width = width),
        Some(width) => digits[digits.len() - width..].to_owned(),
        None => digits,
    }
}
