// ruletree. Composable packrat grammars
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! # ruletree grammars
//!
//! Contains a series of common sub-grammars and value conveniences built from the
//! `ruletree` constructors.
//!
//! ```
//! use ruletree::grammar::end;
//! use ruletree_grammars::{int32, FLOAT};
//!
//! assert!((FLOAT.clone() + end()).is_match("-1.5e3"));
//! assert_eq!(int32().first_value("0x1F").unwrap(), 31);
//! ```

#![doc(html_root_url = "https://docs.rs/ruletree_grammars")]

mod enums;
mod numbers;
mod shared;

pub use crate::enums::{enum_value, key_value};
pub use crate::numbers::{binary_number, binary_string, int16, int32, int64, int8};
pub use crate::shared::*;
