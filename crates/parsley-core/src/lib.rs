#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Low-level text primitives for Parsley.
//!
//! - [`CharSet`]: membership predicate over `char`, composable via union
//! - [`Regex`]: regular expression matched as an anchored prefix at a cursor
//! - [`Scanner`]: backtrackable cursor over a `&str` with a skip-set
//! - [`Colors`]: ANSI palette shared by trace and value rendering

pub mod charset;
pub mod colors;
pub mod regex;
pub mod scanner;


pub use charset::{CharSet, Class};
pub use colors::Colors;
pub use regex::{Regex, RegexError, RegexMatch};
pub use scanner::{Mark, ScanError, Scanner};
