//! Parsley: composable parser combinators with backtracking.
//!
//! Grammars are trees of [`Element`]s built from a few primitives
//! ([`literal`], [`pattern`], [`double`]) and combinators (`+` for sequence,
//! `|` for ordered choice, repetition, [`DelimitedList`]). Parsing a string
//! yields a [`Value`] tree shaped by the grammar.
//!
//! # Example
//!
//! ```
//! use parsley::{DelimitedList, Value, double, literal, one_or_more, pattern};
//!
//! let name = pattern(r"[a-zA-Z]+").expect("valid pattern");
//! let arguments = DelimitedList::new(double()).build().make_flattened();
//! let transform =
//!     name + literal("(").make_stripped() + arguments + literal(")").make_stripped();
//! let transforms = one_or_more(transform);
//!
//! let result = transforms.parse("translate(0, 0) scale(2)").expect("parses");
//! assert_eq!(result[0], Value::from(vec![Value::from("translate"), 0.0.into(), 0.0.into()]));
//! assert_eq!(result[1], Value::from(vec![Value::from("scale"), 2.0.into()]));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;
pub mod grammar;
pub mod value;


pub use engine::{
    Evaluator, EvaluatorBuilder, FuelLimits, NoopTracer, ParseError, PrintTracer, Tracer,
    Verbosity,
};
pub use grammar::{
    Capture, Converter, DelimitedList, Element, GrammarError, alternation, double, end_of_input,
    integer, literal, one_or_more, pattern, pattern_groups, repeat, sequence, zero_or_more,
    zero_or_one,
};
pub use value::Value;

pub use parsley_core::{CharSet, Class, Colors, Regex, Scanner};
