//! Evaluation of grammar elements against input text.

mod error;
mod evaluator;
mod output;
mod trace;

#[cfg(test)]
mod evaluator_tests;
#[cfg(test)]
mod trace_tests;

pub use error::ParseError;
pub use evaluator::{Evaluator, EvaluatorBuilder, FuelLimits};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};

use crate::grammar::Element;
use crate::value::Value;

impl Element {
    /// Parse a prefix of `input` with default settings: whitespace is
    /// skipped before every token and trailing input is allowed.
    pub fn parse(&self, input: &str) -> Result<Value, ParseError> {
        Evaluator::builder(input).build().evaluate(self)
    }

    /// Like [`Element::parse`], also returning the byte offset where the
    /// match ends.
    pub fn parse_prefix(&self, input: &str) -> Result<(Value, usize), ParseError> {
        Evaluator::builder(input).build().evaluate_prefix(self)
    }

    /// Like [`Element::parse`], but only skip-set characters may follow the
    /// match.
    pub fn parse_all(&self, input: &str) -> Result<Value, ParseError> {
        Evaluator::builder(input)
            .require_end(true)
            .build()
            .evaluate(self)
    }
}
