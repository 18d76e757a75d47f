//! Errors surfaced by a parse.

use parsley_core::ScanError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The grammar did not match. `position` is the furthest offset any leaf
    /// was tried at; `expected` lists the labels of the leaves that failed there.
    #[error("no match at {line}:{column}{}", expected_suffix(.expected))]
    NoMatch {
        position: usize,
        line: usize,
        column: usize,
        expected: Vec<String>,
    },

    /// Execution fuel exhausted (too many element evaluations).
    #[error("execution limit of {0} steps exceeded")]
    ExecFuelExhausted(u32),

    /// Elements nested deeper than the recursion limit.
    #[error("recursion limit of {0} exceeded")]
    RecursionLimitExceeded(u32),

    /// A recursive rule was evaluated after its defining element was dropped.
    #[error("recursive rule <{0}> is no longer alive")]
    DanglingRule(String),

    /// Unbalanced scanner marks: an evaluator bug, never a property of the input.
    #[error(transparent)]
    Scanner(#[from] ScanError),
}

fn expected_suffix(expected: &[String]) -> String {
    match expected {
        [] => String::new(),
        [only] => format!(": expected {only}"),
        [init @ .., last] => format!(": expected {} or {last}", init.join(", ")),
    }
}

impl ParseError {
    pub fn is_no_match(&self) -> bool {
        matches!(self, ParseError::NoMatch { .. })
    }
}
