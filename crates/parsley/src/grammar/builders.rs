//! Constructors for grammar elements.

use std::sync::{Arc, LazyLock};

use parsley_core::Regex;

use super::{Capture, Element, GrammarError, Kind};
use crate::value::Value;

static DOUBLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?")
        .expect("built-in double pattern is valid")
});

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+").expect("built-in integer pattern is valid"));

/// Match `text` exactly (after the skip-set).
pub fn literal(text: &str) -> Element {
    Element::from_kind(Kind::Literal(Arc::from(text)))
}

/// Match a regular expression anchored at the cursor. Produces the text of the
/// whole match. Invalid syntax fails here, never at parse time.
pub fn pattern(regex: &str) -> Result<Element, GrammarError> {
    Ok(Element::from(Regex::new(regex)?))
}

/// Like [`pattern`], but produces an object of the capture groups: named
/// groups by name, or every group by index when the pattern has no names.
pub fn pattern_groups(regex: &str) -> Result<Element, GrammarError> {
    Ok(Element::from_kind(Kind::Pattern {
        regex: Regex::new(regex)?,
        capture: Capture::Groups,
    }))
}

pub fn sequence<I>(children: I) -> Element
where
    I: IntoIterator,
    I::Item: Into<Element>,
{
    Element::from_kind(Kind::Sequence(children.into_iter().map(Into::into).collect()))
}

/// Ordered choice: the first child that matches wins.
pub fn alternation<I>(children: I) -> Element
where
    I: IntoIterator,
    I::Item: Into<Element>,
{
    Element::from_kind(Kind::Alternation(
        children.into_iter().map(Into::into).collect(),
    ))
}

/// Greedy repetition of `child` between `min` and `max` (unbounded when
/// `None`) times.
pub fn repeat(child: impl Into<Element>, min: usize, max: Option<usize>) -> Element {
    Element::from_kind(Kind::Repetition {
        child: child.into(),
        min,
        max,
    })
}

pub fn zero_or_one(child: impl Into<Element>) -> Element {
    repeat(child, 0, Some(1))
}

pub fn one_or_more(child: impl Into<Element>) -> Element {
    repeat(child, 1, None)
}

pub fn zero_or_more(child: impl Into<Element>) -> Element {
    repeat(child, 0, None)
}

/// Matches when only skip-set characters remain. Produces nothing.
pub fn end_of_input() -> Element {
    Element::from_kind(Kind::EndOfInput)
}

/// Floating-point literal such as `42`, `-0.5` or `1e-3`, converted to
/// [`Value::Float`]. Values that overflow to infinity do not match.
pub fn double() -> Element {
    Element::named_convert(
        Element::from(DOUBLE_REGEX.clone()),
        "double",
        Arc::new(|text: &str| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float)
        }),
    )
}

/// Decimal integer converted to [`Value::Integer`]. Values outside `i64` do
/// not match.
pub fn integer() -> Element {
    Element::named_convert(
        Element::from(INTEGER_REGEX.clone()),
        "integer",
        Arc::new(|text: &str| text.parse::<i64>().ok().map(Value::Integer)),
    )
}

/// Builder for `element (separator element)*` with bounded element counts.
///
/// The separator defaults to a stripped `","`, so
/// `DelimitedList::new(identifier).min(2).max(2)` parses `"hello, world"` into
/// `["hello", "world"]`. A separator that is not stripped keeps its value
/// between the elements.
#[derive(Clone, Debug)]
pub struct DelimitedList {
    element: Element,
    separator: Option<Element>,
    min: usize,
    max: Option<usize>,
}

impl DelimitedList {
    pub fn new(element: impl Into<Element>) -> Self {
        Self {
            element: element.into(),
            separator: None,
            min: 0,
            max: None,
        }
    }

    pub fn separator(mut self, separator: impl Into<Element>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Minimum number of elements.
    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Maximum number of elements. Matching stops once it is reached.
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn build(self) -> Element {
        Element::from_kind(Kind::DelimitedList {
            element: self.element,
            separator: self
                .separator
                .unwrap_or_else(|| literal(",").make_stripped()),
            min: self.min,
            max: self.max,
        })
    }
}

impl From<DelimitedList> for Element {
    fn from(list: DelimitedList) -> Self {
        list.build()
    }
}
