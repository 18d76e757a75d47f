//! Tracing hooks for debugging grammar evaluation.
//!
//! The evaluator is generic over [`Tracer`]. [`NoopTracer`] methods are empty
//! `#[inline(always)]` functions, so untraced parses pay nothing. Tracing-only
//! state (nesting depth, collected lines) lives in the tracer, never in the
//! evaluator.

use std::ops::Range;

use parsley_core::Colors;

use crate::grammar::Element;

/// Verbosity level for [`PrintTracer`] output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Matches and failures only.
    #[default]
    Default,
    /// Also entries and backtracks, plus the text each match consumed.
    Verbose,
}

/// Instrumentation points of an evaluation.
///
/// `trace_enter` is paired with exactly one of `trace_success` or
/// `trace_failure` for the same element, so implementations can track depth.
pub trait Tracer {
    /// Before evaluating `element` at byte offset `position`.
    fn trace_enter(&mut self, element: &Element, position: usize);

    /// After `element` matched `span`.
    fn trace_success(&mut self, element: &Element, span: Range<usize>);

    /// After `element` failed. The cursor is back at `position`.
    fn trace_failure(&mut self, element: &Element, position: usize);

    /// When a partial match is rolled back from `from` to `to`.
    fn trace_backtrack(&mut self, from: usize, to: usize);
}

/// Tracer that compiles to nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _element: &Element, _position: usize) {}

    #[inline(always)]
    fn trace_success(&mut self, _element: &Element, _span: Range<usize>) {}

    #[inline(always)]
    fn trace_failure(&mut self, _element: &Element, _position: usize) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _from: usize, _to: usize) {}
}

/// Tracer that collects an indented, post-order log of an evaluation.
///
/// ```text
///   "(" ✓ 0..1
///   double ✓ 1..3
/// ("(" + double) ✓ 0..3
/// ```
pub struct PrintTracer<'s> {
    source: &'s str,
    verbosity: Verbosity,
    colors: Colors,
    depth: usize,
    lines: Vec<String>,
}

impl<'s> PrintTracer<'s> {
    pub fn new(source: &'s str, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            source,
            verbosity,
            colors,
            depth: 0,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Collected trace, one line per event.
    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, line: String) {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{indent}{line}"));
    }

    fn element(&self, element: &Element) -> String {
        self.colors.paint(self.colors.blue, &element.to_string())
    }

    fn verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_enter(&mut self, element: &Element, position: usize) {
        if self.verbose() {
            let c = self.colors;
            let line = format!(
                "{} {}",
                self.element(element),
                c.paint(c.dim, &format!("@{position}"))
            );
            self.push(line);
        }
        self.depth += 1;
    }

    fn trace_success(&mut self, element: &Element, span: Range<usize>) {
        self.depth = self.depth.saturating_sub(1);
        let c = self.colors;
        let mut line = format!(
            "{} {} {}",
            self.element(element),
            c.paint(c.green, "✓"),
            c.paint(c.dim, &format!("{}..{}", span.start, span.end)),
        );
        if self.verbose() {
            let text = self.source.get(span).unwrap_or_default();
            line.push(' ');
            line.push_str(&c.paint(c.green, &format!("{text:?}")));
        }
        self.push(line);
    }

    fn trace_failure(&mut self, element: &Element, position: usize) {
        self.depth = self.depth.saturating_sub(1);
        let c = self.colors;
        let line = format!(
            "{} {} {}",
            self.element(element),
            c.paint(c.red, "✗"),
            c.paint(c.dim, &format!("@{position}")),
        );
        self.push(line);
    }

    fn trace_backtrack(&mut self, from: usize, to: usize) {
        if self.verbose() {
            let c = self.colors;
            self.push(c.paint(c.dim, &format!("backtrack {from} -> {to}")));
        }
    }
}
