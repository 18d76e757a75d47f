//! Backtracking evaluator for grammar elements.
//!
//! Evaluation is a recursive walk over the element tree. Each element either
//! produces an [`Output`] and leaves the cursor after its match, or reports
//! no match with the cursor exactly where it found it. No-match is ordinary
//! control flow (`Ok(None)`); only fuel exhaustion and internal faults are
//! errors.

use std::mem;

use parsley_core::{CharSet, Mark, RegexMatch, Scanner};

use super::error::ParseError;
use super::output::Output;
use super::trace::{NoopTracer, Tracer};
use crate::grammar::{Capture, Element, Kind};
use crate::value::Value;

/// Fuel limits for evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum element evaluations (default: 10,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum nesting depth (default: 256). Every level costs several
    /// native stack frames, so the default fits a 2 MiB thread stack.
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
            recursion_limit: 256,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Furthest position a leaf failed at, with what was expected there.
#[derive(Debug, Default)]
struct Furthest {
    position: usize,
    expected: Vec<String>,
}

/// Single-use evaluation state over one input.
pub struct Evaluator<'s> {
    scanner: Scanner<'s>,
    exec_fuel: u32,
    depth: u32,
    limits: FuelLimits,
    require_end: bool,
    /// Non-zero inside a typed leaf, whose own label replaces its children's.
    quiet: u32,
    furthest: Furthest,
}

/// Builder for [`Evaluator`] instances.
pub struct EvaluatorBuilder<'s> {
    source: &'s str,
    skip: Option<CharSet>,
    limits: FuelLimits,
    require_end: bool,
}

impl<'s> EvaluatorBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            skip: Some(CharSet::whitespace()),
            limits: FuelLimits::default(),
            require_end: false,
        }
    }

    /// Characters skipped before every literal and pattern (default:
    /// whitespace).
    pub fn skip(mut self, skip: CharSet) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn without_skip(mut self) -> Self {
        self.skip = None;
        self
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    /// Fail unless only skip-set characters follow the match.
    pub fn require_end(mut self, require_end: bool) -> Self {
        self.require_end = require_end;
        self
    }

    pub fn build(self) -> Evaluator<'s> {
        let scanner = Scanner::new(self.source);
        let scanner = match self.skip {
            Some(skip) => scanner.with_skip(skip),
            None => scanner.without_skip(),
        };
        Evaluator {
            scanner,
            exec_fuel: self.limits.exec_fuel,
            depth: 0,
            limits: self.limits,
            require_end: self.require_end,
            quiet: 0,
            furthest: Furthest::default(),
        }
    }
}

impl<'s> Evaluator<'s> {
    pub fn builder(source: &'s str) -> EvaluatorBuilder<'s> {
        EvaluatorBuilder::new(source)
    }

    /// Evaluate `root` against the whole input.
    pub fn evaluate(self, root: &Element) -> Result<Value, ParseError> {
        self.evaluate_with(root, &mut NoopTracer)
    }

    /// Evaluate `root`, reporting every step to `tracer`.
    pub fn evaluate_with<T: Tracer>(
        self,
        root: &Element,
        tracer: &mut T,
    ) -> Result<Value, ParseError> {
        self.run(root, tracer).map(|(value, _)| value)
    }

    /// Evaluate `root` and also return the byte offset where its match ends.
    pub fn evaluate_prefix(self, root: &Element) -> Result<(Value, usize), ParseError> {
        self.run(root, &mut NoopTracer)
    }

    fn run<T: Tracer>(
        mut self,
        root: &Element,
        tracer: &mut T,
    ) -> Result<(Value, usize), ParseError> {
        let Some(output) = self.eval(root, tracer)? else {
            return Err(self.no_match());
        };
        let end = self.scanner.position();

        if self.require_end {
            self.scanner.skip_ws();
            if !self.scanner.at_end() {
                let position = self.scanner.position();
                self.record_expected(position, || "end of input".to_owned());
                return Err(self.no_match());
            }
        }

        let unwrap_single = matches!(root.kind(), Kind::Sequence(_));
        Ok((output.into_root_value(unwrap_single), end))
    }

    fn no_match(&mut self) -> ParseError {
        let Furthest { position, expected } = mem::take(&mut self.furthest);
        let (line, column) = self.scanner.line_col(position);
        ParseError::NoMatch {
            position,
            line,
            column,
            expected,
        }
    }

    fn eval<T: Tracer>(
        &mut self,
        element: &Element,
        tracer: &mut T,
    ) -> Result<Option<Output>, ParseError> {
        if self.exec_fuel == 0 {
            return Err(ParseError::ExecFuelExhausted(self.limits.exec_fuel));
        }
        self.exec_fuel -= 1;

        if self.depth >= self.limits.recursion_limit {
            return Err(ParseError::RecursionLimitExceeded(
                self.limits.recursion_limit,
            ));
        }
        self.depth += 1;

        let entry = self.scanner.position();
        let token_start = self.scanner.skipped_position();
        tracer.trace_enter(element, entry);

        let result = self.eval_kind(element, tracer);
        self.depth -= 1;

        match result? {
            Some(output) => {
                let end = self.scanner.position();
                let start = if token_start <= end { token_start } else { entry };
                tracer.trace_success(element, start..end);
                Ok(Some(output.decorate(element.decor())))
            }
            None => {
                tracer.trace_failure(element, self.scanner.position());
                Ok(None)
            }
        }
    }

    fn eval_kind<T: Tracer>(
        &mut self,
        element: &Element,
        tracer: &mut T,
    ) -> Result<Option<Output>, ParseError> {
        match element.kind() {
            Kind::Literal(text) => Ok(self.eval_literal(element, text)),
            Kind::Pattern { regex, capture } => {
                let start = self.scanner.skipped_position();
                match self.scanner.scan_regex(regex) {
                    Some(m) => Ok(Some(Output::One(match capture {
                        Capture::Text => Value::from(m.text()),
                        Capture::Groups => groups_value(&m),
                    }))),
                    None => {
                        self.record_expected(start, || element.label());
                        Ok(None)
                    }
                }
            }
            Kind::Sequence(children) => self.eval_sequence(children, tracer),
            Kind::Alternation(children) => {
                for child in children {
                    if let Some(output) = self.eval(child, tracer)? {
                        return Ok(Some(output));
                    }
                }
                Ok(None)
            }
            Kind::Repetition { child, min, max } => {
                self.eval_repetition(child, *min, *max, tracer)
            }
            Kind::DelimitedList {
                element: item,
                separator,
                min,
                max,
            } => self.eval_delimited(item, separator, *min, *max, tracer),
            Kind::Convert { child, f, .. } => {
                let start = self.scanner.mark();
                self.quiet += 1;
                let result = self.eval(child, tracer);
                self.quiet -= 1;

                let converted = match result? {
                    Some(Output::One(Value::Text(text))) => f(text.as_str()),
                    Some(_) => f(self.matched_text(start)),
                    None => None,
                };
                match converted {
                    Some(value) => Ok(Some(Output::One(value))),
                    None => {
                        self.scanner.reset(start);
                        let position = self.scanner.skipped_position();
                        self.record_expected(position, || element.label());
                        Ok(None)
                    }
                }
            }
            Kind::EndOfInput => {
                let start = self.scanner.mark();
                self.scanner.skip_ws();
                if self.scanner.at_end() {
                    return Ok(Some(Output::Omit));
                }
                let position = self.scanner.position();
                self.scanner.reset(start);
                self.record_expected(position, || element.label());
                Ok(None)
            }
            Kind::Rule { body, .. } => self.eval(body, tracer),
            Kind::Recurse { name, target } => {
                let Some(node) = target.upgrade() else {
                    return Err(ParseError::DanglingRule(name.to_string()));
                };
                self.eval(&Element(node), tracer)
            }
        }
    }

    fn eval_literal(&mut self, element: &Element, text: &str) -> Option<Output> {
        let start = self.scanner.skipped_position();
        if self.scanner.scan_literal(text) {
            Some(Output::One(Value::from(text)))
        } else {
            self.record_expected(start, || element.label());
            None
        }
    }

    fn eval_sequence<T: Tracer>(
        &mut self,
        children: &[Element],
        tracer: &mut T,
    ) -> Result<Option<Output>, ParseError> {
        self.scanner.push_mark();
        let mut items = Vec::with_capacity(children.len());
        for child in children {
            match self.eval(child, tracer)? {
                Some(output) => output.push_into(&mut items),
                None => {
                    let from = self.scanner.position();
                    self.scanner.back()?;
                    self.backtracked(from, tracer);
                    return Ok(None);
                }
            }
        }
        self.scanner.pop_mark()?;
        Ok(Some(Output::One(Value::List(items))))
    }

    fn eval_repetition<T: Tracer>(
        &mut self,
        child: &Element,
        min: usize,
        max: Option<usize>,
        tracer: &mut T,
    ) -> Result<Option<Output>, ParseError> {
        let start = self.scanner.mark();
        let mut items = Vec::new();
        let mut count = 0;
        while max.is_none_or(|max| count < max) {
            let before = self.scanner.mark();
            match self.eval(child, tracer)? {
                Some(output) if self.scanner.position() > before.position() => {
                    output.push_into(&mut items);
                    count += 1;
                }
                // A step that consumes nothing would repeat forever.
                Some(_) => {
                    self.scanner.reset(before);
                    break;
                }
                None => break,
            }
        }

        if count < min {
            self.rewind(start, tracer);
            return Ok(None);
        }
        Ok(Some(Output::One(Value::List(items))))
    }

    fn eval_delimited<T: Tracer>(
        &mut self,
        item: &Element,
        separator: &Element,
        min: usize,
        max: Option<usize>,
        tracer: &mut T,
    ) -> Result<Option<Output>, ParseError> {
        let start = self.scanner.mark();
        let mut items = Vec::new();
        let mut count = 0;

        if max != Some(0) {
            match self.eval(item, tracer)? {
                Some(output) if self.scanner.position() > start.position() => {
                    output.push_into(&mut items);
                    count = 1;
                }
                Some(_) => self.scanner.reset(start),
                None => {}
            }
        }

        while count > 0 && max.is_none_or(|max| count < max) {
            let before = self.scanner.mark();
            let Some(sep) = self.eval(separator, tracer)? else {
                break;
            };
            match self.eval(item, tracer)? {
                Some(output) if self.scanner.position() > before.position() => {
                    sep.push_into(&mut items);
                    output.push_into(&mut items);
                    count += 1;
                }
                // Trailing separator, or a zero-width step: leave it unconsumed.
                _ => {
                    self.rewind(before, tracer);
                    break;
                }
            }
        }

        if count < min {
            self.rewind(start, tracer);
            return Ok(None);
        }
        Ok(Some(Output::One(Value::List(items))))
    }

    fn rewind<T: Tracer>(&mut self, mark: Mark, tracer: &mut T) {
        let from = self.scanner.position();
        self.scanner.reset(mark);
        self.backtracked(from, tracer);
    }

    fn backtracked<T: Tracer>(&self, from: usize, tracer: &mut T) {
        let to = self.scanner.position();
        if from != to {
            tracer.trace_backtrack(from, to);
        }
    }

    /// Text consumed since `start`, without the leading skip-set run.
    fn matched_text(&self, start: Mark) -> &'s str {
        let text = self.scanner.since(start);
        match self.scanner.skip_set() {
            Some(skip) => text.trim_start_matches(|c| skip.contains(c)),
            None => text,
        }
    }

    fn record_expected(&mut self, position: usize, label: impl FnOnce() -> String) {
        if self.quiet > 0 || position < self.furthest.position {
            return;
        }
        if position > self.furthest.position {
            self.furthest.position = position;
            self.furthest.expected.clear();
        }
        let label = label();
        if !self.furthest.expected.contains(&label) {
            self.furthest.expected.push(label);
        }
    }
}

/// Object of a match's capture groups: named groups by name, otherwise every
/// group by its 1-based index. Groups that did not participate are null.
fn groups_value(m: &RegexMatch<'_>) -> Value {
    let text = |group: Option<&str>| group.map_or(Value::Null, Value::from);
    let fields = if m.named_groups().next().is_some() {
        m.named_groups()
            .map(|(name, group)| (name.to_owned(), text(group)))
            .collect()
    } else {
        m.positional_groups()
            .enumerate()
            .map(|(i, group)| ((i + 1).to_string(), text(group)))
            .collect()
    };
    Value::Object(fields)
}
