//! Backtrackable cursor over a string.
//!
//! `position` is a byte offset that always lies on a char boundary in
//! `[0, source.len()]`. Every scan either succeeds and advances, or fails and
//! leaves `position` exactly where it was, skip-set characters included.
//! Multi-step attempts use [`Scanner::mark`]/[`Scanner::reset`] or the scoped
//! mark stack ([`Scanner::push_mark`], [`Scanner::pop_mark`], [`Scanner::back`]).

use crate::charset::CharSet;
use crate::regex::{Regex, RegexMatch};

/// Errors from misusing the scanner's mark stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// `back()` or `pop_mark()` with no outstanding mark.
    #[error("mark stack underflow: no outstanding mark to restore")]
    MarkUnderflow,
}

/// Saved cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

impl Mark {
    pub fn position(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Scanner<'s> {
    source: &'s str,
    position: usize,
    marks: Vec<usize>,
    /// Consumed before literal and regex scans while `suppress_depth == 0`.
    skip: Option<CharSet>,
    suppress_depth: u32,
}

impl<'s> Scanner<'s> {
    /// Scanner at offset 0 that skips whitespace.
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            position: 0,
            marks: Vec::new(),
            skip: Some(CharSet::whitespace()),
            suppress_depth: 0,
        }
    }

    pub fn with_skip(mut self, skip: CharSet) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn without_skip(mut self) -> Self {
        self.skip = None;
        self
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.position == self.source.len()
    }

    #[inline]
    pub fn remaining(&self) -> &'s str {
        &self.source[self.position..]
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Text consumed since `mark`.
    pub fn since(&self, mark: Mark) -> &'s str {
        &self.source[mark.0.min(self.position)..self.position]
    }

    #[inline]
    pub fn mark(&self) -> Mark {
        Mark(self.position)
    }

    #[inline]
    pub fn reset(&mut self, mark: Mark) {
        debug_assert!(
            self.source.is_char_boundary(mark.0),
            "mark {} is not a char boundary of this source",
            mark.0
        );
        self.position = mark.0.min(self.source.len());
    }

    /// Push the current position on the mark stack.
    pub fn push_mark(&mut self) {
        self.marks.push(self.position);
    }

    /// Drop the newest mark, keeping the current position.
    pub fn pop_mark(&mut self) -> Result<(), ScanError> {
        self.marks.pop().map(drop).ok_or(ScanError::MarkUnderflow)
    }

    /// Drop the newest mark and restore the position it saved.
    pub fn back(&mut self) -> Result<(), ScanError> {
        let saved = self.marks.pop().ok_or(ScanError::MarkUnderflow)?;
        self.position = saved;
        Ok(())
    }

    pub fn mark_depth(&self) -> usize {
        self.marks.len()
    }

    pub fn skip_set(&self) -> Option<&CharSet> {
        self.skip.as_ref()
    }

    /// True when the skip-set applies to the next literal or regex scan.
    pub fn is_skipping(&self) -> bool {
        self.skip.is_some() && self.suppress_depth == 0
    }

    /// Run `body` with skipping disabled. Nested calls stack; the prior state
    /// is restored when `body` returns, whatever it returns.
    pub fn suppress_skip<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.suppress_depth += 1;
        let result = body(self);
        self.suppress_depth -= 1;
        result
    }

    /// Consume skip-set characters now. Returns the skipped text.
    pub fn skip_ws(&mut self) -> &'s str {
        let start = self.position;
        self.position = self.skipped_position();
        &self.source[start..self.position]
    }

    /// Position the next literal or regex scan would start from.
    pub fn skipped_position(&self) -> usize {
        match &self.skip {
            Some(set) if self.suppress_depth == 0 => self.run_end(self.position, set),
            _ => self.position,
        }
    }

    fn run_end(&self, from: usize, set: &CharSet) -> usize {
        let rest = &self.source[from..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !set.contains(c))
            .map_or(rest.len(), |(i, _)| i);
        from + len
    }

    /// Consume `literal` after skipping. The empty literal always matches.
    pub fn scan_literal(&mut self, literal: &str) -> bool {
        let start = self.skipped_position();
        if self.source[start..].starts_with(literal) {
            self.position = start + literal.len();
            true
        } else {
            false
        }
    }

    /// Consume the maximal run of characters in `set`. No skipping.
    pub fn scan_set(&mut self, set: &CharSet) -> Option<&'s str> {
        let end = self.run_end(self.position, set);
        if end == self.position {
            return None;
        }
        let run = &self.source[self.position..end];
        self.position = end;
        Some(run)
    }

    /// Consume exactly one character in `set`. No skipping.
    pub fn scan_char(&mut self, set: &CharSet) -> Option<char> {
        let c = self.peek().filter(|&c| set.contains(c))?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Match `regex` anchored at the cursor, after skipping.
    pub fn scan_regex(&mut self, regex: &Regex) -> Option<RegexMatch<'s>> {
        let start = self.skipped_position();
        let m = regex.match_at(self.source, start)?;
        self.position = m.span().end;
        Some(m)
    }

    /// 1-based line and column (in chars) of byte `offset`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let before = &self.source[..offset.min(self.source.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}
