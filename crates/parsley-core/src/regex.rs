//! Regular expressions matched as an anchored prefix at a cursor.
//!
//! Backed by the `regex-automata` meta engine. A match always starts exactly
//! at the requested offset but need not extend to the end of the haystack.
//! Assertions like `\b` still see the text before the offset.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use regex_automata::meta;
use regex_automata::{Anchored, Input, PatternID};

/// Failure to compile a pattern.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid regular expression {pattern:?}: {source}")]
pub struct RegexError {
    pub pattern: String,
    #[source]
    pub source: Arc<meta::BuildError>,
}

/// Compiled pattern. Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Regex {
    pattern: Arc<str>,
    inner: meta::Regex,
    /// Group names by index (index 0 is the whole match and never named).
    names: Arc<[Option<Arc<str>>]>,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        let inner = meta::Regex::new(pattern).map_err(|e| RegexError {
            pattern: pattern.to_owned(),
            source: Arc::new(e),
        })?;
        let names = inner
            .group_info()
            .pattern_names(PatternID::ZERO)
            .map(|name| name.map(Arc::from))
            .collect();
        Ok(Self {
            pattern: Arc::from(pattern),
            inner,
            names,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Number of capture groups, including the implicit group 0.
    pub fn group_len(&self) -> usize {
        self.names.len()
    }

    pub fn has_named_groups(&self) -> bool {
        self.names.iter().any(Option::is_some)
    }

    /// Match a prefix of `haystack[at..]`.
    ///
    /// Panics if `at > haystack.len()`.
    pub fn match_at<'h>(&self, haystack: &'h str, at: usize) -> Option<RegexMatch<'h>> {
        let input = Input::new(haystack).range(at..).anchored(Anchored::Yes);
        let mut caps = self.inner.create_captures();
        self.inner.search_captures(&input, &mut caps);
        let whole = caps.get_match()?;
        let groups = (0..caps.group_len())
            .map(|i| caps.get_group(i).map(|span| &haystack[span.range()]))
            .collect();
        Some(RegexMatch {
            span: whole.range(),
            groups,
            names: Arc::clone(&self.names),
        })
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Regex").field(&self.pattern).finish()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.pattern)
    }
}

/// Result of a successful anchored match.
#[derive(Clone, Debug)]
pub struct RegexMatch<'h> {
    span: Range<usize>,
    groups: Vec<Option<&'h str>>,
    names: Arc<[Option<Arc<str>>]>,
}

impl<'h> RegexMatch<'h> {
    /// Byte range of the whole match in the haystack.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Text of the whole match.
    pub fn text(&self) -> &'h str {
        self.groups[0].unwrap_or_default()
    }

    /// Text of group `index`. `None` if the group is out of range or did not
    /// participate in the match.
    pub fn group(&self, index: usize) -> Option<&'h str> {
        self.groups.get(index).copied().flatten()
    }

    pub fn name(&self, name: &str) -> Option<&'h str> {
        let index = self.names.iter().position(|n| n.as_deref() == Some(name))?;
        self.group(index)
    }

    /// Named groups in declaration order.
    pub fn named_groups(&self) -> impl Iterator<Item = (&str, Option<&'h str>)> + '_ {
        self.names
            .iter()
            .zip(&self.groups)
            .filter_map(|(name, text)| name.as_deref().map(|n| (n, *text)))
    }

    /// Every group after group 0, in index order.
    pub fn positional_groups(&self) -> impl Iterator<Item = Option<&'h str>> + '_ {
        self.groups.iter().skip(1).copied()
    }
}
