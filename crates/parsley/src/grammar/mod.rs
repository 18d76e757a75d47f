//! Grammar element algebra.
//!
//! An [`Element`] is an immutable, cheaply cloned handle to a grammar node.
//! Nodes are built once (often in `static LazyLock`s) and shared across any
//! number of concurrent parses. Decorators (`make_stripped`, `make_flattened`,
//! `set_id`) return a new element and never touch the original.
//!
//! Recursive grammars go through [`Element::recursive`], which closes the
//! cycle with a `Weak` back-reference so dropping the grammar frees it.

mod builders;
mod display;
mod ops;


use std::fmt;
use std::sync::{Arc, Weak};

use parsley_core::{Regex, RegexError};

use crate::value::Value;

pub use builders::{
    DelimitedList, alternation, double, end_of_input, integer, literal, one_or_more, pattern,
    pattern_groups, repeat, sequence, zero_or_more, zero_or_one,
};

/// Errors raised while building a grammar.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GrammarError {
    #[error(transparent)]
    InvalidPattern(#[from] RegexError),
}

/// Conversion applied to the text matched by a typed leaf. `None` means the
/// leaf did not match.
pub type Converter = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// What a pattern contributes to the result tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    /// Text of the whole match.
    Text,
    /// Object of the capture groups, keyed by name (or index when unnamed).
    Groups,
}

#[derive(Clone)]
pub(crate) enum Kind {
    Literal(Arc<str>),
    Pattern {
        regex: Regex,
        capture: Capture,
    },
    Sequence(Vec<Element>),
    Alternation(Vec<Element>),
    Repetition {
        child: Element,
        min: usize,
        max: Option<usize>,
    },
    DelimitedList {
        element: Element,
        separator: Element,
        min: usize,
        max: Option<usize>,
    },
    Convert {
        child: Element,
        name: Option<Arc<str>>,
        f: Converter,
    },
    EndOfInput,
    Rule {
        name: Arc<str>,
        body: Element,
    },
    Recurse {
        name: Arc<str>,
        target: Weak<Node>,
    },
}

/// Result transforms attached to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Decor {
    pub(crate) stripped: bool,
    pub(crate) flattened: bool,
    pub(crate) id: Option<Arc<str>>,
}

impl Decor {
    pub(crate) fn is_plain(&self) -> bool {
        *self == Decor::default()
    }
}

pub(crate) struct Node {
    pub(crate) kind: Kind,
    pub(crate) decor: Decor,
}

/// Grammar element handle.
#[derive(Clone)]
pub struct Element(pub(crate) Arc<Node>);

impl Element {
    pub(crate) fn from_kind(kind: Kind) -> Self {
        Self(Arc::new(Node {
            kind,
            decor: Decor::default(),
        }))
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.0.kind
    }

    pub(crate) fn decor(&self) -> &Decor {
        &self.0.decor
    }

    fn decorated(&self, edit: impl FnOnce(&mut Decor)) -> Element {
        // A rule's body points back at the rule node through a `Weak`, so the
        // rule is wrapped rather than copied to keep that node alive.
        let kind = match &self.0.kind {
            Kind::Rule { name, .. } => Kind::Rule {
                name: Arc::clone(name),
                body: self.clone(),
            },
            kind => kind.clone(),
        };
        let mut decor = self.0.decor.clone();
        edit(&mut decor);
        Element(Arc::new(Node { kind, decor }))
    }

    /// Copy whose match still must succeed but contributes nothing to the
    /// parent's result.
    pub fn make_stripped(&self) -> Element {
        self.decorated(|d| d.stripped = true)
    }

    /// Copy whose list output loses one level of nesting: a single child
    /// replaces the list, any other list is spliced into the parent.
    pub fn make_flattened(&self) -> Element {
        self.decorated(|d| d.flattened = true)
    }

    /// Copy tagged with `id` for tracing, error labels and [`Element::find`].
    pub fn set_id(&self, id: &str) -> Element {
        self.decorated(|d| d.id = Some(Arc::from(id)))
    }

    pub fn is_stripped(&self) -> bool {
        self.0.decor.stripped
    }

    pub fn is_flattened(&self) -> bool {
        self.0.decor.flattened
    }

    pub fn id(&self) -> Option<&str> {
        self.0.decor.id.as_deref()
    }

    /// Typed leaf: run `f` on the matched text. A `None` from `f` turns the
    /// match into a failure so an enclosing alternation can try other branches.
    pub fn convert<F>(&self, f: F) -> Element
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Element::from_kind(Kind::Convert {
            child: self.clone(),
            name: None,
            f: Arc::new(f),
        })
    }

    pub(crate) fn named_convert(child: Element, name: &str, f: Converter) -> Element {
        Element::from_kind(Kind::Convert {
            child,
            name: Some(Arc::from(name)),
            f,
        })
    }

    /// Build a self-referential grammar. `build` receives a handle that
    /// evaluates the rule being defined.
    ///
    /// ```
    /// use parsley::{Element, literal, zero_or_more};
    ///
    /// let nested = Element::recursive("nested", |nested| {
    ///     literal("(").make_stripped() + zero_or_more(nested) + literal(")").make_stripped()
    /// });
    /// assert!(nested.parse("(()())").is_ok());
    /// ```
    pub fn recursive(name: &str, build: impl FnOnce(Element) -> Element) -> Element {
        let name: Arc<str> = Arc::from(name);
        let node = Arc::new_cyclic(|target: &Weak<Node>| {
            let this = Element::from_kind(Kind::Recurse {
                name: Arc::clone(&name),
                target: target.clone(),
            });
            Node {
                kind: Kind::Rule {
                    body: build(this),
                    name,
                },
                decor: Decor::default(),
            }
        });
        Element(node)
    }

    /// Depth-first search for a sub-element tagged `id`, including `self`.
    /// Recursion points are not followed.
    pub fn find(&self, id: &str) -> Option<Element> {
        if self.id() == Some(id) {
            return Some(self.clone());
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Direct sub-elements in evaluation order.
    pub fn children(&self) -> Vec<Element> {
        match &self.0.kind {
            Kind::Sequence(children) | Kind::Alternation(children) => children.clone(),
            Kind::Repetition { child, .. } | Kind::Convert { child, .. } => vec![child.clone()],
            Kind::DelimitedList {
                element, separator, ..
            } => vec![element.clone(), separator.clone()],
            Kind::Rule { body, .. } => vec![body.clone()],
            Kind::Literal(_) | Kind::Pattern { .. } | Kind::EndOfInput | Kind::Recurse { .. } => {
                Vec::new()
            }
        }
    }

    /// Label used in "expected ..." diagnostics.
    pub(crate) fn label(&self) -> String {
        match (self.id(), self.kind()) {
            (Some(id), _) => id.to_owned(),
            (None, Kind::EndOfInput) => "end of input".to_owned(),
            (None, _) => display::render_bare(self),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&format_args!("{self}")).finish()
    }
}

impl From<&Element> for Element {
    fn from(element: &Element) -> Self {
        element.clone()
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        literal(text)
    }
}

impl From<Regex> for Element {
    fn from(regex: Regex) -> Self {
        Element::from_kind(Kind::Pattern {
            regex,
            capture: Capture::Text,
        })
    }
}
