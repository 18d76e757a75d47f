//! DSL-style rendering of grammar elements.
//!
//! ```text
//! "("            literal
//! /\d+/          pattern            groups(/re/)   pattern producing groups
//! (a + b)        sequence           [a | b]        ordered choice
//! a? a* a+       repetition         a{2} a{2,5} a{2,}
//! delimited(a, strip(","))          $              end of input
//! double         typed leaf         <name>         recursive rule
//! strip(a)  flat(a)  a@id           decorations
//! ```

use std::fmt::{self, Write};

use super::{Capture, Element, Kind};

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decor = self.decor();
        if decor.stripped {
            f.write_str("strip(")?;
        }
        if decor.flattened {
            f.write_str("flat(")?;
        }
        write_body(self, f)?;
        if decor.flattened {
            f.write_char(')')?;
        }
        if decor.stripped {
            f.write_char(')')?;
        }
        if let Some(id) = &decor.id {
            write!(f, "@{id}")?;
        }
        Ok(())
    }
}

/// Render without the element's own decorations.
pub(super) fn render_bare(element: &Element) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_body(element, &mut out);
    out
}

fn write_body(element: &Element, out: &mut impl Write) -> fmt::Result {
    match element.kind() {
        Kind::Literal(text) => write!(out, "{text:?}"),
        Kind::Pattern { regex, capture } => match capture {
            Capture::Text => write!(out, "{regex}"),
            Capture::Groups => write!(out, "groups({regex})"),
        },
        Kind::Sequence(children) => write_joined(out, "(", " + ", ")", children),
        Kind::Alternation(children) => write_joined(out, "[", " | ", "]", children),
        Kind::Repetition { child, min, max } => {
            write!(out, "{child}")?;
            match (min, max) {
                (0, Some(1)) => out.write_char('?'),
                (0, None) => out.write_char('*'),
                (1, None) => out.write_char('+'),
                (min, max) => write_bounds(out, *min, *max),
            }
        }
        Kind::DelimitedList {
            element,
            separator,
            min,
            max,
        } => {
            write!(out, "delimited({element}, {separator})")?;
            match (min, max) {
                (0, None) => Ok(()),
                (min, max) => write_bounds(out, *min, *max),
            }
        }
        Kind::Convert { child, name, .. } => match name {
            Some(name) => out.write_str(name),
            None => write!(out, "convert({child})"),
        },
        Kind::EndOfInput => out.write_char('$'),
        Kind::Rule { name, .. } | Kind::Recurse { name, .. } => write!(out, "<{name}>"),
    }
}

fn write_joined(
    out: &mut impl Write,
    open: &str,
    separator: &str,
    close: &str,
    children: &[Element],
) -> fmt::Result {
    out.write_str(open)?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.write_str(separator)?;
        }
        write!(out, "{child}")?;
    }
    out.write_str(close)
}

fn write_bounds(out: &mut impl Write, min: usize, max: Option<usize>) -> fmt::Result {
    match max {
        Some(max) if max == min => write!(out, "{{{min}}}"),
        Some(max) => write!(out, "{{{min},{max}}}"),
        None => write!(out, "{{{min},}}"),
    }
}
