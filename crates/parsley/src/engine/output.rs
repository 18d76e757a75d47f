//! What a matched element contributes to its parent's list.

use crate::grammar::Decor;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Output {
    /// Matched but stripped: contributes nothing.
    Omit,
    One(Value),
    /// Flattened list: items go directly into the parent.
    Splice(Vec<Value>),
}

impl Output {
    pub(crate) fn push_into(self, items: &mut Vec<Value>) {
        match self {
            Output::Omit => {}
            Output::One(value) => items.push(value),
            Output::Splice(values) => items.extend(values),
        }
    }

    /// Apply an element's own decorations to what it produced.
    pub(crate) fn decorate(self, decor: &Decor) -> Output {
        if decor.stripped {
            return Output::Omit;
        }
        if decor.flattened {
            return self.flatten();
        }
        self
    }

    fn flatten(self) -> Output {
        match self {
            Output::One(Value::List(items)) => match <[Value; 1]>::try_from(items) {
                Ok([only]) => Output::One(only),
                Err(items) => Output::Splice(items),
            },
            other => other,
        }
    }

    /// Final value at the root. `unwrap_single` collapses a one-item list.
    pub(crate) fn into_root_value(self, unwrap_single: bool) -> Value {
        match self {
            Output::Omit => Value::List(Vec::new()),
            Output::Splice(items) => Value::List(items),
            Output::One(Value::List(items)) if unwrap_single => {
                match <[Value; 1]>::try_from(items) {
                    Ok([only]) => only,
                    Err(items) => Value::List(items),
                }
            }
            Output::One(value) => value,
        }
    }
}
