//! Parse result tree.
//!
//! The shape is decided by the grammar: leaves are matched text (or typed
//! values from converting leaves), lists come from sequences, repetitions and
//! delimited lists, and objects from group-capturing patterns.

use std::ops::Index;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use parsley_core::Colors;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Capture group that did not participate in the match.
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    List(Vec<Value>),
    /// Capture groups in declaration order.
    Object(Vec<(String, Value)>),
}

static NULL: Value = Value::Null;

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value. Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Element `index` of a list.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_list()?.get(index)
    }

    /// Field `name` of an object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Number of list items or object fields; 0 for leaves.
    pub fn len(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            Value::Object(fields) => fields.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as JSON-like text, colored with `colors`.
    pub fn format(&self, pretty: bool, colors: Colors) -> String {
        let mut out = String::new();
        format_value(&mut out, self, &colors, pretty, 0);
        out
    }
}

/// Out-of-range indexes and non-lists yield [`Value::Null`].
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.get(index).unwrap_or(&NULL)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(v) if v == other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

fn format_value(out: &mut String, value: &Value, c: &Colors, pretty: bool, indent: usize) {
    match value {
        Value::Null => push_painted(out, c.dim, "null", c),
        Value::Text(s) => push_painted(out, c.green, &quote(s), c),
        Value::Integer(v) => out.push_str(&v.to_string()),
        Value::Float(v) => out.push_str(&format!("{v:?}")),
        Value::List(items) => {
            format_group(out, ('[', ']'), items.len(), c, pretty, indent, |out, i, ind| {
                format_value(out, &items[i], c, pretty, ind);
            })
        }
        Value::Object(fields) => {
            format_group(out, ('{', '}'), fields.len(), c, pretty, indent, |out, i, ind| {
                let (key, value) = &fields[i];
                push_painted(out, c.blue, &quote(key), c);
                push_painted(out, c.dim, ":", c);
                out.push(' ');
                format_value(out, value, c, pretty, ind);
            })
        }
    }
}

/// Shared layout for lists and objects: delimiters and commas dimmed, one
/// entry per line when `pretty`.
fn format_group(
    out: &mut String,
    (open, close): (char, char),
    len: usize,
    c: &Colors,
    pretty: bool,
    indent: usize,
    mut entry: impl FnMut(&mut String, usize, usize),
) {
    push_painted(out, c.dim, &open.to_string(), c);
    if len > 0 {
        let inner = indent + 2;
        for i in 0..len {
            if i > 0 {
                push_painted(out, c.dim, ",", c);
                if !pretty {
                    out.push(' ');
                }
            }
            if pretty {
                out.push('\n');
                out.push_str(&" ".repeat(inner));
            }
            entry(out, i, inner);
        }
        if pretty {
            out.push('\n');
            out.push_str(&" ".repeat(indent));
        }
    }
    push_painted(out, c.dim, &close.to_string(), c);
}

fn push_painted(out: &mut String, color: &str, text: &str, c: &Colors) {
    out.push_str(&c.paint(color, text));
}

fn quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
