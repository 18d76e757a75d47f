//! Terminal styling for the trace printer and `Value::format`.
//!
//! Renderers pick a role, not an escape code: `blue` marks grammar elements
//! and object keys, `green` matched text and string values, `red` failed
//! attempts, and `dim` punctuation and positions.

const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Escape sequences per styling role. Every field of [`Colors::OFF`] is
/// empty, which makes painting a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub red: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        blue: BLUE,
        green: GREEN,
        red: RED,
        dim: DIM,
        reset: RESET,
    };

    pub const OFF: Self = Self {
        blue: "",
        green: "",
        red: "",
        dim: "",
        reset: "",
    };

    /// Styling for a terminal when `enabled`, plain text otherwise.
    pub fn new(enabled: bool) -> Self {
        match enabled {
            true => Self::ON,
            false => Self::OFF,
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != Self::OFF
    }

    /// `text` between `color` and the reset code. An empty `color` returns
    /// `text` as is.
    pub fn paint(&self, color: &str, text: &str) -> String {
        match color {
            "" => text.to_owned(),
            _ => format!("{color}{text}{}", self.reset),
        }
    }
}
