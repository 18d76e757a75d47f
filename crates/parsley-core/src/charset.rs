//! Character sets used by the scanner for run and skip matching.
//!
//! A set is either flat (named classes plus explicit ranges), an inversion,
//! or a union of sets. Unions of two flat sets are merged eagerly so the
//! common `whitespace() | from_chars(",")` case stays a single flat check.

use std::fmt;
use std::ops::{BitOr, RangeInclusive};

/// Named character class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Class {
    /// Unicode `White_Space`.
    Whitespace,
    /// Line terminators: `\n`, `\r`, VT, FF, NEL, LS, PS.
    Newline,
    /// ASCII `0`-`9`.
    DecimalDigit,
    /// Unicode `Alphabetic`.
    Letter,
    /// Unicode `Alphabetic` or `Numeric`.
    Alphanumeric,
    /// ASCII punctuation.
    Punctuation,
}

impl Class {
    const ALL: [Class; 6] = [
        Class::Whitespace,
        Class::Newline,
        Class::DecimalDigit,
        Class::Letter,
        Class::Alphanumeric,
        Class::Punctuation,
    ];

    fn contains(self, c: char) -> bool {
        match self {
            Class::Whitespace => c.is_whitespace(),
            Class::Newline => matches!(
                c,
                '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
            ),
            Class::DecimalDigit => c.is_ascii_digit(),
            Class::Letter => c.is_alphabetic(),
            Class::Alphanumeric => c.is_alphanumeric(),
            Class::Punctuation => c.is_ascii_punctuation(),
        }
    }
}

/// Bitset of [`Class`] values.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Classes(u8);

impl Classes {
    pub const EMPTY: Classes = Classes(0);

    #[inline]
    pub const fn single(class: Class) -> Self {
        Classes(1 << class as u8)
    }

    #[inline]
    pub const fn has(&self, class: Class) -> bool {
        self.0 & (1 << class as u8) != 0
    }

    #[inline]
    pub const fn union(self, other: Classes) -> Classes {
        Classes(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    fn iter(self) -> impl Iterator<Item = Class> {
        Class::ALL.into_iter().filter(move |c| self.has(*c))
    }

    fn contains(self, c: char) -> bool {
        self.iter().any(|class| class.contains(c))
    }
}

impl fmt::Debug for Classes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Set-membership predicate over characters.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CharSet {
    repr: Repr,
}

#[derive(Clone, PartialEq, Eq)]
enum Repr {
    Flat {
        classes: Classes,
        ranges: Vec<RangeInclusive<char>>,
    },
    Not(Box<CharSet>),
    Union(Vec<CharSet>),
}

impl Default for Repr {
    fn default() -> Self {
        Repr::Flat {
            classes: Classes::EMPTY,
            ranges: Vec::new(),
        }
    }
}

impl CharSet {
    /// The set containing no characters.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn class(class: Class) -> Self {
        Self {
            repr: Repr::Flat {
                classes: Classes::single(class),
                ranges: Vec::new(),
            },
        }
    }

    pub fn whitespace() -> Self {
        Self::class(Class::Whitespace)
    }

    pub fn newlines() -> Self {
        Self::class(Class::Newline)
    }

    pub fn decimal_digits() -> Self {
        Self::class(Class::DecimalDigit)
    }

    pub fn letters() -> Self {
        Self::class(Class::Letter)
    }

    pub fn alphanumerics() -> Self {
        Self::class(Class::Alphanumeric)
    }

    pub fn punctuation() -> Self {
        Self::class(Class::Punctuation)
    }

    /// Set of every character in `chars`.
    pub fn from_chars(chars: &str) -> Self {
        Self {
            repr: Repr::Flat {
                classes: Classes::EMPTY,
                ranges: chars.chars().map(|c| c..=c).collect(),
            },
        }
    }

    /// Inclusive range `lo..=hi`. Empty when `lo > hi`.
    pub fn range(lo: char, hi: char) -> Self {
        Self {
            repr: Repr::Flat {
                classes: Classes::EMPTY,
                ranges: vec![lo..=hi],
            },
        }
    }

    pub fn contains(&self, c: char) -> bool {
        match &self.repr {
            Repr::Flat { classes, ranges } => {
                classes.contains(c) || ranges.iter().any(|r| r.contains(&c))
            }
            Repr::Not(inner) => !inner.contains(c),
            Repr::Union(sets) => sets.iter().any(|s| s.contains(c)),
        }
    }

    pub fn union(self, other: CharSet) -> CharSet {
        match (self.repr, other.repr) {
            (
                Repr::Flat {
                    classes: a,
                    ranges: mut ra,
                },
                Repr::Flat {
                    classes: b,
                    ranges: rb,
                },
            ) => {
                ra.extend(rb);
                CharSet {
                    repr: Repr::Flat {
                        classes: a.union(b),
                        ranges: ra,
                    },
                }
            }
            (Repr::Union(mut sets), other) => {
                sets.push(CharSet { repr: other });
                CharSet {
                    repr: Repr::Union(sets),
                }
            }
            (lhs, rhs) => CharSet {
                repr: Repr::Union(vec![CharSet { repr: lhs }, CharSet { repr: rhs }]),
            },
        }
    }

    /// Complement of this set. Inverting twice yields the original set.
    pub fn inverted(self) -> CharSet {
        match self.repr {
            Repr::Not(inner) => *inner,
            repr => CharSet {
                repr: Repr::Not(Box::new(CharSet { repr })),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::Flat { classes, ranges } => {
                classes.is_empty() && ranges.iter().all(|r| r.is_empty())
            }
            Repr::Not(_) => false,
            Repr::Union(sets) => sets.iter().all(CharSet::is_empty),
        }
    }
}

impl BitOr for CharSet {
    type Output = CharSet;

    fn bitor(self, rhs: CharSet) -> CharSet {
        self.union(rhs)
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Flat { classes, ranges } => {
                let mut set = f.debug_set();
                set.entries(classes.iter());
                for r in ranges {
                    if r.start() == r.end() {
                        set.entry(r.start());
                    } else {
                        set.entry(r);
                    }
                }
                set.finish()
            }
            Repr::Not(inner) => write!(f, "!{inner:?}"),
            Repr::Union(sets) => {
                for (i, s) in sets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{s:?}")?;
                }
                Ok(())
            }
        }
    }
}
