//! `+` (sequence) and `|` (ordered choice) on elements.
//!
//! Both operators extend an undecorated left-hand side of the same kind in
//! place of nesting it, so `a + b + c` is one three-child sequence and
//! `a | b | c` one three-way choice. This holds for a [`sequence`](super::sequence)
//! result too. Decorate the left side (`set_id`, `make_flattened`) to keep
//! an explicit group. Rust's precedence binds `+` tighter than `|`, so
//! `a + b | c` is `(a + b) | c`.

use std::ops::{Add, BitOr};

use super::{Element, Kind};

fn extend_sequence(lhs: Element, rhs: Element) -> Element {
    match lhs.kind() {
        Kind::Sequence(children) if lhs.decor().is_plain() => {
            let mut children = children.clone();
            children.push(rhs);
            Element::from_kind(Kind::Sequence(children))
        }
        _ => Element::from_kind(Kind::Sequence(vec![lhs, rhs])),
    }
}

fn extend_alternation(lhs: Element, rhs: Element) -> Element {
    match lhs.kind() {
        Kind::Alternation(children) if lhs.decor().is_plain() => {
            let mut children = children.clone();
            children.push(rhs);
            Element::from_kind(Kind::Alternation(children))
        }
        _ => Element::from_kind(Kind::Alternation(vec![lhs, rhs])),
    }
}

macro_rules! impl_combinator {
    ($trait:ident, $method:ident, $build:ident) => {
        impl $trait<Element> for Element {
            type Output = Element;

            fn $method(self, rhs: Element) -> Element {
                $build(self, rhs)
            }
        }

        impl $trait<&Element> for Element {
            type Output = Element;

            fn $method(self, rhs: &Element) -> Element {
                $build(self, rhs.clone())
            }
        }

        impl $trait<Element> for &Element {
            type Output = Element;

            fn $method(self, rhs: Element) -> Element {
                $build(self.clone(), rhs)
            }
        }

        impl $trait<&Element> for &Element {
            type Output = Element;

            fn $method(self, rhs: &Element) -> Element {
                $build(self.clone(), rhs.clone())
            }
        }
    };
}

impl_combinator!(Add, add, extend_sequence);
impl_combinator!(BitOr, bitor, extend_alternation);
