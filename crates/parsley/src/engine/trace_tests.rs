use indoc::indoc;
use parsley_core::Colors;

use crate::engine::{Evaluator, NoopTracer, PrintTracer, Verbosity};
use crate::grammar::{Element, integer, literal};

fn trace(element: &Element, input: &str, verbosity: Verbosity) -> String {
    let mut tracer = PrintTracer::new(input, verbosity, Colors::OFF);
    // The trace is wanted whether or not the parse succeeds.
    let _ = Evaluator::builder(input)
        .build()
        .evaluate_with(element, &mut tracer);
    tracer.dump()
}

fn parenthesized() -> Element {
    literal("(").make_stripped() + integer() + literal(")").make_stripped()
}

#[test]
fn default_trace_is_post_order() {
    let dump = trace(&parenthesized(), "(42)", Verbosity::Default);

    insta::assert_snapshot!(dump, @r#"
      strip("(") ✓ 0..1
        /[-+]?\d+/ ✓ 1..3
      integer ✓ 1..3
      strip(")") ✓ 3..4
    (strip("(") + integer + strip(")")) ✓ 0..4
    "#);
}

#[test]
fn verbose_trace_shows_backtracking() {
    let element = literal("a") + literal("b") | literal("a");

    let dump = trace(&element, "ac", Verbosity::Verbose);

    assert_eq!(
        dump,
        indoc! {r#"
            [("a" + "b") | "a"] @0
              ("a" + "b") @0
                "a" @0
                "a" ✓ 0..1 "a"
                "b" @1
                "b" ✗ @1
                backtrack 1 -> 0
              ("a" + "b") ✗ @0
              "a" @0
              "a" ✓ 0..1 "a"
            [("a" + "b") | "a"] ✓ 0..1 "a""#}
    );
}

#[test]
fn span_starts_after_skipped_whitespace() {
    let dump = trace(&literal("x"), "   x", Verbosity::Default);

    insta::assert_snapshot!(dump, @r#""x" ✓ 3..4"#);
}

#[test]
fn failure_trace() {
    let dump = trace(&parenthesized(), "(x)", Verbosity::Default);

    insta::assert_snapshot!(dump, @r#"
      strip("(") ✓ 0..1
        /[-+]?\d+/ ✗ @1
      integer ✗ @1
    (strip("(") + integer + strip(")")) ✗ @0
    "#);
}

#[test]
fn colored_trace() {
    let mut tracer = PrintTracer::new("x", Verbosity::Default, Colors::ON);
    let result = Evaluator::builder("x")
        .build()
        .evaluate_with(&literal("x"), &mut tracer);

    assert!(result.is_ok());
    assert_eq!(
        tracer.lines(),
        ["\x1b[34m\"x\"\x1b[0m \x1b[32m✓\x1b[0m \x1b[2m0..1\x1b[0m"]
    );
}

#[test]
fn noop_tracer_matches_plain_evaluation() {
    let element = parenthesized();

    let traced = Evaluator::builder("(7)")
        .build()
        .evaluate_with(&element, &mut NoopTracer);
    let plain = element.parse("(7)");

    assert_eq!(traced, plain);
}
