use std::sync::LazyLock;
use std::thread;

use parsley_core::{CharSet, ScanError};

use crate::engine::{Evaluator, FuelLimits, ParseError};
use crate::grammar::{
    DelimitedList, Element, double, end_of_input, integer, literal, one_or_more, pattern,
    pattern_groups, sequence, zero_or_more, zero_or_one,
};
use crate::value::Value;

fn word() -> Element {
    pattern(r"\w+").expect("valid pattern")
}

fn json(value: &Value) -> String {
    serde_json::to_string(value).expect("json serialization failed")
}

fn error(element: &Element, input: &str) -> String {
    element.parse(input).unwrap_err().to_string()
}

/// `name(arg, ...)` groups as used by SVG `transform` attributes.
fn transforms() -> Element {
    let name = pattern(r"[a-zA-Z]+").expect("valid pattern");
    let arguments = DelimitedList::new(double()).build().make_flattened();
    one_or_more(name + literal("(").make_stripped() + arguments + literal(")").make_stripped())
}

#[test]
fn literal_skips_leading_whitespace() {
    let result = literal("hello").parse("  hello world").unwrap();

    assert_eq!(result, "hello");
}

#[test]
fn literal_mismatch() {
    let err = literal("x").parse("y").unwrap_err();

    assert_eq!(
        err,
        ParseError::NoMatch {
            position: 0,
            line: 1,
            column: 1,
            expected: vec![r#""x""#.to_owned()],
        }
    );
    insta::assert_snapshot!(err, @r#"no match at 1:1: expected "x""#);
}

#[test]
fn literal_consumes_exactly_its_text() {
    let (value, end) = literal("hello").parse_prefix("hello").unwrap();

    assert_eq!(value, "hello");
    assert_eq!(end, "hello".len());
}

#[test]
fn reparsing_matched_prefix_is_stable() {
    let grammar = transforms();
    let input = "translate(1, 2) scale(3) !trailing";

    let (first, end) = grammar.parse_prefix(input).unwrap();
    let (second, reparsed_end) = grammar.parse_prefix(&input[..end]).unwrap();

    assert_eq!(first, second);
    assert_eq!(reparsed_end, end);
}

#[test]
fn delimited_list_exact_count() {
    let list = DelimitedList::new(word()).min(2).max(2).build();

    let result = list.parse("hello, world").unwrap();

    insta::assert_snapshot!(json(&result), @r#"["hello","world"]"#);
}

#[test]
fn delimited_list_too_short() {
    let list = DelimitedList::new(word()).min(2).max(2).build();

    insta::assert_snapshot!(error(&list, "hello"), @r#"no match at 1:6: expected ",""#);
}

#[test]
fn delimited_list_stops_at_max() {
    let list = DelimitedList::new(word()).max(2).build();

    let result = list.parse("a, b, c").unwrap();

    insta::assert_snapshot!(json(&result), @r#"["a","b"]"#);
}

#[test]
fn delimited_list_leaves_trailing_separator() {
    let element = DelimitedList::new(word()).build() + literal(",");

    let result = element.parse("a, b,").unwrap();

    insta::assert_snapshot!(json(&result), @r#"[["a","b"],","]"#);
}

#[test]
fn delimited_list_keeps_plain_separator() {
    let list = DelimitedList::new(integer()).separator(";").build();

    let result = list.parse("1; 2; 3").unwrap();

    insta::assert_snapshot!(json(&result), @r#"[1,";",2,";",3]"#);
}

#[test]
fn ordered_choice_takes_first_match() {
    let element = literal("a") | literal("ab");

    assert_eq!(element.parse("ab").unwrap(), "a");
    insta::assert_snapshot!(
        element.parse_all("ab").unwrap_err(),
        @"no match at 1:2: expected end of input"
    );
}

#[test]
fn failed_sequence_rolls_back() {
    let element = (literal("a") + literal("b")) | (literal("a") + literal("c"));

    let result = element.parse("ac").unwrap();

    insta::assert_snapshot!(json(&result), @r#"["a","c"]"#);
}

#[test]
fn failed_sequence_restores_cursor() {
    let element = zero_or_one(literal("a") + literal("b"));

    let (value, end) = element.parse_prefix("ac").unwrap();

    assert_eq!(value, Value::List(Vec::new()));
    assert_eq!(end, 0);
}

#[test]
fn built_sequence_extends_flat() {
    let flat = sequence(["a", "b"]) + literal("c");
    let grouped = sequence(["a", "b"]).set_id("pair") + literal("c");

    insta::assert_snapshot!(json(&flat.parse("abc").unwrap()), @r#"["a","b","c"]"#);
    insta::assert_snapshot!(json(&grouped.parse("abc").unwrap()), @r#"[["a","b"],"c"]"#);
}

#[test]
fn stripped_delimiters_unwrap_root() {
    let lparen = literal("(").make_stripped();
    let rparen = literal(")").make_stripped();

    let result = (&lparen + integer() + &rparen).parse("(42)").unwrap();
    assert_eq!(result, 42_i64);

    let result = (&lparen + double() + &rparen).parse("( 42 )").unwrap();
    assert_eq!(result, 42.0_f64);
}

#[test]
fn stripped_everything_is_empty_list() {
    let element = literal("a").make_stripped() + literal("b").make_stripped();

    assert_eq!(element.parse("ab").unwrap(), Value::List(Vec::new()));
}

#[test]
fn translate_transform() {
    let result = transforms().parse("translate(0,0)").unwrap();

    assert_eq!(
        result[0],
        Value::from(vec![Value::from("translate"), 0.0.into(), 0.0.into()])
    );
}

#[test]
fn transform_list() {
    let result = transforms()
        .parse("translate(10, 20) rotate(45) scale(1.5, 2)")
        .unwrap();

    insta::assert_snapshot!(
        json(&result),
        @r#"[["translate",10.0,20.0],["rotate",45.0],["scale",1.5,2.0]]"#
    );
}

#[test]
fn flatten_splices_into_parent() {
    let pair = (word() + word()).make_flattened();
    let element = literal("<") + pair + literal(">");

    let result = element.parse("< a b >").unwrap();

    insta::assert_snapshot!(json(&result), @r#"["<","a","b",">"]"#);
}

#[test]
fn zero_width_repetition_terminates() {
    let element = zero_or_more(zero_or_one(literal("")));

    assert_eq!(element.parse("abc").unwrap(), Value::List(Vec::new()));
}

#[test]
fn zero_width_delimited_list_terminates() {
    let element = DelimitedList::new(zero_or_more("x")).separator(zero_or_one(",")).build();

    assert_eq!(element.parse("abc").unwrap(), Value::List(Vec::new()));
}

#[test]
fn repetition_minimum() {
    let element = one_or_more(literal("a")) + literal("b");

    insta::assert_snapshot!(json(&element.parse("aab").unwrap()), @r#"[["a","a"],"b"]"#);
    insta::assert_snapshot!(error(&element, "b"), @r#"no match at 1:1: expected "a""#);
}

#[test]
fn named_groups() {
    let element = pattern_groups(r"(?<key>\w+)=(?<value>\w+)?").unwrap();

    let result = element.parse("name=").unwrap();

    insta::assert_snapshot!(json(&result), @r#"{"key":"name","value":null}"#);
    assert_eq!(*result.field("key").unwrap(), "name");
    assert!(result.field("value").unwrap().is_null());
}

#[test]
fn positional_groups() {
    let element = pattern_groups(r"(\d+)-(\d+)").unwrap();

    let result = element.parse("10-20").unwrap();

    insta::assert_snapshot!(json(&result), @r#"{"1":"10","2":"20"}"#);
}

#[test]
fn integer_overflow_falls_through() {
    let digits = pattern(r"\d+").unwrap();
    let element = integer() | digits;
    let huge = "99999999999999999999";

    assert_eq!(element.parse(huge).unwrap(), huge);
    insta::assert_snapshot!(error(&integer(), huge), @"no match at 1:1: expected integer");
}

#[test]
fn double_forms() {
    assert_eq!(double().parse("-1.5e3").unwrap(), -1500.0_f64);
    assert_eq!(double().parse(".5").unwrap(), 0.5_f64);
    assert_eq!(double().parse("7").unwrap(), 7.0_f64);
    assert!(double().parse("1e999").is_err());
}

#[test]
fn custom_conversion() {
    let boolean = (literal("true") | literal("false")).convert(|text| match text {
        "true" => Some(Value::Integer(1)),
        "false" => Some(Value::Integer(0)),
        _ => None,
    });

    assert_eq!(boolean.parse(" false").unwrap(), 0_i64);
}

#[test]
fn recursive_grammar() {
    let value = Element::recursive("value", |value| {
        let list = literal("[").make_stripped()
            + DelimitedList::new(value).build()
            + literal("]").make_stripped();
        integer() | list.make_flattened()
    });

    let result = value.parse("[1, [2, 3], []]").unwrap();

    insta::assert_snapshot!(json(&result), @"[1,[2,3],[]]");
}

#[test]
fn recursion_limit() {
    let nested = Element::recursive("nested", |nested| {
        literal("(").make_stripped() + zero_or_more(nested) + literal(")").make_stripped()
    });
    let input = format!("{}{}", "(".repeat(200), ")".repeat(200));

    let result = Evaluator::builder(&input)
        .recursion_limit(64)
        .build()
        .evaluate(&nested);

    assert_eq!(result, Err(ParseError::RecursionLimitExceeded(64)));
}

#[test]
fn default_limits_stop_deep_nesting() {
    let nested = Element::recursive("nested", |nested| {
        literal("(").make_stripped() + zero_or_more(nested) + literal(")").make_stripped()
    });
    let input = format!("{}{}", "(".repeat(5000), ")".repeat(5000));

    let result = thread::spawn(move || nested.parse(&input)).join().unwrap();

    assert_eq!(FuelLimits::default().get_recursion_limit(), 256);
    assert_eq!(result, Err(ParseError::RecursionLimitExceeded(256)));
}

#[test]
fn default_limits_stop_deep_lists() {
    let value = Element::recursive("value", |value| {
        let list = literal("[").make_stripped()
            + DelimitedList::new(value).build()
            + literal("]").make_stripped();
        integer() | list.make_flattened()
    });
    let input = format!("{}{}", "[".repeat(5000), "]".repeat(5000));

    let result = thread::spawn(move || value.parse(&input)).join().unwrap();

    assert_eq!(result, Err(ParseError::RecursionLimitExceeded(256)));
}

#[test]
fn left_recursion_hits_limit() {
    let expr = Element::recursive("expr", |expr| expr + literal("x"));

    let result = Evaluator::builder("xx")
        .limits(FuelLimits::new().recursion_limit(100))
        .build()
        .evaluate(&expr);

    insta::assert_snapshot!(result.unwrap_err(), @"recursion limit of 100 exceeded");
}

#[test]
fn exec_fuel() {
    let element = one_or_more(literal("a"));
    let input = "a".repeat(100);

    let result = Evaluator::builder(&input).exec_fuel(10).build().evaluate(&element);

    assert_eq!(result, Err(ParseError::ExecFuelExhausted(10)));
}

#[test]
fn dangling_rule() {
    let nested = Element::recursive("nested", |nested| {
        literal("(") + zero_or_one(nested) + literal(")")
    });
    let body = nested.children()[0].clone();
    drop(nested);

    let result = body.parse("(())");

    assert_eq!(result, Err(ParseError::DanglingRule("nested".to_owned())));
}

#[test]
fn end_of_input_element() {
    let element = integer() + end_of_input();

    assert_eq!(element.parse("42  ").unwrap(), 42_i64);
    insta::assert_snapshot!(error(&element, "42 x"), @"no match at 1:4: expected end of input");
}

#[test]
fn parse_all_requires_end() {
    assert_eq!(integer().parse_all("42 ").unwrap(), 42_i64);
    assert_eq!(integer().parse("42 x").unwrap(), 42_i64);
    insta::assert_snapshot!(
        integer().parse_all("42 x").unwrap_err(),
        @"no match at 1:4: expected end of input"
    );
}

#[test]
fn expected_lists_every_alternative() {
    let element = literal("a") | literal("b") | integer();

    insta::assert_snapshot!(error(&element, "?"), @r#"no match at 1:1: expected "a", "b" or integer"#);
}

#[test]
fn expected_reports_furthest_position() {
    let element = literal("a") + literal("b") | literal("a") + literal("c");

    insta::assert_snapshot!(error(&element, "ax"), @r#"no match at 1:2: expected "b" or "c""#);
}

#[test]
fn expected_uses_line_and_column() {
    let element = literal("a") + literal("b");

    insta::assert_snapshot!(error(&element, "a\n  c"), @r#"no match at 2:3: expected "b""#);
}

#[test]
fn expected_prefers_id() {
    let element = literal("x=") + pattern(r"\d+").unwrap().set_id("number");

    insta::assert_snapshot!(error(&element, "x=y"), @"no match at 1:3: expected number");
}

#[test]
fn custom_skip_set() {
    let element = literal("a") + literal("b");
    let skip = CharSet::from_chars("_");

    let result = Evaluator::builder("a__b").skip(skip).build().evaluate(&element);
    assert_eq!(json(&result.unwrap()), r#"["a","b"]"#);

    assert!(element.parse("a__b").is_err());
}

#[test]
fn without_skip() {
    let element = literal("a") + literal("b");

    let result = Evaluator::builder("a b").without_skip().build().evaluate(&element);

    insta::assert_snapshot!(result.unwrap_err(), @r#"no match at 1:2: expected "b""#);
}

#[test]
fn scanner_errors_convert() {
    let err = ParseError::from(ScanError::MarkUnderflow);

    insta::assert_snapshot!(err, @"mark stack underflow: no outstanding mark to restore");
}

static NUMBERS: LazyLock<Element> =
    LazyLock::new(|| DelimitedList::new(integer()).min(1).build());

#[test]
fn static_grammar_across_threads() {
    let handles: Vec<_> = (0..4i64)
        .map(|i| thread::spawn(move || NUMBERS.parse(&format!("{i}, {}", i * 10))))
        .collect();

    for (i, handle) in (0..4i64).zip(handles) {
        let result = handle.join().expect("thread panicked").unwrap();
        assert_eq!(result, Value::from(vec![i, i * 10]));
    }
}
