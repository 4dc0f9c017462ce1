// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::value::Object;
use rstest::rstest;
use std::collections::BTreeMap;

fn judge(comparison: &Comparison, actual: Result<Value, Raised>) -> Outcome {
    let mut actual = Some(actual);
    comparison.evaluate(&mut || actual.take().unwrap())
}

fn fail_message(outcome: Outcome) -> String {
    match outcome {
        Outcome::Fail(err) => err.message().to_string(),
        other => panic!("expected a failure, got {other:?}"),
    }
}

fn misuse(outcome: Outcome) -> Raised {
    match outcome {
        Outcome::Misuse(err) => err,
        other => panic!("expected a misuse, got {other:?}"),
    }
}

fn dog() -> Value {
    Value::from(
        Object::new("Dog")
            .with_attr("name", "rex")
            .with_method("bark", |_| Ok(Value::from("woof"))),
    )
}

#[rstest]
#[case("eq", Strategy::Eq)]
#[case("raise_error", Strategy::RaiseError)]
#[case("be_a", Strategy::BeA)]
#[case("include", Strategy::Include)]
#[case("be_empty", Strategy::BeEmpty)]
#[case("have_keys", Strategy::HaveKeys)]
#[case("have_attributes", Strategy::HaveAttributes)]
#[case("have_methods", Strategy::HaveMethods)]
fn test_strategy_names_round_trip(#[case] name: &str, #[case] strategy: Strategy) {
    assert_eq!(name.parse::<Strategy>().unwrap(), strategy);
    assert_eq!(strategy.to_string(), name);
}

#[test]
fn test_unknown_strategy() {
    let err = Comparison::named("equalish", vec![]).unwrap_err();
    assert_eq!(err.to_string(), "unknown comparison strategy 'equalish'");
}

#[test]
fn test_eq_pass_and_fail() {
    assert!(judge(&Comparison::eq(2), Ok(Value::from(2))).is_pass());
    assert_eq!(
        fail_message(judge(&Comparison::eq(2), Ok(Value::from(1)))),
        "expected 2, but got 1"
    );
}

#[test]
fn test_eq_quotes_strings_in_diagnostic() {
    assert_eq!(
        fail_message(judge(&Comparison::eq("1"), Ok(Value::from(1)))),
        "expected '1', but got 1"
    );
}

#[test]
fn test_producer_error_is_a_failure() {
    let outcome = judge(&Comparison::eq(2), Err(Raised::zero_division()));
    match outcome {
        Outcome::Fail(err) => {
            assert_eq!(err.kind(), &ErrorKind::ZERO_DIVISION);
            assert_eq!(err.context(), ["while evaluating the actual value"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_raise_error_matching_kind() {
    let c = Comparison::raise_error(ErrorKind::ZERO_DIVISION);
    assert!(judge(&c, Err(Raised::zero_division())).is_pass());
}

#[test]
fn test_raise_error_is_exact() {
    let c = Comparison::raise_error(ErrorKind::TYPE);
    assert_eq!(
        fail_message(judge(&c, Err(Raised::zero_division()))),
        "expected TypeError, but got ZeroDivisionError: division by zero"
    );
}

#[test]
fn test_raise_error_without_error() {
    let c = Comparison::raise_error(ErrorKind::TYPE);
    assert_eq!(
        fail_message(judge(&c, Ok(Value::from(3)))),
        "No error was raised, instead got 3"
    );
}

#[test]
fn test_raise_error_with_rust_error_type() {
    let c = Comparison::raise_error(ErrorKind::of::<std::num::ParseIntError>());
    let raised: Raised = "x".parse::<i64>().unwrap_err().into();
    assert!(judge(&c, Err(raised)).is_pass());
}

#[rstest]
#[case(Value::from(1), ValueType::Int, true)]
#[case(Value::from(1.0), ValueType::Int, false)]
#[case(Value::from("s"), ValueType::Str, true)]
#[case(dog(), ValueType::Object("Dog".to_string()), true)]
#[case(dog(), ValueType::Object("Cat".to_string()), false)]
fn test_be_a(#[case] actual: Value, #[case] expected: ValueType, #[case] passes: bool) {
    let outcome = judge(&Comparison::be_a(expected), Ok(actual));
    assert_eq!(outcome.is_pass(), passes);
}

#[test]
fn test_be_a_diagnostic() {
    assert_eq!(
        fail_message(judge(&Comparison::be_a(ValueType::Str), Ok(Value::from(1)))),
        "expected str, but got int"
    );
}

#[test]
fn test_include() {
    let c = Comparison::include([1, 2]);
    assert!(judge(&c, Ok(Value::from(vec![1, 2, 3]))).is_pass());
    assert_eq!(
        fail_message(judge(&c, Ok(Value::from(vec![1, 3])))),
        "expected [1, 2] to be included, missing [2], but got [1, 3]"
    );
}

#[test]
fn test_include_substring_and_key() {
    assert!(judge(&Comparison::include(["ell"]), Ok(Value::from("hello"))).is_pass());

    let mut map = BTreeMap::new();
    map.insert("a".to_string(), Value::from(1));
    assert!(judge(&Comparison::include(["a"]), Ok(Value::from(map))).is_pass());
}

#[test]
fn test_include_on_non_iterable_is_misuse() {
    let err = misuse(judge(&Comparison::include([1]), Ok(Value::from(5))));
    assert_eq!(err.kind(), &ErrorKind::TYPE);
    assert_eq!(err.message(), "the result of the test is not an iterable");
}

#[rstest]
#[case(Value::from(""), true)]
#[case(Value::List(vec![]), true)]
#[case(Value::Map(BTreeMap::new()), true)]
#[case(Value::from("x"), false)]
#[case(Value::from(vec![0]), false)]
fn test_be_empty(#[case] actual: Value, #[case] passes: bool) {
    assert_eq!(judge(&Comparison::be_empty(), Ok(actual)).is_pass(), passes);
}

#[test]
fn test_be_empty_diagnostic_and_misuse() {
    assert_eq!(
        fail_message(judge(&Comparison::be_empty(), Ok(Value::from(vec![1])))),
        "expected an empty iterable, but got [1]"
    );
    let err = misuse(judge(&Comparison::be_empty(), Ok(Value::from(3))));
    assert_eq!(err.message(), "the result of the test is not an iterable");
}

#[test]
fn test_have_keys() {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), Value::from(1));
    map.insert("b".to_string(), Value::from(2));
    let actual = Value::from(map);

    assert!(judge(&Comparison::have_keys(["a", "b"]), Ok(actual.clone())).is_pass());
    assert_eq!(
        fail_message(judge(&Comparison::have_keys(["a", "c"]), Ok(actual))),
        "expected keys ['c'], but got ['a', 'b']"
    );
}

#[test]
fn test_have_keys_on_non_map_is_misuse() {
    let err = misuse(judge(&Comparison::have_keys(["a"]), Ok(Value::from(vec![1]))));
    assert_eq!(err.kind(), &ErrorKind::TYPE);
    assert_eq!(err.message(), "the result of the test is not a dictionary");
}

#[test]
fn test_have_attributes_and_methods() {
    assert!(judge(&Comparison::have_attributes(["name", "bark"]), Ok(dog())).is_pass());
    assert!(judge(&Comparison::have_methods(["bark"]), Ok(dog())).is_pass());
    assert_eq!(
        fail_message(judge(&Comparison::have_methods(["name"]), Ok(dog()))),
        "expected methods ['name'], but got ['bark', 'name']"
    );
    assert_eq!(
        fail_message(judge(&Comparison::have_attributes(["age"]), Ok(dog()))),
        "expected attributes ['age'], but got ['bark', 'name']"
    );
}

#[rstest]
#[case(Comparison::new(Strategy::Eq, vec![]))]
#[case(Comparison::new(Strategy::Eq, vec![Value::from(1), Value::from(2)]))]
#[case(Comparison::new(Strategy::RaiseError, vec![Value::from("TypeError")]))]
#[case(Comparison::new(Strategy::BeA, vec![Value::from(1)]))]
#[case(Comparison::new(Strategy::BeEmpty, vec![Value::from(1)]))]
#[case(Comparison::new(Strategy::Include, vec![]))]
#[case(Comparison::new(Strategy::HaveKeys, vec![Value::from(1)]))]
fn test_bad_arguments_are_usage_errors_before_producer_runs(#[case] comparison: Comparison) {
    let mut calls = 0;
    let outcome = comparison.evaluate(&mut || {
        calls += 1;
        Ok(Value::Nil)
    });
    assert_eq!(misuse(outcome).kind(), &ErrorKind::USAGE);
    assert_eq!(calls, 0);
}

#[test]
fn test_misuse_from_actual_is_not_a_failure() {
    let c = Comparison::eq(1);
    let err = misuse(judge(&c, Err(Raised::attribute("No such attribute: x").as_misuse())));
    assert_eq!(err.kind(), &ErrorKind::ATTRIBUTE);
    assert!(err.is_misuse());
}

#[test]
fn test_raise_error_misuse_unless_expected() {
    let missing = || Err(Raised::attribute("No such attribute: x").as_misuse());

    let expected = Comparison::raise_error(ErrorKind::ATTRIBUTE);
    assert!(matches!(judge(&expected, missing()), Outcome::Pass));

    let other = Comparison::raise_error(ErrorKind::KEY);
    assert_eq!(misuse(judge(&other, missing())).message(), "No such attribute: x");
}
