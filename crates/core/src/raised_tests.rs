// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use rstest::rstest;

#[rstest]
#[case("core::num::error::ParseIntError", "ParseIntError")]
#[case("ZeroDivisionError", "ZeroDivisionError")]
#[case("alloc::vec::Vec<u8>", "Vec")]
fn test_short_name(#[case] full: &str, #[case] short: &str) {
    assert_eq!(ErrorKind::new(full).short_name(), short);
}

#[test]
fn test_kind_of_rust_type() {
    let kind = ErrorKind::of::<std::num::ParseIntError>();
    assert!(kind.name().ends_with("ParseIntError"));
    assert_eq!(kind.to_string(), "ParseIntError");
}

#[test]
fn test_matches_is_exact() {
    assert!(ErrorKind::ZERO_DIVISION.matches(&ErrorKind::ZERO_DIVISION));
    assert!(!ErrorKind::TYPE.matches(&ErrorKind::ZERO_DIVISION));
}

#[test]
fn test_rust_type_matches_only_its_full_name() {
    let raised = ErrorKind::of::<std::num::ParseIntError>();
    assert!(ErrorKind::of::<std::num::ParseIntError>().matches(&raised));
    assert!(!ErrorKind::new("ParseIntError").matches(&raised));
    assert!(!ErrorKind::new("other::ParseIntError").matches(&raised));
}

#[test]
fn test_shared_short_name_does_not_match_either_type() {
    let io = ErrorKind::of::<std::io::Error>();
    let fmt = ErrorKind::of::<std::fmt::Error>();
    assert_eq!(io.short_name(), fmt.short_name());
    assert!(!ErrorKind::new("Error").matches(&io));
    assert!(!ErrorKind::new("Error").matches(&fmt));
    assert!(!ErrorKind::of::<std::io::Error>().matches(&fmt));
}

#[test]
fn test_from_std_error() {
    fn parse(s: &str) -> Result<i64, Raised> {
        Ok(s.parse::<i64>()?)
    }

    let err = parse("nope").unwrap_err();
    assert_eq!(err.kind().short_name(), "ParseIntError");
    assert_eq!(err.message(), "invalid digit found in string");
}

#[test]
fn test_display() {
    let err = Raised::assertion("expected 2, but got 1");
    assert_eq!(err.to_string(), "AssertionError: expected 2, but got 1");
}

#[test]
fn test_stack_trace_outermost_first() {
    let err = Raised::zero_division()
        .within("while evaluating the actual value")
        .within("in it \"divides\"");

    let trace = err.stack_trace();
    assert_eq!(trace.first().unwrap(), "in it \"divides\"");
    assert_eq!(trace[1], "while evaluating the actual value");
    assert_eq!(trace.last().unwrap(), "ZeroDivisionError: division by zero");
}

#[test]
fn test_context_innermost_first() {
    let err = Raised::usage("bad").within("inner").within("outer");
    assert_eq!(err.context(), ["inner", "outer"]);
}

#[test]
fn test_misuse_survives_context() {
    let err = Raised::attribute("No such attribute: x").as_misuse().within("in let 'y'");
    assert!(err.is_misuse());
    assert!(Raised::usage("bad").is_misuse());
    assert!(!Raised::zero_division().is_misuse());
}
