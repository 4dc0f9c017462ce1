// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Backtrace capture is process-wide, so it gets its own test binary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use spectacle_core::{set_backtrace_capture, Comparison, Test};

#[test]
fn captured_backtrace_sits_between_frames_and_error() {
    set_backtrace_capture(true);
    let result = Test::new("traced").expect_value(1).to(Comparison::eq(2)).run();
    set_backtrace_capture(false);

    let trace = result.stack_trace.unwrap();
    assert_eq!(trace.first().unwrap(), "in it \"traced\"");
    assert_eq!(trace.last().unwrap(), "AssertionError: expected 2, but got 1");
    assert!(trace.len() > 2);
}
