// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn error_plain_text_when_not_terminal() {
    let mut buf = Vec::new();
    write_error(&mut buf, "spec directory not found", false);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "Error: spec directory not found\n");
}

#[test]
fn error_with_ansi_when_terminal() {
    let mut buf = Vec::new();
    write_error(&mut buf, "spec directory not found", true);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "\x1b[31mError: spec directory not found\x1b[0m\n");
}

#[test]
fn warning_plain_text_when_not_terminal() {
    let mut buf = Vec::new();
    write_warning(&mut buf, "no spec files matched", false);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "Warning: no spec files matched\n");
}

#[test]
fn warning_with_ansi_when_terminal() {
    let mut buf = Vec::new();
    write_warning(&mut buf, "no spec files matched", true);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "\x1b[33mWarning: no spec files matched\x1b[0m\n");
}

#[test]
fn error_with_format_args() {
    let mut buf = Vec::new();
    write_error(&mut buf, format_args!("{} files failed to load", 3), false);
    let output = String::from_utf8(buf).unwrap();
    assert_eq!(output, "Error: 3 files failed to load\n");
}

#[test]
fn debug_is_silent_unless_enabled() {
    let mut buf = Vec::new();
    write_debug(&mut buf, "loading a_spec.toml", false);
    assert!(buf.is_empty());

    write_debug(&mut buf, "loading a_spec.toml", true);
    assert_eq!(String::from_utf8(buf).unwrap(), "debug: loading a_spec.toml\n");
}
