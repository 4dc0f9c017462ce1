// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared helpers for binary tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const PASSING: &str = r#"
[[describe]]
name = "math"
let = { two = 2 }

  [[describe.it]]
  name = "adds"
  expect = { "$add" = [1, { "$ref" = "two" }] }
  to = "eq"
  args = [3]
"#;

pub const FAILING: &str = r#"
[[describe]]
name = "broken"

  [[describe.it]]
  name = "bad"
  expect = 1
  to = "eq"
  args = [2]
"#;

/// Create a temporary directory holding the given spec files
pub fn spec_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        write_spec(dir.path(), name, content);
    }
    dir
}

/// Write one spec file below `root`, creating parent directories
pub fn write_spec(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
