// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use std::fs;
use tempfile::TempDir;

fn tree(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        let path = dir.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }
    dir
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_discover_sorted_and_filtered() {
    let dir = tree(&[
        "zeta_spec.toml",
        "alpha_spec.json",
        "beta_spec.toml",
        "helper.toml",
        "notes_spec.md",
        "nested/deep_spec.toml",
    ]);
    let found = discover(dir.path(), "_spec").unwrap();
    assert_eq!(names(&found), vec!["alpha_spec.json", "beta_spec.toml", "zeta_spec.toml"]);
}

#[test]
fn test_discover_custom_suffix() {
    let dir = tree(&["a_spec.toml", "b_check.toml"]);
    assert_eq!(names(&discover(dir.path(), "_check").unwrap()), vec!["b_check.toml"]);
}

#[test]
fn test_discover_ignores_directories_named_like_specs() {
    let dir = tree(&["real_spec.toml", "fake_spec.toml/inner.txt"]);
    assert_eq!(names(&discover(dir.path(), "_spec").unwrap()), vec!["real_spec.toml"]);
}

#[test]
fn test_discover_escapes_glob_characters() {
    let dir = tree(&["[odd]/a_spec.toml"]);
    let found = discover(&dir.path().join("[odd]"), "_spec").unwrap();
    assert_eq!(names(&found), vec!["a_spec.toml"]);
}

#[test]
fn test_discover_empty_directory() {
    let dir = tree(&[]);
    assert!(discover(dir.path(), "_spec").unwrap().is_empty());
}

#[test]
fn test_discover_missing_directory() {
    let dir = tree(&[]);
    let err = discover(&dir.path().join("nope"), "_spec").unwrap_err();
    assert!(matches!(err, DiscoveryError::MissingDir(_)));
    assert!(err.to_string().starts_with("spec directory not found: "));
}

#[test]
fn test_resolve_with_and_without_extension() {
    let dir = tree(&["specs/math_spec.toml", "specs/list_spec.json"]);
    let base = dir.path();
    let expected = base.join("specs/math_spec.toml");
    assert_eq!(resolve_module(base, Path::new("specs/math_spec.toml")).unwrap(), expected);
    assert_eq!(resolve_module(base, Path::new("specs/math_spec")).unwrap(), expected);
    assert_eq!(
        resolve_module(base, Path::new("specs/list_spec")).unwrap(),
        base.join("specs/list_spec.json")
    );
}

#[test]
fn test_resolve_dotted_module_name() {
    let dir = tree(&["specs/math_spec.toml"]);
    assert_eq!(
        resolve_module(dir.path(), Path::new("specs.math_spec")).unwrap(),
        dir.path().join("specs").join("math_spec.toml")
    );
}

#[test]
fn test_resolve_absolute_path_ignores_base() {
    let dir = tree(&["a_spec.toml"]);
    let absolute = dir.path().join("a_spec");
    assert_eq!(
        resolve_module(Path::new("/elsewhere"), &absolute).unwrap(),
        dir.path().join("a_spec.toml")
    );
}

#[test]
fn test_resolve_missing_module() {
    let dir = tree(&["a_spec.toml"]);
    let err = resolve_module(dir.path(), Path::new("b_spec")).unwrap_err();
    assert!(matches!(err, DiscoveryError::MissingModule(ref p) if p == Path::new("b_spec")));
}
