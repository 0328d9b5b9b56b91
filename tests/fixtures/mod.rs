//! Requirements fixtures for golden-file assertions
//!
//! Three sub-project requirement files that merge cleanly, one file that
//! conflicts with them, and the expected merged output.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the requirement fixtures
pub fn requirements_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/requirements")
}

/// Path to one fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    requirements_dir().join(name)
}

/// Contents of one fixture file
pub fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture readable")
}

/// Inputs that merge without conflict, in merge order
pub const CLEAN_INPUTS: &[&str] = &["api.txt", "web.txt", "worker.txt"];

/// Pins `requests` differently from `web.txt`
pub const CONFLICTING_INPUT: &str = "conflict.txt";

/// Expected merge of `CLEAN_INPUTS` with default settings
pub const GOLDEN_OUTPUT: &str = "merged.golden.txt";

/// `--input` argument for the given fixtures
pub fn input_arg(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| fixture_path(n).display().to_string())
        .collect::<Vec<_>>()
        .join("|")
}
