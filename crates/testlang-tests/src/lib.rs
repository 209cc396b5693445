//! Shared fixtures for the TestLang integration tests.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Directory holding the sample `.test` programs.
pub fn examples_dir() -> PathBuf {
    // sample programs sit beside this crate under crates/
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("../testlang-examples");
    p
}

/// Every `.test` file in [`examples_dir`], sorted by path.
pub fn example_files() -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(examples_dir())? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("test") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn read_example(name: &str) -> io::Result<String> {
    fs::read_to_string(examples_dir().join(name))
}
