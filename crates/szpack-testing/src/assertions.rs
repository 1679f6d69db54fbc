//! Common assertions for szpack testing

use anyhow::Result;
use std::path::Path;
use walkdir::WalkDir;

/// Asserts that `text` never contains `secret`
pub fn assert_redacted(text: &str, secret: &str) {
    assert!(
        !text.contains(secret),
        "secret leaked into output: {:?}",
        text
    );
}

/// Asserts that `args` contains `expected` as a contiguous run
pub fn assert_args_contain(args: &[String], expected: &[&str]) {
    let found = args
        .windows(expected.len())
        .any(|window| window.iter().zip(expected).all(|(a, e)| a == e));
    assert!(found, "expected {:?} in arguments {:?}", expected, args);
}

/// Asserts that no archive files exist anywhere under `dir`
pub fn assert_no_archives(dir: &Path) -> Result<()> {
    let archives: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "7z"))
        .map(|e| e.path().to_path_buf())
        .collect();

    assert!(archives.is_empty(), "unexpected archives: {:?}", archives);
    Ok(())
}
