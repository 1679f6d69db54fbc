//! Common test fixtures for szpack testing

use crate::TestDir;
use anyhow::Result;
use std::path::PathBuf;

/// Creates a handful of input files and returns them in creation order
pub fn create_test_files(test_dir: &TestDir) -> Result<Vec<PathBuf>> {
    Ok(vec![
        test_dir.create_file("file1.txt", b"This is file 1 content.")?,
        test_dir.create_file("file2.txt", b"This is file 2 content.")?,
        test_dir.create_file("subdir/file3.txt", b"This is file 3 in subdir.")?,
        test_dir.create_file("image.jpg", &[0xFF, 0xD8, 0xFF, 0xE0])?,
    ])
}

/// Creates a directory tree to be archived as a single input
pub fn create_input_tree(test_dir: &TestDir) -> Result<PathBuf> {
    let root = test_dir.create_dir("project")?;
    test_dir.create_file("project/README.md", b"# Test Project\n")?;
    test_dir.create_file("project/src/main.rs", b"fn main() {}")?;
    test_dir.create_file("project/src/modules/mod.rs", b"pub mod utils;")?;
    Ok(root)
}

/// Creates an input whose name would be read as a 7-Zip switch
pub fn create_dash_named_file(test_dir: &TestDir) -> Result<PathBuf> {
    test_dir.create_file("-rf.txt", b"not a switch")
}
