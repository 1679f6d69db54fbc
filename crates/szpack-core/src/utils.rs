//! Utility functions for szpack-core

use std::path::Path;
use walkdir::WalkDir;

/// Calculate the total size of a path (file or directory) in bytes
///
/// # Arguments
/// * `path` - The path to calculate size for
///
/// # Returns
/// The total size in bytes, or 0 if the path cannot be accessed
pub fn calculate_path_size<P: AsRef<Path>>(path: P) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Total size of several inputs
pub fn calculate_total_size<I, P>(paths: I) -> u64
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(calculate_path_size).sum()
}

/// Human-readable byte count using binary units
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
