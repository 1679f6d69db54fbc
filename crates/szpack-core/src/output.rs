//! Output path derivation and preparation

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension given to archives produced by szpack
pub const ARCHIVE_EXTENSION: &str = "7z";

const FALLBACK_NAME: &str = "archive";

/// Derive an output path from the first input.
///
/// `reports/q3.csv` becomes `reports/q3.7z`; a directory `photos/` becomes
/// `photos.7z` next to it. Inputs without a usable name fall back to
/// `archive.7z` in the current directory.
pub fn derive_output_path<P: AsRef<Path>>(first_input: P) -> PathBuf {
    let input = first_input.as_ref();

    let name = if input.is_dir() {
        input.file_name()
    } else {
        input.file_stem()
    };

    match name.filter(|n| !n.is_empty()) {
        Some(name) => {
            let mut file_name = name.to_os_string();
            file_name.push(".");
            file_name.push(ARCHIVE_EXTENSION);
            input.with_file_name(file_name)
        }
        None => PathBuf::from(format!("{}.{}", FALLBACK_NAME, ARCHIVE_EXTENSION)),
    }
}

/// Normalize a user-supplied output path: reject empty paths and append
/// `.7z` when no extension is present.
pub fn normalize_output_path<P: AsRef<Path>>(output: P) -> Result<PathBuf> {
    let output = output.as_ref();
    if output.as_os_str().is_empty() || output.to_string_lossy().trim().is_empty() {
        return Err(Error::EmptyOutputPath);
    }

    if output.extension().is_none() {
        let mut with_ext = output.as_os_str().to_os_string();
        with_ext.push(".");
        with_ext.push(ARCHIVE_EXTENSION);
        return Ok(PathBuf::from(with_ext));
    }

    Ok(output.to_path_buf())
}

/// Make the output location writable for a fresh archive.
///
/// Creates missing parent directories. An existing file at `output` is an
/// error unless `overwrite` is set, in which case it is removed so that 7-Zip
/// does not merge the new inputs into the old archive.
pub fn prepare_output<P: AsRef<Path>>(output: P, overwrite: bool) -> Result<()> {
    let output = output.as_ref();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            info!("Creating output directory: {:?}", parent);
            fs::create_dir_all(parent)?;
        }
    }

    if output.exists() {
        if !overwrite {
            return Err(Error::OutputExists(output.to_path_buf()));
        }
        debug!("Removing existing archive: {:?}", output);
        fs::remove_file(output)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derive_from_file_replaces_extension() {
        assert_eq!(
            derive_output_path("reports/q3.csv"),
            PathBuf::from("reports/q3.7z")
        );
        assert_eq!(derive_output_path("notes"), PathBuf::from("notes.7z"));
    }

    #[test]
    fn test_derive_from_directory_keeps_full_name() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("release.v2");
        fs::create_dir(&dir).unwrap();

        assert_eq!(
            derive_output_path(&dir),
            temp_dir.path().join("release.v2.7z")
        );
    }

    #[test]
    fn test_derive_without_name_falls_back() {
        assert_eq!(derive_output_path("/"), PathBuf::from("archive.7z"));
    }

    #[test]
    fn test_normalize_appends_extension() {
        assert_eq!(
            normalize_output_path("out/backup").unwrap(),
            PathBuf::from("out/backup.7z")
        );
        assert_eq!(
            normalize_output_path("out/backup.7z").unwrap(),
            PathBuf::from("out/backup.7z")
        );
        assert_eq!(
            normalize_output_path("backup.zip").unwrap(),
            PathBuf::from("backup.zip")
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(
            normalize_output_path(""),
            Err(Error::EmptyOutputPath)
        ));
        assert!(matches!(
            normalize_output_path("   "),
            Err(Error::EmptyOutputPath)
        ));
    }

    #[test]
    fn test_prepare_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("a/b/c/out.7z");

        prepare_output(&output, false).unwrap();
        assert!(output.parent().unwrap().is_dir());
        assert!(!output.exists());
    }

    #[test]
    fn test_prepare_refuses_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.7z");
        fs::write(&output, "old").unwrap();

        let result = prepare_output(&output, false);
        assert!(matches!(result, Err(Error::OutputExists(_))));
        assert!(output.exists());

        prepare_output(&output, true).unwrap();
        assert!(!output.exists());
    }
}
