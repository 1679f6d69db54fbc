//! Validated description of a single archive job

use crate::output::{derive_output_path, normalize_output_path};
use crate::selection::FileSelection;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 7-Zip compression level (`-mx`), 0 = store only, 9 = ultra
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = 9;

    pub fn new(level: u32) -> Result<Self> {
        if level > Self::MAX {
            return Err(Error::InvalidLevel(level));
        }
        Ok(Self(level as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Short label for menus and summaries
    pub fn describe(self) -> &'static str {
        match self.0 {
            0 => "store",
            1 => "fastest",
            2..=4 => "fast",
            5 => "normal",
            6..=8 => "maximum",
            _ => "ultra",
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u32> for CompressionLevel {
    type Error = Error;

    fn try_from(level: u32) -> Result<Self> {
        Self::new(level)
    }
}

impl From<CompressionLevel> for u32 {
    fn from(level: CompressionLevel) -> Self {
        level.0 as u32
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.describe())
    }
}

/// Archive password. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        if password.is_empty() {
            return Err(Error::EmptyPassword);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Encryption settings for the archive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Encryption {
    #[default]
    None,
    /// AES-256 with the given password; `encrypt_headers` also hides file names
    Aes256 {
        password: Password,
        encrypt_headers: bool,
    },
}

impl Encryption {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Encryption::Aes256 { .. })
    }
}

/// A fully validated archive job
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    level: CompressionLevel,
    encryption: Encryption,
    overwrite: bool,
}

impl ArchiveRequest {
    pub fn builder() -> ArchiveRequestBuilder {
        ArchiveRequestBuilder::default()
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    pub fn encryption(&self) -> &Encryption {
        &self.encryption
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }
}

/// Collects raw user input and validates it into an [`ArchiveRequest`]
#[derive(Clone)]
pub struct ArchiveRequestBuilder {
    selection: FileSelection,
    output: Option<PathBuf>,
    level: u32,
    encrypt: bool,
    password: Option<String>,
    encrypt_headers: bool,
    overwrite: bool,
}

impl Default for ArchiveRequestBuilder {
    fn default() -> Self {
        Self {
            selection: FileSelection::new(),
            output: None,
            level: CompressionLevel::default().get() as u32,
            encrypt: false,
            password: None,
            encrypt_headers: true,
            overwrite: false,
        }
    }
}

impl ArchiveRequestBuilder {
    pub fn input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.selection.add(path);
        self
    }

    pub fn inputs<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.selection.extend(paths);
        self
    }

    pub fn selection(mut self, selection: FileSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn output<P: Into<PathBuf>>(mut self, output: Option<P>) -> Self {
        self.output = output.map(Into::into);
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn encrypt(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    pub fn password<S: Into<String>>(mut self, password: Option<S>) -> Self {
        self.password = password.map(Into::into);
        self
    }

    pub fn encrypt_headers(mut self, encrypt_headers: bool) -> Self {
        self.encrypt_headers = encrypt_headers;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Validate everything and produce the request.
    ///
    /// Checks, in order: at least one input, every input exists, level in
    /// range, password present when encrypting, output path non-empty and
    /// distinct from every input. Supplying a password implies encryption.
    pub fn build(self) -> Result<ArchiveRequest> {
        let first = self.selection.first().ok_or(Error::NoInputs)?;

        if let Some(missing) = self.selection.missing().first() {
            return Err(Error::MissingInput(missing.to_path_buf()));
        }

        let level = CompressionLevel::new(self.level)?;

        let encrypt = self.encrypt || self.password.is_some();
        let encryption = if encrypt {
            let password = Password::new(self.password.unwrap_or_default())?;
            Encryption::Aes256 {
                password,
                encrypt_headers: self.encrypt_headers,
            }
        } else {
            Encryption::None
        };

        let output = match self.output {
            Some(output) => normalize_output_path(output)?,
            None => derive_output_path(first),
        };

        if self.selection.iter().any(|input| same_file(input, &output)) {
            return Err(Error::OutputIsInput(output));
        }

        Ok(ArchiveRequest {
            inputs: self.selection.as_slice().to_vec(),
            output,
            level,
            encryption,
            overwrite: self.overwrite,
        })
    }
}

/// Compare canonical paths when both exist; inputs always exist after
/// validation, so a missing output can never be one of them.
fn same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        fs::write(&a, "alpha").unwrap();
        fs::write(&b, "beta").unwrap();
        (temp_dir, a, b)
    }

    #[test]
    fn test_level_bounds() {
        assert_eq!(CompressionLevel::new(0).unwrap().get(), 0);
        assert_eq!(CompressionLevel::new(9).unwrap().get(), 9);
        assert!(matches!(
            CompressionLevel::new(10),
            Err(Error::InvalidLevel(10))
        ));
        assert_eq!(CompressionLevel::default().describe(), "normal");
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter2").unwrap();
        assert!(!format!("{:?}", password).contains("hunter2"));
        assert!(matches!(Password::new(""), Err(Error::EmptyPassword)));
    }

    #[test]
    fn test_build_derives_output_from_first_input() {
        let (temp_dir, a, b) = fixture();
        let request = ArchiveRequest::builder()
            .inputs([&a, &b, &a])
            .build()
            .unwrap();

        assert_eq!(request.inputs(), &[a, b]);
        assert_eq!(request.output(), temp_dir.path().join("a.7z"));
        assert_eq!(request.level().get(), 5);
        assert!(!request.encryption().is_enabled());
    }

    #[test]
    fn test_build_requires_inputs() {
        let result = ArchiveRequest::builder().build();
        assert!(matches!(result, Err(Error::NoInputs)));
    }

    #[test]
    fn test_build_rejects_missing_input() {
        let (temp_dir, a, _) = fixture();
        let ghost = temp_dir.path().join("ghost.txt");

        let result = ArchiveRequest::builder().input(&a).input(&ghost).build();
        match result {
            Err(Error::MissingInput(path)) => assert_eq!(path, ghost),
            other => panic!("expected MissingInput, got {:?}", other),
        }
    }

    #[test]
    fn test_build_rejects_out_of_range_level() {
        let (_temp_dir, a, _) = fixture();
        let result = ArchiveRequest::builder().input(&a).level(12).build();
        assert!(matches!(result, Err(Error::InvalidLevel(12))));
    }

    #[test]
    fn test_encryption_requires_password() {
        let (_temp_dir, a, _) = fixture();

        let result = ArchiveRequest::builder().input(&a).encrypt(true).build();
        assert!(matches!(result, Err(Error::EmptyPassword)));

        let result = ArchiveRequest::builder()
            .input(&a)
            .encrypt(true)
            .password(Some(""))
            .build();
        assert!(matches!(result, Err(Error::EmptyPassword)));
    }

    #[test]
    fn test_password_implies_encryption() {
        let (_temp_dir, a, _) = fixture();
        let request = ArchiveRequest::builder()
            .input(&a)
            .password(Some("secret"))
            .encrypt_headers(false)
            .build()
            .unwrap();

        match request.encryption() {
            Encryption::Aes256 {
                password,
                encrypt_headers,
            } => {
                assert_eq!(password.expose(), "secret");
                assert!(!encrypt_headers);
            }
            Encryption::None => panic!("expected encryption to be enabled"),
        }
    }

    #[test]
    fn test_explicit_output_is_normalized() {
        let (temp_dir, a, _) = fixture();
        let request = ArchiveRequest::builder()
            .input(&a)
            .output(Some(temp_dir.path().join("bundle")))
            .build()
            .unwrap();
        assert_eq!(request.output(), temp_dir.path().join("bundle.7z"));

        let result = ArchiveRequest::builder()
            .input(&a)
            .output(Some(""))
            .build();
        assert!(matches!(result, Err(Error::EmptyOutputPath)));
    }

    #[test]
    fn test_derived_output_cannot_replace_archive_input() {
        let (temp_dir, _, _) = fixture();
        let photos = temp_dir.path().join("photos.7z");
        fs::write(&photos, "existing archive").unwrap();

        let result = ArchiveRequest::builder()
            .input(&photos)
            .overwrite(true)
            .build();
        match result {
            Err(Error::OutputIsInput(path)) => assert_eq!(path, photos),
            other => panic!("expected OutputIsInput, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_output_cannot_name_an_input() {
        let (temp_dir, a, b) = fixture();

        let result = ArchiveRequest::builder()
            .inputs([&a, &b])
            .output(Some(temp_dir.path().join(".").join("b.txt")))
            .overwrite(true)
            .build();
        assert!(matches!(result, Err(Error::OutputIsInput(_))));
        assert_eq!(fs::read_to_string(&b).unwrap(), "beta");
    }
}
