//! Mutable job state edited step by step by the interactive menu

use crate::config::Config;
use crate::output::{derive_output_path, normalize_output_path};
use crate::request::{ArchiveRequest, ArchiveRequestBuilder, CompressionLevel};
use crate::selection::FileSelection;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Everything the user has chosen so far. Nothing is validated until
/// [`Session::to_request`] is called.
#[derive(Clone)]
pub struct Session {
    selection: FileSelection,
    output: Option<PathBuf>,
    level: CompressionLevel,
    password: Option<String>,
    encrypt_headers: bool,
    overwrite: bool,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            selection: FileSelection::new(),
            output: None,
            level: config.compression.default_level,
            password: None,
            encrypt_headers: config.encryption.encrypt_headers,
            overwrite: config.output.overwrite,
        }
    }

    /// Set an explicit output path; `None` returns to the derived default.
    pub fn set_output(&mut self, output: Option<PathBuf>) {
        self.output = output.filter(|p| !p.as_os_str().is_empty());
    }

    /// The output that would be used right now, if it can be determined
    pub fn effective_output(&self) -> Option<PathBuf> {
        match &self.output {
            Some(output) => {
                Some(normalize_output_path(output).unwrap_or_else(|_| output.clone()))
            }
            None => self.selection.first().map(derive_output_path),
        }
    }

    pub fn has_explicit_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn set_level(&mut self, level: u32) -> Result<()> {
        self.level = CompressionLevel::new(level)?;
        Ok(())
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Turn encryption on with a password
    pub fn enable_encryption(&mut self, password: String) -> Result<()> {
        if password.is_empty() {
            return Err(Error::EmptyPassword);
        }
        self.password = Some(password);
        Ok(())
    }

    pub fn disable_encryption(&mut self) {
        self.password = None;
    }

    pub fn is_encrypted(&self) -> bool {
        self.password.is_some()
    }

    pub fn set_encrypt_headers(&mut self, encrypt_headers: bool) {
        self.encrypt_headers = encrypt_headers;
    }

    pub fn encrypt_headers(&self) -> bool {
        self.encrypt_headers
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.selection.add(path)
    }

    pub fn remove_file(&mut self, index: usize) -> Option<PathBuf> {
        self.selection.remove(index)
    }

    pub fn clear_files(&mut self) {
        self.selection.clear();
    }

    /// Validate the session into a request
    pub fn to_request(&self) -> Result<ArchiveRequest> {
        self.request_builder().build()
    }

    /// Builder preloaded with the session's choices, for one-off changes
    /// such as replacing an existing output without remembering that choice.
    pub fn request_builder(&self) -> ArchiveRequestBuilder {
        ArchiveRequest::builder()
            .selection(self.selection.clone())
            .output(self.output.clone())
            .level(self.level.get() as u32)
            .encrypt(self.password.is_some())
            .password(self.password.clone())
            .encrypt_headers(self.encrypt_headers)
            .overwrite(self.overwrite)
    }
}
