//! Error types for szpack-core

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for the szpack library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The 7-Zip executable could not be resolved
    #[error("7-Zip executable not found: {0}")]
    ExecutableNotFound(String),

    /// An input path does not exist
    #[error("Input not found: {0}")]
    MissingInput(PathBuf),

    /// No input paths were selected
    #[error("No input files selected")]
    NoInputs,

    /// Output path is empty
    #[error("Output path is empty")]
    EmptyOutputPath,

    /// Compression level outside 0-9
    #[error("Invalid compression level {0}: expected a value between 0 and 9")]
    InvalidLevel(u32),

    /// Encryption was requested without a password
    #[error("Encryption is enabled but the password is empty")]
    EmptyPassword,

    /// Output archive already exists
    #[error("Output already exists: {0} (pass --overwrite to replace it)")]
    OutputExists(PathBuf),

    /// Output path names one of the inputs
    #[error("Output {0} is also an input; choose a different output path")]
    OutputIsInput(PathBuf),

    /// The external 7-Zip process reported failure
    #[error("7-Zip failed ({status}): {message}")]
    SevenZipFailed {
        status: crate::runner::ExitKind,
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
