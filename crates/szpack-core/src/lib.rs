//! szpack - build `.7z` archives by driving the external 7-Zip executable
//!
//! This library validates the user's choices (input files, output path,
//! compression level, password), turns them into a 7-Zip command line and
//! runs it. Compression and encryption are entirely 7-Zip's job.

pub mod command;
pub mod config;
pub mod error;
pub mod locate;
pub mod output;
pub mod progress;
pub mod request;
pub mod runner;
pub mod selection;
pub mod session;
pub mod utils;

pub use error::{Error, Result};

// Re-export commonly used types
pub use command::SevenZipCommand;
pub use locate::SevenZip;
pub use request::{ArchiveRequest, CompressionLevel, Encryption, Password};
pub use runner::{create_archive, ExitKind, RunReport};
pub use selection::FileSelection;
pub use session::Session;
