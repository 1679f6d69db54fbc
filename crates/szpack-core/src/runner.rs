//! Running 7-Zip and interpreting its exit status

use crate::command::SevenZipCommand;
use crate::locate::SevenZip;
use crate::output::prepare_output;
use crate::progress::ProgressReporter;
use crate::request::ArchiveRequest;
use crate::utils::{calculate_path_size, calculate_total_size};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lines of 7-Zip diagnostics kept in a failure message
const DIAGNOSTIC_LINES: usize = 6;

/// Meaning of a 7-Zip process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Success,
    /// Code 1: non-fatal warnings, e.g. some files were locked
    Warning,
    /// Code 2
    Fatal,
    /// Code 7
    CommandLine,
    /// Code 8
    OutOfMemory,
    /// Code 255
    UserStopped,
    Other(i32),
    /// Terminated without an exit code
    Signal,
}

impl ExitKind {
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ExitKind::Success,
            Some(1) => ExitKind::Warning,
            Some(2) => ExitKind::Fatal,
            Some(7) => ExitKind::CommandLine,
            Some(8) => ExitKind::OutOfMemory,
            Some(255) => ExitKind::UserStopped,
            Some(other) => ExitKind::Other(other),
            None => ExitKind::Signal,
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        Self::from_code(status.code())
    }

    pub fn is_success(self) -> bool {
        self == ExitKind::Success
    }

    pub fn code(self) -> Option<i32> {
        match self {
            ExitKind::Success => Some(0),
            ExitKind::Warning => Some(1),
            ExitKind::Fatal => Some(2),
            ExitKind::CommandLine => Some(7),
            ExitKind::OutOfMemory => Some(8),
            ExitKind::UserStopped => Some(255),
            ExitKind::Other(code) => Some(code),
            ExitKind::Signal => None,
        }
    }

    fn meaning(self) -> &'static str {
        match self {
            ExitKind::Success => "no error",
            ExitKind::Warning => "warning, some files were not archived",
            ExitKind::Fatal => "fatal error",
            ExitKind::CommandLine => "command line error",
            ExitKind::OutOfMemory => "not enough memory",
            ExitKind::UserStopped => "stopped by user",
            ExitKind::Other(_) => "unknown error",
            ExitKind::Signal => "terminated by signal",
        }
    }
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "exit code {}: {}", code, self.meaning()),
            None => f.write_str(self.meaning()),
        }
    }
}

/// Summary of a finished archive run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub archive: PathBuf,
    pub inputs: usize,
    pub input_bytes: u64,
    pub archive_bytes: u64,
    pub encrypted: bool,
    pub level: u8,
    pub elapsed_ms: u64,
}

/// Create the archive described by `request` with the given 7-Zip binary.
///
/// Blocks until the child exits. Exit code 0 is success; anything else is
/// returned as [`Error::SevenZipFailed`] with the tail of 7-Zip's output.
pub fn create_archive(
    seven_zip: &SevenZip,
    request: &ArchiveRequest,
    progress: &mut ProgressReporter,
) -> Result<RunReport> {
    prepare_output(request.output(), request.overwrite())?;

    let command = SevenZipCommand::new(seven_zip.path(), request);
    info!(
        "Archiving {} input(s) into {:?} at level {}",
        request.inputs().len(),
        request.output(),
        request.level()
    );
    debug!("Running: {}", command);

    let started = Instant::now();
    progress.start(&format!("Compressing into {}", request.output().display()));

    let output = command
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            progress.clear();
            return Err(spawn_error(e, seven_zip));
        }
    };

    let status = ExitKind::from_status(output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        debug!("7z: {}", line);
    }

    if !status.is_success() {
        progress.clear();
        warn!("7-Zip exited with {}", status);
        let message = diagnostics(&stderr)
            .or_else(|| diagnostics(&stdout))
            .unwrap_or_else(|| "no output from 7-Zip".to_string());
        return Err(Error::SevenZipFailed { status, message });
    }

    progress.finish("Archive created");

    let report = RunReport {
        archive: request.output().to_path_buf(),
        inputs: request.inputs().len(),
        input_bytes: calculate_total_size(request.inputs()),
        archive_bytes: calculate_path_size(request.output()),
        encrypted: request.encryption().is_enabled(),
        level: request.level().get(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!("Created {:?} in {} ms", report.archive, report.elapsed_ms);
    Ok(report)
}

fn spawn_error(err: io::Error, seven_zip: &SevenZip) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => Error::ExecutableNotFound(
            format!("cannot execute {}: {}", seven_zip.path().display(), err),
        ),
        _ => Error::Io(err),
    }
}

/// Last few non-empty lines of a 7-Zip stream, joined for display
fn diagnostics(stream: &str) -> Option<String> {
    let lines: Vec<&str> = stream
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }
    let start = lines.len().saturating_sub(DIAGNOSTIC_LINES);
    Some(lines[start..].join("; "))
}
