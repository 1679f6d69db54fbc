//! Resolving the 7-Zip executable

use crate::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that points at a specific 7-Zip binary
pub const EXECUTABLE_ENV: &str = "SZPACK_7Z";

/// Names tried on `PATH`, in order
pub const CANDIDATE_NAMES: &[&str] = &["7z", "7zz", "7za"];

/// Where a resolved executable came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Explicit,
    Environment,
    Config,
    SearchPath,
}

/// A resolved 7-Zip binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SevenZip {
    path: PathBuf,
    source: Source,
}

impl SevenZip {
    /// Resolve the executable: explicit path, then `SZPACK_7Z`, then the
    /// configured path, then the first candidate name found on `PATH`.
    pub fn locate(explicit: Option<&Path>, configured: Option<&Path>) -> Result<Self> {
        let from_env = env::var_os(EXECUTABLE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::locate_with(explicit, from_env.as_deref(), configured, |name| {
            which::which(name).ok()
        })
    }

    fn locate_with<F>(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        configured: Option<&Path>,
        search: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let pinned = [
            (explicit, Source::Explicit),
            (from_env, Source::Environment),
            (configured, Source::Config),
        ];

        if let Some((path, source)) = pinned
            .into_iter()
            .find_map(|(path, source)| path.map(|p| (p, source)))
        {
            if !path.is_file() {
                return Err(Error::ExecutableNotFound(format!(
                    "{} (from {})",
                    path.display(),
                    source.describe()
                )));
            }
            debug!("Using 7-Zip from {}: {:?}", source.describe(), path);
            return Ok(Self {
                path: path.to_path_buf(),
                source,
            });
        }

        CANDIDATE_NAMES
            .iter()
            .find_map(|name| search(*name))
            .map(|path| {
                debug!("Found 7-Zip on PATH: {:?}", path);
                Self {
                    path,
                    source: Source::SearchPath,
                }
            })
            .ok_or_else(|| {
                Error::ExecutableNotFound(format!(
                    "none of {} found on PATH; install 7-Zip or set {}",
                    CANDIDATE_NAMES.join(", "),
                    EXECUTABLE_ENV
                ))
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

impl Source {
    fn describe(self) -> &'static str {
        match self {
            Source::Explicit => "command line",
            Source::Environment => EXECUTABLE_ENV,
            Source::Config => "config file",
            Source::SearchPath => "PATH",
        }
    }
}
