//! A stand-in for the 7-Zip binary
//!
//! The fake is a POSIX shell script. It writes every argument it receives,
//! one per line, to a log file, creates the archive path that follows `--`,
//! optionally prints a message on stderr and exits with a chosen code.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FakeSevenZip {
    program: PathBuf,
    log: PathBuf,
}

/// Builder for [`FakeSevenZip`]
pub struct FakeSevenZipBuilder {
    exit_code: i32,
    stdout: Option<String>,
    stderr: Option<String>,
    create_archive: bool,
}

impl FakeSevenZip {
    /// A fake that succeeds and creates the archive
    pub fn install(dir: &Path) -> Result<Self> {
        Self::builder().install(dir)
    }

    pub fn builder() -> FakeSevenZipBuilder {
        FakeSevenZipBuilder {
            exit_code: 0,
            stdout: None,
            stderr: None,
            create_archive: true,
        }
    }

    /// Path of the executable script
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the fake has been invoked at least once
    pub fn was_invoked(&self) -> bool {
        self.log.exists()
    }

    /// Arguments received by the most recent invocation
    pub fn recorded_args(&self) -> Result<Vec<String>> {
        let contents = fs::read_to_string(&self.log)
            .with_context(|| format!("fake 7z was never invoked ({})", self.log.display()))?;
        Ok(contents.lines().map(str::to_string).collect())
    }
}

impl FakeSevenZipBuilder {
    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.stdout = Some(text.to_string());
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.stderr = Some(text.to_string());
        self
    }

    pub fn create_archive(mut self, create: bool) -> Self {
        self.create_archive = create;
        self
    }

    /// Write the script into `dir` and make it executable
    pub fn install(self, dir: &Path) -> Result<FakeSevenZip> {
        fs::create_dir_all(dir)?;
        let program = dir.join("fake-7z");
        let log = dir.join("fake-7z.args");

        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&format!(": > {}\n", sh_quote(&log)));
        script.push_str("after_dashes=0\n");
        script.push_str("for arg in \"$@\"; do\n");
        script.push_str(&format!("  printf '%s\\n' \"$arg\" >> {}\n", sh_quote(&log)));
        if self.create_archive {
            script.push_str(
                "  if [ \"$after_dashes\" = 1 ]; then printf 'fake 7z archive' > \"$arg\"; after_dashes=2; fi\n",
            );
        }
        script.push_str("  if [ \"$arg\" = \"--\" ] && [ \"$after_dashes\" = 0 ]; then after_dashes=1; fi\n");
        script.push_str("done\n");
        if let Some(text) = &self.stdout {
            script.push_str(&format!("printf '%s\\n' {}\n", sh_quote_str(text)));
        }
        if let Some(text) = &self.stderr {
            script.push_str(&format!("printf '%s\\n' {} >&2\n", sh_quote_str(text)));
        }
        script.push_str(&format!("exit {}\n", self.exit_code));

        fs::write(&program, script)?;
        make_executable(&program)?;

        Ok(FakeSevenZip { program, log })
    }
}

fn sh_quote(path: &Path) -> String {
    sh_quote_str(&path.to_string_lossy())
}

fn sh_quote_str(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    anyhow::bail!("the fake 7z executable is only available on Unix")
}
