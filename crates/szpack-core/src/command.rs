//! 7-Zip command line construction

use crate::request::{ArchiveRequest, Encryption};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

const REDACTED_PASSWORD: &str = "-p***";

/// The argument vector for one `7z a` invocation
#[derive(Clone)]
pub struct SevenZipCommand {
    program: PathBuf,
    args: Vec<Arg>,
}

#[derive(Clone)]
enum Arg {
    Switch(String),
    Secret(String),
    Path(PathBuf),
}

impl Arg {
    fn to_os_string(&self) -> OsString {
        match self {
            Arg::Switch(s) | Arg::Secret(s) => OsString::from(s),
            Arg::Path(p) => p.as_os_str().to_os_string(),
        }
    }

    fn display(&self) -> String {
        match self {
            Arg::Switch(s) => s.clone(),
            Arg::Secret(_) => REDACTED_PASSWORD.to_string(),
            Arg::Path(p) => quote(&p.to_string_lossy()),
        }
    }
}

impl SevenZipCommand {
    /// Build `7z a -t7z -mx=L [-p<pw> [-mhe=on]] -y -- <output> <inputs..>`
    pub fn new<P: AsRef<Path>>(program: P, request: &ArchiveRequest) -> Self {
        let mut args = vec![
            Arg::Switch("a".to_string()),
            Arg::Switch("-t7z".to_string()),
            Arg::Switch(format!("-mx={}", request.level().get())),
        ];

        if let Encryption::Aes256 {
            password,
            encrypt_headers,
        } = request.encryption()
        {
            args.push(Arg::Secret(format!("-p{}", password.expose())));
            if *encrypt_headers {
                args.push(Arg::Switch("-mhe=on".to_string()));
            }
        }

        // Never block on an overwrite prompt; stdin is closed anyway.
        args.push(Arg::Switch("-y".to_string()));
        args.push(Arg::Switch("--".to_string()));
        args.push(Arg::Path(request.output().to_path_buf()));
        args.extend(request.inputs().iter().cloned().map(Arg::Path));

        Self {
            program: program.as_ref().to_path_buf(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments exactly as passed to the process, password included
    pub fn args(&self) -> Vec<OsString> {
        self.args.iter().map(Arg::to_os_string).collect()
    }

    /// A printable command line with the password replaced by `-p***`
    pub fn redacted(&self) -> String {
        let mut parts = vec![quote(&self.program.to_string_lossy())];
        parts.extend(self.args.iter().map(Arg::display));
        parts.join(" ")
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args());
        command
    }
}

impl fmt::Display for SevenZipCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for SevenZipCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SevenZipCommand")
            .field(&self.redacted())
            .finish()
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else {
        s.to_string()
    }
}
