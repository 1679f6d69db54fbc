//! Interactive text menu for building an archive step by step

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use std::path::{Path, PathBuf};
use szpack_core::progress::ProgressReporter;
use szpack_core::utils::format_size;
use szpack_core::{create_archive, CompressionLevel, Error, RunReport, Session, SevenZip};
use tracing::{debug, info};

/// Source of user answers for the menu
pub trait Prompter {
    /// Pick one of `items`, returning its index
    fn choose(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize>;
    /// Free text; an empty answer is allowed
    fn input(&mut self, prompt: &str, initial: Option<&str>) -> Result<String>;
    /// Hidden input, entered twice
    fn password(&mut self, prompt: &str) -> Result<String>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
    fn message(&mut self, text: &str);
}

/// Terminal prompter backed by dialoguer
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn choose(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn input(&mut self, prompt: &str, initial: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(initial) = initial {
            input = input.with_initial_text(initial);
        }
        Ok(input.interact_text()?)
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_confirmation("Repeat password", "Passwords do not match")
            .allow_empty_password(true)
            .interact()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn message(&mut self, text: &str) {
        println!("{}", text);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AddFiles,
    RemoveFile,
    ListFiles,
    ClearFiles,
    SetOutput,
    SetLevel,
    ToggleEncryption,
    Create,
    Quit,
}

impl Action {
    const ALL: [Action; 9] = [
        Action::AddFiles,
        Action::RemoveFile,
        Action::ListFiles,
        Action::ClearFiles,
        Action::SetOutput,
        Action::SetLevel,
        Action::ToggleEncryption,
        Action::Create,
        Action::Quit,
    ];

    fn label(self, session: &Session) -> String {
        match self {
            Action::AddFiles => "Add files".to_string(),
            Action::RemoveFile => "Remove a file".to_string(),
            Action::ListFiles => "List files".to_string(),
            Action::ClearFiles => "Clear all files".to_string(),
            Action::SetOutput => "Set output path".to_string(),
            Action::SetLevel => format!("Set compression level (now {})", session.level()),
            Action::ToggleEncryption if session.is_encrypted() => "Disable encryption".to_string(),
            Action::ToggleEncryption => "Enable encryption".to_string(),
            Action::Create => "Create archive".to_string(),
            Action::Quit => "Quit".to_string(),
        }
    }
}

/// Menu state: the session being edited and how to find 7-Zip
pub struct Menu<'a, P: Prompter> {
    session: Session,
    prompter: &'a mut P,
    executable: Option<PathBuf>,
    configured: Option<PathBuf>,
    progress: bool,
}

impl<'a, P: Prompter> Menu<'a, P> {
    pub fn new(session: Session, prompter: &'a mut P) -> Self {
        Self {
            session,
            prompter,
            executable: None,
            configured: None,
            progress: false,
        }
    }

    pub fn executable(mut self, explicit: Option<PathBuf>, configured: Option<PathBuf>) -> Self {
        self.executable = explicit;
        self.configured = configured;
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Loop until an archive is created (`Some`) or the user quits (`None`)
    pub fn run(mut self) -> Result<Option<RunReport>> {
        let mut default = 0;
        loop {
            self.show_status();

            let labels: Vec<String> = Action::ALL
                .iter()
                .map(|a| a.label(&self.session))
                .collect();
            let index = self.prompter.choose("What would you like to do?", &labels, default)?;
            let action = Action::ALL.get(index).copied().unwrap_or(Action::Quit);
            debug!("Menu action: {:?}", action);
            default = index;

            match action {
                Action::AddFiles => self.add_files()?,
                Action::RemoveFile => self.remove_file()?,
                Action::ListFiles => self.list_files(),
                Action::ClearFiles => self.clear_files()?,
                Action::SetOutput => self.set_output()?,
                Action::SetLevel => self.set_level()?,
                Action::ToggleEncryption => self.toggle_encryption()?,
                Action::Create => {
                    if let Some(report) = self.create()? {
                        return Ok(Some(report));
                    }
                }
                Action::Quit => return Ok(None),
            }
        }
    }

    fn show_status(&mut self) {
        let output = self
            .session
            .effective_output()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(derived from first file)".to_string());
        let encryption = if self.session.is_encrypted() {
            if self.session.encrypt_headers() {
                "AES-256, file names hidden"
            } else {
                "AES-256"
            }
        } else {
            "off"
        };
        self.prompter.message(&format!(
            "\nFiles: {}  Output: {}  Level: {}  Encryption: {}",
            self.session.selection().len(),
            output,
            self.session.level(),
            encryption
        ));
    }

    fn add_files(&mut self) -> Result<()> {
        loop {
            let answer = self
                .prompter
                .input("File or directory to add (empty to finish)", None)?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(());
            }

            let path = Path::new(answer);
            if !path.exists() {
                self.prompter.message(&format!("Not found: {}", answer));
            } else if !self.session.add_file(path) {
                self.prompter.message(&format!("Already selected: {}", answer));
            }
        }
    }

    fn remove_file(&mut self) -> Result<()> {
        if self.session.selection().is_empty() {
            self.prompter.message("No files selected.");
            return Ok(());
        }

        let mut items: Vec<String> = self
            .session
            .selection()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        items.push("Cancel".to_string());
        let cancel = items.len() - 1;

        let index = self.prompter.choose("Remove which file?", &items, cancel)?;
        if index < cancel {
            if let Some(removed) = self.session.remove_file(index) {
                self.prompter
                    .message(&format!("Removed {}", removed.display()));
            }
        }
        Ok(())
    }

    fn list_files(&mut self) {
        if self.session.selection().is_empty() {
            self.prompter.message("No files selected.");
            return;
        }
        let listing: Vec<String> = self
            .session
            .selection()
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:>3}. {}", i + 1, p.display()))
            .collect();
        self.prompter.message(&listing.join("\n"));
    }

    fn clear_files(&mut self) -> Result<()> {
        if !self.session.selection().is_empty()
            && self.prompter.confirm("Remove all selected files?", false)?
        {
            self.session.clear_files();
        }
        Ok(())
    }

    fn set_output(&mut self) -> Result<()> {
        let current = self
            .session
            .effective_output()
            .map(|p| p.display().to_string());
        let answer = self.prompter.input(
            "Output archive (empty to derive from first file)",
            current.as_deref(),
        )?;
        let answer = answer.trim();
        self.session
            .set_output((!answer.is_empty()).then(|| PathBuf::from(answer)));
        Ok(())
    }

    fn set_level(&mut self) -> Result<()> {
        let levels: Vec<String> = (CompressionLevel::MIN..=CompressionLevel::MAX)
            .filter_map(|level| CompressionLevel::new(level).ok())
            .map(|level| level.to_string())
            .collect();
        let current = self.session.level().get() as usize;
        let index = self.prompter.choose("Compression level", &levels, current)?;
        self.session.set_level(index as u32)?;
        Ok(())
    }

    fn toggle_encryption(&mut self) -> Result<()> {
        if self.session.is_encrypted() {
            self.session.disable_encryption();
            self.prompter.message("Encryption disabled.");
            return Ok(());
        }

        let password = self.prompter.password("Archive password")?;
        if let Err(e) = self.session.enable_encryption(password) {
            self.prompter.message(&e.to_string());
            return Ok(());
        }
        let hide_names = self
            .prompter
            .confirm("Encrypt file names too?", self.session.encrypt_headers())?;
        self.session.set_encrypt_headers(hide_names);
        Ok(())
    }

    fn create(&mut self) -> Result<Option<RunReport>> {
        let mut request = match self.session.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.prompter.message(&e.to_string());
                return Ok(None);
            }
        };

        if request.output().exists() && !request.overwrite() {
            let replace = self.prompter.confirm(
                &format!("{} already exists. Replace it?", request.output().display()),
                false,
            )?;
            if !replace {
                return Ok(None);
            }
            // Applies to this run only; the next Create asks again.
            request = match self.session.request_builder().overwrite(true).build() {
                Ok(request) => request,
                Err(e) => {
                    self.prompter.message(&e.to_string());
                    return Ok(None);
                }
            };
        }

        let seven_zip =
            match SevenZip::locate(self.executable.as_deref(), self.configured.as_deref()) {
                Ok(seven_zip) => seven_zip,
                Err(e) => {
                    self.prompter.message(&e.to_string());
                    return Ok(None);
                }
            };

        let mut progress = ProgressReporter::new(self.progress);
        match create_archive(&seven_zip, &request, &mut progress) {
            Ok(report) => {
                info!("Archive created from menu: {:?}", report.archive);
                self.prompter.message(&format!(
                    "Created {} ({})",
                    report.archive.display(),
                    format_size(report.archive_bytes)
                ));
                Ok(Some(report))
            }
            Err(
                e @ (Error::SevenZipFailed { .. } | Error::ExecutableNotFound(_) | Error::Io(_)),
            ) => {
                self.prompter.message(&e.to_string());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
