//! szpack-cli - Command-line interface for szpack
//!
//! Two ways to build an archive:
//! - `szpack create` takes everything from flags and runs once
//! - `szpack menu` walks through a text menu to collect the same choices

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use szpack_core::config::Config;
use szpack_core::progress::ProgressReporter;
use szpack_core::utils::format_size;
use szpack_core::{create_archive, ArchiveRequest, RunReport, Session, SevenZip, SevenZipCommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod menu;

/// szpack - create 7z archives with the 7-Zip executable
#[derive(Parser)]
#[command(name = "szpack")]
#[command(author, version, about = "Create 7z archives, optionally AES-256 encrypted, with 7-Zip", long_about = None)]
struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show a spinner while 7-Zip runs
    #[arg(long, global = true)]
    progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an archive from files and directories
    Create {
        /// Files or directories to archive (duplicates are ignored)
        inputs: Vec<PathBuf>,

        /// Output archive (default: first input's name with .7z)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compression level from 0 (store) to 9 (ultra)
        #[arg(short, long)]
        level: Option<u32>,

        /// Encrypt with AES-256; prompts for a password if none is given
        #[arg(short, long)]
        encrypt: bool,

        /// Archive password (implies --encrypt)
        #[arg(short, long, env = "SZPACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Leave file names readable in encrypted archives
        #[arg(long)]
        no_header_encryption: bool,

        /// Path to the 7-Zip executable
        #[arg(long = "seven-zip", value_name = "PATH")]
        seven_zip: Option<PathBuf>,

        /// Replace the output archive if it exists
        #[arg(long)]
        overwrite: bool,

        /// Print the 7-Zip command without running it
        #[arg(long)]
        dry_run: bool,

        /// Print the result summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an archive through an interactive menu
    Menu {
        /// Path to the 7-Zip executable
        #[arg(long = "seven-zip", value_name = "PATH")]
        seven_zip: Option<PathBuf>,

        /// Print the result summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long, conflicts_with_all = ["edit", "path"])]
        show: bool,

        /// Edit configuration file
        #[arg(long, conflicts_with_all = ["show", "path"])]
        edit: bool,

        /// Show configuration file path
        #[arg(long, conflicts_with_all = ["show", "edit"])]
        path: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let result = run();

    match result {
        Ok(_) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);

            let exit_code = map_error_to_exit_code(&e);
            process::exit(exit_code);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);
    let progress = cli.progress && !cli.quiet;

    match cli.command {
        Commands::Create {
            inputs,
            output,
            level,
            encrypt,
            password,
            no_header_encryption,
            seven_zip,
            overwrite,
            dry_run,
            json,
        } => {
            let config = Config::load()?;

            let password = match password {
                None if encrypt && std::io::stdin().is_terminal() => Some(prompt_password()?),
                other => other,
            };

            let request = ArchiveRequest::builder()
                .inputs(&inputs)
                .output(output)
                .level(level.unwrap_or_else(|| config.compression.default_level.into()))
                .encrypt(encrypt)
                .password(password)
                .encrypt_headers(config.encryption.encrypt_headers && !no_header_encryption)
                .overwrite(overwrite || config.output.overwrite)
                .build()?;

            let seven_zip =
                SevenZip::locate(seven_zip.as_deref(), config.executable.path.as_deref())?;

            if dry_run {
                if request.output().exists() && !request.overwrite() {
                    return Err(
                        szpack_core::Error::OutputExists(request.output().to_path_buf()).into(),
                    );
                }
                println!("{}", SevenZipCommand::new(seven_zip.path(), &request));
                return Ok(());
            }

            let report = create_archive(&seven_zip, &request, &mut ProgressReporter::new(progress))?;
            print_report(&report, json, cli.quiet)?;
        }

        Commands::Menu { seven_zip, json } => {
            let config = Config::load()?;
            let mut prompter = menu::TerminalPrompter::new();

            let report = menu::Menu::new(Session::new(&config), &mut prompter)
                .executable(seven_zip, config.executable.path.clone())
                .progress(progress)
                .run()?;

            match report {
                Some(report) => print_report(&report, json, cli.quiet)?,
                None => info!("Leaving without creating an archive"),
            }
        }

        Commands::Config { show, edit, path } => {
            if show {
                match Config::load() {
                    Ok(config) => {
                        let toml_str = toml::to_string_pretty(&config)?;
                        println!("{}", toml_str);
                    }
                    Err(e) => {
                        error!("Failed to load configuration: {}", e);
                        return Err(e.into());
                    }
                }
            } else if edit {
                let config_path = Config::config_path()
                    .map_err(|e| anyhow::anyhow!("Failed to get config path: {}", e))?;

                if !config_path.exists() {
                    info!("Creating default configuration file...");
                    Config::load()
                        .map_err(|e| anyhow::anyhow!("Failed to write default config: {}", e))?;
                }

                let editor = std::env::var("EDITOR").unwrap_or_else(|_| {
                    if cfg!(windows) {
                        "notepad".to_string()
                    } else {
                        "nano".to_string()
                    }
                });

                info!("Opening configuration file in {}", editor);
                std::process::Command::new(&editor)
                    .arg(&config_path)
                    .status()
                    .map_err(|e| anyhow::anyhow!("Failed to open editor: {}", e))?;
            } else if path {
                let config_path = Config::config_path()
                    .map_err(|e| anyhow::anyhow!("Failed to get config path: {}", e))?;
                println!("{}", config_path.display());
            } else {
                eprintln!("Please specify --show, --edit, or --path");
            }
        }
    }

    Ok(())
}

fn prompt_password() -> Result<String> {
    Ok(dialoguer::Password::new()
        .with_prompt("Archive password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .allow_empty_password(true)
        .interact()?)
}

fn print_report(report: &RunReport, json: bool, quiet: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!("Archive:    {}", report.archive.display());
    println!("Inputs:     {} ({})", report.inputs, format_size(report.input_bytes));
    println!("Size:       {}", format_size(report.archive_bytes));
    println!(
        "Encryption: {}",
        if report.encrypted { "AES-256" } else { "none" }
    );
    println!("Level:      {}", report.level);
    println!("Elapsed:    {:.2}s", report.elapsed_ms as f64 / 1000.0);
    Ok(())
}

/// Map errors to exit codes:
/// - 0: Success
/// - 1: General error
/// - 2: IO error or missing file/executable
/// - 3: Invalid arguments
/// - 4: 7-Zip reported failure
fn map_error_to_exit_code(err: &anyhow::Error) -> i32 {
    if let Some(core_err) = err.downcast_ref::<szpack_core::Error>() {
        match core_err {
            szpack_core::Error::Io(_) => 2,
            szpack_core::Error::ExecutableNotFound(_) => 2,
            szpack_core::Error::MissingInput(_) => 2,
            szpack_core::Error::NoInputs => 3,
            szpack_core::Error::EmptyOutputPath => 3,
            szpack_core::Error::InvalidLevel(_) => 3,
            szpack_core::Error::EmptyPassword => 3,
            szpack_core::Error::OutputExists(_) => 3,
            szpack_core::Error::OutputIsInput(_) => 3,
            szpack_core::Error::SevenZipFailed { .. } => 4,
            szpack_core::Error::Config(_) => 1,
        }
    } else if err.is::<std::io::Error>() {
        2
    } else {
        1
    }
}
