#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use commands::translate::Target;
use miette::{IntoDiagnostic, Result};
use pkgkit_core::deprecation::deprecated;
use pkgkit_core::Config;
use pkgkit_util::HashAlgorithm;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pkgkit")]
#[command(author, version, about = "Filesystem, hashing and path helpers for package managers", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Read settings from a JSON config file
    #[arg(long, global = true, value_name = "FILE", env = "PKGKIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Print file checksums
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Hash algorithm: md5, sha1, sha256, sha512 or blake3
        #[arg(long, short)]
        algorithm: Option<String>,
    },

    /// Print MD5 checksums (deprecated, use `hash`)
    #[command(hide = true)]
    Md5 {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check that files or a directory can be written
    CheckWrite {
        /// Resolve PATHS against this prefix; with no PATHS, check every file under it
        #[arg(long, value_name = "DIR")]
        prefix: Option<PathBuf>,

        /// Probe a directory by writing a temporary file into it
        #[arg(long, value_name = "DIR", conflicts_with_all = ["prefix", "paths"])]
        dir: Option<PathBuf>,

        /// Files to open for appending
        paths: Vec<PathBuf>,
    },

    /// Translate paths between Windows, Unix and Cygwin spellings
    Translate {
        /// Target spelling
        #[arg(long, value_enum)]
        to: Target,

        /// Text to translate (reads stdin when omitted)
        text: Option<String>,
    },

    /// Format a byte count for humans
    HumanBytes {
        bytes: u64,
    },

    /// Print the file:// URL of a path
    Url {
        path: PathBuf,
    },

    /// Print the shell this process was started from
    Shell {
        /// Print the executable path instead of the name
        #[arg(long)]
        path: bool,

        /// Skip ancestors whose name contains this (default from config: conda)
        #[arg(long)]
        marker: Option<String>,
    },
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| Config::default_path().filter(|p| p.is_file()));

    match path {
        Some(path) => Config::load(&path).into_diagnostic(),
        None => Ok(Config::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = load_config(cli.config.as_deref())?
        .with_cwd(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Hash { files, algorithm }) => {
            let algorithm = match algorithm {
                Some(name) => name.parse::<HashAlgorithm>().into_diagnostic()?,
                None => config.hash_algorithm,
            };
            commands::hash::run(&cwd, &files, algorithm, cli.json)
        }
        Some(Commands::Md5 { files }) => {
            let md5 = deprecated("md5", |files: &[PathBuf]| {
                commands::hash::run(&cwd, files, HashAlgorithm::Md5, cli.json)
            });
            md5(files.as_slice())
        }
        Some(Commands::CheckWrite { prefix, dir, paths }) => {
            let probe = commands::check_write::Probe::from_args(&cwd, prefix, dir, paths)?;
            commands::check_write::run(&probe, cli.json)
        }
        Some(Commands::Translate { to, text }) => {
            commands::translate::run(to, text.as_deref(), &config.cygwin_prefix, cli.json)
        }
        Some(Commands::HumanBytes { bytes }) => commands::human_bytes::run(bytes, cli.json),
        Some(Commands::Url { path }) => commands::url::run(&cwd, &path, cli.json),
        Some(Commands::Shell { path, marker }) => {
            let marker = marker.unwrap_or_else(|| config.shell_marker.clone());
            commands::shell::run(&marker, path, cli.json)
        }
    }
}
