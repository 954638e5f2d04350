//! `pkgkit check-write` command implementation.

use miette::{miette, IntoDiagnostic, Result};
use pkgkit_core::writable::{
    can_open_all, can_open_all_files_in_prefix, can_open_prefix, try_write,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What to probe, resolved against the working directory.
#[derive(Debug, PartialEq, Eq)]
pub enum Probe {
    /// Write and discard a temporary file in a directory.
    Dir(PathBuf),
    /// Every file currently under a prefix.
    Prefix(PathBuf),
    /// The given files, relative to a prefix.
    FilesInPrefix { prefix: PathBuf, files: Vec<PathBuf> },
    /// The given files.
    Files(Vec<PathBuf>),
}

impl Probe {
    pub fn from_args(
        cwd: &Path,
        prefix: Option<PathBuf>,
        dir: Option<PathBuf>,
        paths: Vec<PathBuf>,
    ) -> Result<Self> {
        match (dir, prefix) {
            (Some(dir), _) => Ok(Self::Dir(cwd.join(dir))),
            (None, Some(prefix)) if paths.is_empty() => Ok(Self::Prefix(cwd.join(prefix))),
            (None, Some(prefix)) => Ok(Self::FilesInPrefix {
                prefix: cwd.join(prefix),
                files: paths,
            }),
            (None, None) if paths.is_empty() => {
                Err(miette!("nothing to check: pass PATHS, --prefix or --dir"))
            }
            (None, None) => Ok(Self::Files(paths.iter().map(|p| cwd.join(p)).collect())),
        }
    }

    fn writable(&self) -> bool {
        match self {
            Self::Dir(dir) => try_write(dir),
            Self::Prefix(prefix) => can_open_prefix(prefix),
            Self::FilesInPrefix { prefix, files } => can_open_all_files_in_prefix(prefix, files),
            Self::Files(files) => can_open_all(files),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Dir(dir) => dir.display().to_string(),
            Self::Prefix(prefix) | Self::FilesInPrefix { prefix, .. } => {
                prefix.display().to_string()
            }
            Self::Files(files) => files
                .iter()
                .map(|f| f.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Serialize)]
struct CheckWriteResult {
    writable: bool,
    target: String,
}

/// Run the probe. Exits with status 1 when the target is not writable.
pub fn run(probe: &Probe, json: bool) -> Result<()> {
    let writable = probe.writable();

    if json {
        let result = CheckWriteResult {
            writable,
            target: probe.describe(),
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else if writable {
        println!("writable: {}", probe.describe());
    } else {
        eprintln!("error: not writable: {}", probe.describe());
    }

    if !writable {
        std::process::exit(1);
    }
    Ok(())
}
