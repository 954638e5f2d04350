//! `pkgkit translate` command implementation.

use miette::{IntoDiagnostic, Result};
use pkgkit_util::{translate_stream, Translation};
use serde::Serialize;
use std::io::{self, Read};

/// Path spelling to translate into.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Windows paths to `/c/...`
    Unix,
    /// `/c/...` paths to Windows
    Win,
    /// Windows paths to `/cygdrive/c/...`
    Cygwin,
    /// `/cygdrive/c/...` paths to Windows
    FromCygwin,
}

impl From<Target> for Translation {
    fn from(target: Target) -> Self {
        match target {
            Target::Unix => Self::WinToUnix,
            Target::Win => Self::UnixToWin,
            Target::Cygwin => Self::WinToCygwin,
            Target::FromCygwin => Self::CygwinToWin,
        }
    }
}

#[derive(Serialize)]
struct TranslateResult {
    input: String,
    output: String,
}

/// Translate `text`, or all of stdin when `text` is `None`, line by line.
pub fn run(target: Target, text: Option<&str>, cygdrive: &str, json: bool) -> Result<()> {
    let input = match text {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).into_diagnostic()?;
            buf
        }
    };

    let translation = Translation::from(target);
    let output = translate_stream(&input, |line| translation.translate(line, cygdrive));

    if json {
        let result = TranslateResult { input, output };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else if text.is_some() {
        println!("{output}");
    } else {
        print!("{output}");
    }
    Ok(())
}
