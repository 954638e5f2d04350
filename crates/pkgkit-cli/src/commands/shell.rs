//! `pkgkit shell` command implementation.

use miette::{IntoDiagnostic, Result};
use pkgkit_core::ShellDetector;

/// Print the parent shell's name, or its executable path with `path`.
///
/// With `json`, the full process record is printed instead.
pub fn run(marker: &str, path: bool, json: bool) -> Result<()> {
    let detector = ShellDetector::system();

    if json {
        let shell = detector.shell(marker).into_diagnostic()?;
        println!("{}", serde_json::to_string_pretty(&shell).into_diagnostic()?);
    } else if path {
        let exe = detector.shell_exe(marker).into_diagnostic()?;
        println!("{}", exe.display());
    } else {
        println!("{}", detector.shell_name(marker).into_diagnostic()?);
    }
    Ok(())
}
