use miette::{IntoDiagnostic, Result};
use pkgkit_util::fs::url_path;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct UrlResult {
    path: String,
    url: String,
}

pub fn run(cwd: &Path, path: &Path, json: bool) -> Result<()> {
    let url = url_path(&cwd.join(path)).into_diagnostic()?;

    if json {
        let result = UrlResult {
            path: path.display().to_string(),
            url,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        println!("{url}");
    }
    Ok(())
}
