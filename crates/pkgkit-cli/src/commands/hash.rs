//! `pkgkit hash` command implementation.

use miette::{IntoDiagnostic, Result};
use pkgkit_core::Memoized;
use pkgkit_util::{hashsum_file, HashAlgorithm};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct HashResult {
    ok: bool,
    algorithm: HashAlgorithm,
    files: Vec<FileDigest>,
}

#[derive(Serialize)]
struct FileDigest {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Hash each file, printing `<digest>  <path>` lines (or one JSON object).
///
/// A path listed more than once is only read once. Exits with status 1 if
/// any file could not be hashed.
pub fn run(cwd: &Path, files: &[PathBuf], algorithm: HashAlgorithm, json: bool) -> Result<()> {
    // Failures are not cached so a retry within the same run re-reads the file.
    let digests = Memoized::new(|path: &PathBuf| {
        hashsum_file(path, algorithm).map_err(|e| e.to_string())
    })
    .cache_if(std::result::Result::is_ok);

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let resolved = cwd.join(file);
        let (digest, error) = match digests.call(resolved) {
            Ok(digest) => (Some(digest), None),
            Err(error) => (None, Some(error)),
        };
        results.push(FileDigest {
            path: file.display().to_string(),
            digest,
            error,
        });
    }

    let ok = results.iter().all(|r| r.error.is_none());

    if json {
        let result = HashResult {
            ok,
            algorithm,
            files: results,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        for r in &results {
            match (&r.digest, &r.error) {
                (Some(digest), _) => println!("{digest}  {}", r.path),
                (None, Some(error)) => eprintln!("error: {}: {error}", r.path),
                (None, None) => {}
            }
        }
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
