//! Write probes.
//!
//! Every probe performs a real write and reports the outcome as a `bool`.
//! Ordinary I/O failures are logged and never returned as errors.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Return true if `path` can be opened for appending.
///
/// Like any append-open, this creates the file when it does not exist yet
/// but its directory does.
#[must_use]
pub fn can_open(path: &Path) -> bool {
    match OpenOptions::new().append(true).create(true).open(path) {
        Ok(_) => true,
        Err(err) => {
            info!(path = %path.display(), error = %err, "Unable to open");
            false
        }
    }
}

/// Return true if every path can be opened. Stops at the first failure.
#[must_use]
pub fn can_open_all<I, P>(paths: I) -> bool
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().all(|p| can_open(p.as_ref()))
}

/// Return true if every one of `files`, taken relative to `prefix`, can be opened.
#[must_use]
pub fn can_open_all_files_in_prefix<I, P>(prefix: &Path, files: I) -> bool
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    can_open_all(files.into_iter().map(|f| prefix.join(f)))
}

/// Return true if every regular file currently under `prefix` can be opened.
///
/// An unreadable or missing prefix counts as not writable.
#[must_use]
pub fn can_open_prefix(prefix: &Path) -> bool {
    match pkgkit_util::fs::files_in_prefix(prefix) {
        Ok(files) => can_open_all_files_in_prefix(prefix, files),
        Err(err) => {
            info!(prefix = %prefix.display(), error = %err, "Unable to list prefix");
            false
        }
    }
}

/// Probe a directory by creating, writing and discarding a temporary file in it.
///
/// The file is unnamed (or unlinked right after creation), so nothing is
/// left behind even if the process dies mid-probe. `dir` must be an
/// existing directory; anything else is reported as not writable.
#[must_use]
pub fn try_write(dir: &Path) -> bool {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "try_write called on a non-directory");
        return false;
    }

    let probe = tempfile::tempfile_in(dir)
        .and_then(|mut file| file.write_all(b"This is a test file.\n"));

    match probe {
        Ok(()) => true,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "Write probe failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_can_open_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"keep").unwrap();

        assert!(can_open(&path));
        // appending open must not truncate
        assert_eq!(fs::read(&path).unwrap(), b"keep");
    }

    #[test]
    fn test_can_open_missing_parent() {
        let dir = tempdir().unwrap();
        assert!(!can_open(&dir.path().join("no").join("such").join("file")));
    }

    #[test]
    fn test_can_open_directory_is_false() {
        let dir = tempdir().unwrap();
        assert!(!can_open(dir.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_can_open_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("ro.txt");
        fs::write(&path, b"x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        // root ignores permission bits
        let writable = fs::OpenOptions::new().append(true).open(&path).is_ok();
        assert_eq!(can_open(&path), writable);
    }

    #[test]
    fn test_can_open_all() {
        let dir = tempdir().unwrap();
        let good = [dir.path().join("a"), dir.path().join("b")];
        assert!(can_open_all(&good));
        assert!(can_open_all(Vec::<&Path>::new()));

        let bad = [dir.path().join("a"), dir.path().join("x").join("y")];
        assert!(!can_open_all(&bad));
    }

    #[test]
    fn test_can_open_all_files_in_prefix() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("bin")).unwrap();

        assert!(can_open_all_files_in_prefix(dir.path(), ["bin/python", "README"]));
        assert!(!can_open_all_files_in_prefix(dir.path(), ["lib/missing/x"]));
    }

    #[test]
    fn test_can_open_prefix() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib").join("libz.so"), b"").unwrap();

        assert!(can_open_prefix(dir.path()));
        assert!(!can_open_prefix(&dir.path().join("absent")));
    }

    #[test]
    fn test_try_write() {
        let dir = tempdir().unwrap();
        assert!(try_write(dir.path()));

        // the probe file is gone afterwards
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_try_write_keeps_existing_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep"), b"x").unwrap();

        assert!(try_write(dir.path()));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("keep")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_can_open_prefix_follows_symlinked_files() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let target = outside.path().join("libz.so.1");
        fs::write(&target, b"").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("libz.so")).unwrap();

        assert!(can_open_prefix(dir.path()));
        assert_eq!(fs::read(&target).unwrap(), b"");
    }

    #[test]
    fn test_try_write_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"").unwrap();

        assert!(!try_write(&file));
        assert!(!try_write(&dir.path().join("missing")));
    }
}
