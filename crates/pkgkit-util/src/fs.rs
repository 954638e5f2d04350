use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Make `path` absolute against the current directory and normalize it lexically.
///
/// `.` components are dropped and `..` pops the previous component. The
/// filesystem is not consulted, so symlinks are left as-is.
///
/// # Errors
/// Returns an error if `path` is relative and the current directory is unavailable.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                // popping at the root is a no-op, matching `/..` == `/`
                out.pop();
            }
        }
    }
    out
}

/// Build a `file://` URL for an already-absolute path string.
///
/// Windows paths keep their drive letter with `|` in place of `:` and
/// forward slashes: `C:\a\b` becomes `file:///C|/a/b`.
#[must_use]
pub fn file_url(absolute: &str, windows: bool) -> String {
    if windows {
        format!(
            "file:///{}",
            absolute.replace(':', "|").replace('\\', "/")
        )
    } else {
        format!("file://{absolute}")
    }
}

/// Return the `file://` URL of `path` for the host platform.
///
/// # Errors
/// Returns an error if the path cannot be made absolute.
pub fn url_path(path: &Path) -> io::Result<String> {
    let absolute = absolute_path(path)?;
    Ok(file_url(&absolute.to_string_lossy(), cfg!(windows)))
}

/// List every regular file under `prefix`, relative to it, in sorted order.
///
/// Symlinks are listed when they resolve to a regular file; dangling links
/// and links to directories are skipped. Linked directories are not walked.
///
/// # Errors
/// Returns an error if `prefix` or any directory below it cannot be read.
pub fn files_in_prefix(prefix: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(prefix).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let file_type = entry.file_type();
        let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(prefix) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}
