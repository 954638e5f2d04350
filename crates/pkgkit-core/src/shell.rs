//! Parent shell detection.
//!
//! The tool is usually launched through one or more wrapper processes
//! (launcher scripts, `conda run`, ...). The shell the user typed into is the
//! first ancestor whose name does not contain the wrapper marker.

use crate::error::{Error, Result};
use crate::memo::MethodCache;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::trace;

/// A process as seen by shell detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub exe: Option<PathBuf>,
}

/// Read access to the OS process tree.
pub trait ProcessTree {
    /// The calling process.
    fn current(&self) -> Option<ProcessInfo>;

    /// The parent of `pid`, if it exists and is visible.
    fn parent_of(&self, pid: u32) -> Option<ProcessInfo>;
}

/// [`ProcessTree`] backed by a `sysinfo` snapshot taken at construction.
pub struct SystemProcessTree {
    system: System,
}

impl SystemProcessTree {
    #[must_use]
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
        );
        Self { system }
    }

    fn info(&self, pid: Pid) -> Option<ProcessInfo> {
        let process = self.system.process(pid)?;
        Some(ProcessInfo {
            pid: pid.as_u32(),
            name: process.name().to_string_lossy().into_owned(),
            exe: process.exe().map(Path::to_path_buf),
        })
    }
}

impl Default for SystemProcessTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTree for SystemProcessTree {
    fn current(&self) -> Option<ProcessInfo> {
        let pid = sysinfo::get_current_pid().ok()?;
        self.info(pid)
    }

    fn parent_of(&self, pid: u32) -> Option<ProcessInfo> {
        let parent = self.system.process(Pid::from_u32(pid))?.parent()?;
        self.info(parent)
    }
}

/// Walk up from the current process past every ancestor whose name contains
/// `marker` and return the first one that does not.
///
/// An empty marker matches nothing, so the direct parent is returned. A
/// parent chain that loops back on itself (pid reuse) ends the walk with
/// [`Error::NoParentProcess`].
pub fn find_parent_shell<T>(tree: &T, marker: &str) -> Result<ProcessInfo>
where
    T: ProcessTree + ?Sized,
{
    let mut process = tree.current().ok_or(Error::ProcessNotFound {
        pid: std::process::id(),
    })?;
    let mut seen = HashSet::from([process.pid]);

    loop {
        let parent = tree
            .parent_of(process.pid)
            .ok_or(Error::NoParentProcess { pid: process.pid })?;
        if !seen.insert(parent.pid) {
            return Err(Error::NoParentProcess { pid: process.pid });
        }

        if marker.is_empty() || !parent.name.contains(marker) {
            return Ok(parent);
        }

        trace!(pid = parent.pid, name = %parent.name, "Skipping wrapper process");
        process = parent;
    }
}

/// Name of the parent shell of this process.
pub fn parent_shell_name(marker: &str) -> Result<String> {
    find_parent_shell(&SystemProcessTree::new(), marker).map(|p| p.name)
}

/// Executable path of the parent shell of this process.
pub fn parent_shell_exe(marker: &str) -> Result<PathBuf> {
    let shell = find_parent_shell(&SystemProcessTree::new(), marker)?;
    shell.exe.ok_or(Error::ExecutableUnknown { name: shell.name })
}

/// Shell lookups over one process tree, each marker resolved once.
pub struct ShellDetector<T> {
    tree: T,
    cache: MethodCache<String, ProcessInfo>,
}

impl ShellDetector<SystemProcessTree> {
    /// Detector over a snapshot of the live process table.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemProcessTree::new())
    }
}

impl<T: ProcessTree> ShellDetector<T> {
    pub fn new(tree: T) -> Self {
        Self {
            tree,
            cache: MethodCache::new(),
        }
    }

    pub fn shell(&self, marker: &str) -> Result<ProcessInfo> {
        self.cache
            .get_or_try_insert_with("shell", marker.to_string(), || {
                find_parent_shell(&self.tree, marker)
            })
    }

    pub fn shell_name(&self, marker: &str) -> Result<String> {
        self.shell(marker).map(|p| p.name)
    }

    pub fn shell_exe(&self, marker: &str) -> Result<PathBuf> {
        let shell = self.shell(marker)?;
        shell.exe.ok_or(Error::ExecutableUnknown { name: shell.name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// pid -> (name, parent)
    struct FakeTree {
        current: u32,
        procs: HashMap<u32, (&'static str, Option<u32>)>,
        parent_lookups: Cell<usize>,
    }

    impl FakeTree {
        fn new(current: u32, procs: &[(u32, &'static str, Option<u32>)]) -> Self {
            Self {
                current,
                procs: procs
                    .iter()
                    .map(|&(pid, name, parent)| (pid, (name, parent)))
                    .collect(),
                parent_lookups: Cell::new(0),
            }
        }

        fn info(&self, pid: u32) -> Option<ProcessInfo> {
            let (name, _) = self.procs.get(&pid)?;
            Some(ProcessInfo {
                pid,
                name: (*name).to_string(),
                exe: (!name.is_empty()).then(|| PathBuf::from("/bin").join(name)),
            })
        }
    }

    impl ProcessTree for FakeTree {
        fn current(&self) -> Option<ProcessInfo> {
            self.info(self.current)
        }

        fn parent_of(&self, pid: u32) -> Option<ProcessInfo> {
            self.parent_lookups.set(self.parent_lookups.get() + 1);
            let (_, parent) = self.procs.get(&pid)?;
            self.info((*parent)?)
        }
    }

    fn wrapped_tree() -> FakeTree {
        FakeTree::new(
            40,
            &[
                (1, "init", None),
                (10, "zsh", Some(1)),
                (20, "conda", Some(10)),
                (30, "conda-script.py", Some(20)),
                (40, "pkgkit", Some(30)),
            ],
        )
    }

    #[test]
    fn test_skips_marker_ancestors() {
        let shell = find_parent_shell(&wrapped_tree(), "conda").unwrap();
        assert_eq!(shell.pid, 10);
        assert_eq!(shell.name, "zsh");
        assert_eq!(shell.exe, Some(PathBuf::from("/bin/zsh")));
    }

    #[test]
    fn test_direct_parent_without_match() {
        let shell = find_parent_shell(&wrapped_tree(), "mamba").unwrap();
        assert_eq!(shell.name, "conda-script.py");
    }

    #[test]
    fn test_empty_marker_returns_parent() {
        let shell = find_parent_shell(&wrapped_tree(), "").unwrap();
        assert_eq!(shell.pid, 30);
    }

    #[test]
    fn test_runs_out_of_ancestors() {
        let tree = FakeTree::new(2, &[(1, "conda", None), (2, "conda", Some(1))]);
        let err = find_parent_shell(&tree, "conda").unwrap_err();
        assert!(matches!(err, Error::NoParentProcess { pid: 1 }));
    }

    #[test]
    fn test_parent_cycle_ends_walk() {
        let tree = FakeTree::new(
            3,
            &[(1, "conda", Some(2)), (2, "conda", Some(1)), (3, "pkgkit", Some(2))],
        );
        let err = find_parent_shell(&tree, "conda").unwrap_err();
        assert!(matches!(err, Error::NoParentProcess { pid: 1 }));
    }

    #[test]
    fn test_current_missing() {
        let tree = FakeTree::new(99, &[(1, "init", None)]);
        let err = find_parent_shell(&tree, "conda").unwrap_err();
        assert!(matches!(err, Error::ProcessNotFound { .. }));
    }

    #[test]
    fn test_detector_caches_per_marker() {
        let detector = ShellDetector::new(wrapped_tree());

        assert_eq!(detector.shell_name("conda").unwrap(), "zsh");
        let lookups = detector.tree.parent_lookups.get();
        assert_eq!(detector.shell_exe("conda").unwrap(), PathBuf::from("/bin/zsh"));
        assert_eq!(detector.tree.parent_lookups.get(), lookups);

        assert_eq!(detector.shell_name("mamba").unwrap(), "conda-script.py");
        assert!(detector.tree.parent_lookups.get() > lookups);
    }

    #[test]
    fn test_detector_missing_exe() {
        let tree = FakeTree::new(2, &[(1, "", None), (2, "conda", Some(1))]);
        let detector = ShellDetector::new(tree);
        let err = detector.shell_exe("conda").unwrap_err();
        assert!(matches!(err, Error::ExecutableUnknown { .. }));
    }

    #[test]
    fn test_system_tree_sees_current_process() {
        let tree = SystemProcessTree::new();
        let current = tree.current().expect("current process is listed");
        assert_eq!(current.pid, std::process::id());
    }

    #[test]
    fn test_system_parent_shell_name() {
        // The test runner always has a parent, but it may not be visible in
        // every sandbox.
        if let Ok(name) = parent_shell_name("\u{0}") {
            assert!(!name.is_empty());
        }
    }
}
