#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod deprecation;
pub mod error;
pub mod memo;
pub mod shell;
pub mod version;
pub mod writable;

pub use config::Config;
pub use error::{Error, Result};
pub use memo::{MethodCache, Memoized};
pub use shell::{find_parent_shell, ProcessInfo, ProcessTree, ShellDetector, SystemProcessTree};
pub use version::VERSION;
pub use writable::{can_open, can_open_all, can_open_all_files_in_prefix, can_open_prefix, try_write};
