#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for pkgkit.
//!
//! This crate provides pure helper functions with no logging/tracing dependencies.
//! Logging is handled by the core and CLI crates to keep this library lightweight.

pub mod fs;
pub mod hash;
pub mod size;
pub mod winpath;

pub use hash::{hashsum_file, md5_file, HashAlgorithm};
pub use size::human_bytes;
pub use winpath::{
    cygwin_path_to_win, translate_stream, unix_path_to_win, win_path_to_cygwin,
    win_path_to_unix, Translation,
};
