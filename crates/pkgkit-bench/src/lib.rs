#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Benchmark harness for pkgkit.
//!
//! Run benchmarks with: `cargo bench -p pkgkit-bench`
