//! File I/O for CDFs, traces and batch manifests.

pub use flowgen_utils::*;
