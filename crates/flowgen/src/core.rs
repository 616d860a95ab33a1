//! Core flow generation types and routines. The most common entry point is [run::generate()],
//! which turns a [specification](RunSpec) into an iterator of [flows](FlowRecord).

pub use flowgen_core::*;
