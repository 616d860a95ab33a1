//! An interface to the backend ns-3 simulation.
//!
//! This crate is tightly coupled to the formats read by the ns-3 scripts: it writes flow traces
//! in the `FlowConfigFile` format and launches batches of simulation runs.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

pub mod batch;
pub mod trace;

pub use batch::{BatchError, BatchRun, Job, JobOutcome};
pub use trace::{parse_trace, translate_flows, ParseTraceError, TraceWriter, TRACE_HEADER};
