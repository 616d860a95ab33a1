#![warn(unreachable_pub, missing_debug_implementations)]

//! The core flow generation library. This crate defines [the routine](run::generate) that turns a
//! [specification](spec::RunSpec) into a time-ordered stream of [flows](flow::FlowRecord).

pub mod arrival;
pub mod cdf;
pub mod flow;
pub mod run;
pub mod scheduler;
pub mod spec;
pub mod topology;
pub mod units;

#[doc(hidden)]
pub mod testing;

pub use arrival::ExponentialProcess;
pub use cdf::{Cdf, CdfError, CdfPoint, CdfSampler};
pub use flow::{FlowRecord, HostId, HostPair, HostRange, SequenceCounters};
pub use run::{generate, Error};
pub use scheduler::{FlowScheduler, SendKey};
pub use spec::{RunSpec, SpecError, ValidSpec};
pub use topology::{TopologyError, TopologyRule, TopologySpec};
