//! The ns-3 trace format and the batch launcher.

pub use ns3_frontend::*;
