//! `flowgen` generates synthetic flow traces for data center network simulations. Every host
//! sends flows whose sizes follow an empirical CDF, with exponentially distributed gaps chosen so
//! that each host offers a target fraction of its link bandwidth. The resulting trace is written
//! in the CSV format read by the ns-3 simulation programs.

#![warn(unreachable_pub, missing_docs)]

pub mod core;
pub mod frontend;
pub mod utils;
