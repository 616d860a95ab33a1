//! This module defines run specifications ([`RunSpec`]): the size distribution, the host layout
//! and the load parameters of one trace. A `RunSpec` is validated into a [`ValidSpec`] before any
//! flow is generated.

use crate::cdf::{Cdf, CdfError, CdfPoint};
use crate::topology::{TopologyError, TopologyRule, TopologySpec};
use crate::units::{BitsPerSec, Nanosecs};

/// The default link bandwidth, 10 Gbps.
pub const DEFAULT_BANDWIDTH: BitsPerSec = BitsPerSec::new(10_000_000_000);

/// A run specification.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct RunSpec {
    /// Flow size CDF control points, in bytes.
    pub cdf: Vec<CdfPoint>,
    /// Host layout.
    pub topology: TopologySpec,
    /// Seed shared by the size, inter-arrival, and destination generators.
    #[builder(default = 0)]
    pub seed: u64,
    /// Offered load as a fraction of the host link bandwidth.
    #[builder(default = 0.3)]
    pub load: f64,
    /// Host link bandwidth.
    #[builder(default = DEFAULT_BANDWIDTH)]
    pub bandwidth: BitsPerSec,
    /// How long hosts keep sending, measured from `base_time`.
    #[builder(default = Nanosecs::from_secs(10))]
    pub duration: Nanosecs,
    /// The earliest possible flow start.
    #[builder(default = Nanosecs::from_secs(1))]
    pub base_time: Nanosecs,
    /// Source port written for every flow.
    #[builder(default = 1)]
    pub src_port: u16,
}

impl RunSpec {
    /// Validate a specification, producing a `ValidSpec`.
    ///
    /// Correctness properties:
    ///
    /// - The topology satisfies [`TopologySpec::validate`]
    /// - The load is positive and finite, and the bandwidth is nonzero
    /// - The CDF satisfies [`Cdf::new`] and has a positive mean
    pub fn validate(self) -> Result<ValidSpec, SpecError> {
        let topology = self.topology.validate()?;
        if !(self.load > 0.0 && self.load.is_finite()) {
            return Err(SpecError::InvalidLoad(self.load));
        }
        if self.bandwidth == BitsPerSec::ZERO {
            return Err(SpecError::ZeroBandwidth);
        }
        let cdf = Cdf::new(self.cdf)?;
        // CORRECTNESS: with a non-positive mean every gap truncates to zero and the clock never
        // reaches the horizon.
        let mean = cdf.mean();
        if !(mean > 0.0) {
            return Err(SpecError::NonPositiveMean(mean));
        }
        Ok(ValidSpec {
            cdf,
            topology,
            seed: self.seed,
            load: self.load,
            bandwidth: self.bandwidth,
            duration: self.duration,
            base_time: self.base_time,
            src_port: self.src_port,
        })
    }
}

/// A `ValidSpec` is a `RunSpec` that has been validated. The CDF and the topology are guaranteed
/// to satisfy the properties listed in `RunSpec::validate()`.
#[derive(Debug, Clone)]
pub struct ValidSpec {
    pub(crate) cdf: Cdf,
    pub(crate) topology: TopologyRule,
    pub(crate) seed: u64,
    pub(crate) load: f64,
    pub(crate) bandwidth: BitsPerSec,
    pub(crate) duration: Nanosecs,
    pub(crate) base_time: Nanosecs,
    pub(crate) src_port: u16,
}

impl ValidSpec {
    pub fn cdf(&self) -> &Cdf {
        &self.cdf
    }

    pub fn topology(&self) -> TopologyRule {
        self.topology
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The mean time between two sends of one host, in nanoseconds, such that each host offers
    /// `load * bandwidth` on average.
    pub fn mean_interval(&self) -> f64 {
        let mean_size = self.cdf.mean();
        1.0 / (self.bandwidth.into_f64() * self.load / 8.0 / mean_size) * 1e9
    }

    /// No host sends at or after a time past the horizon.
    pub fn horizon(&self) -> Nanosecs {
        self.base_time.saturating_add(self.duration)
    }
}

/// Run specification error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    /// The load is not a positive number.
    #[error("load must be positive (got {0})")]
    InvalidLoad(f64),

    /// The bandwidth is zero.
    #[error("bandwidth must be nonzero")]
    ZeroBandwidth,

    /// The CDF has a mean flow size of zero or less.
    #[error("mean flow size must be positive (got {0})")]
    NonPositiveMean(f64),

    /// The CDF is invalid.
    #[error("not valid cdf: {0}")]
    InvalidCdf(#[from] CdfError),

    /// The topology is invalid.
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),
}
