//! Shared fixtures for tests.

use crate::cdf::CdfPoint;
use crate::flow::HostId;
use crate::spec::RunSpec;
use crate::topology::TopologySpec;
use crate::units::{BitsPerSec, Nanosecs};

/// Sizes uniform over `[0, 2000]` bytes.
pub fn uniform_cdf() -> Vec<CdfPoint> {
    vec![CdfPoint::new(0.0, 0.0), CdfPoint::new(2_000.0, 100.0)]
}

/// Sizes uniform over `[0, 200]` bytes with a knee at the median; mean 100 bytes.
pub fn linear_cdf() -> Vec<CdfPoint> {
    vec![
        CdfPoint::new(0.0, 0.0),
        CdfPoint::new(100.0, 50.0),
        CdfPoint::new(200.0, 100.0),
    ]
}

/// Hosts 1 and 2 at the default load and bandwidth.
pub fn two_host_spec() -> RunSpec {
    RunSpec::builder()
        .cdf(linear_cdf())
        .topology(TopologySpec::AllPairs {
            start: HostId::ONE,
            n: 2,
        })
        .build()
}

/// A short, busy run over `n` hosts starting at 0, on 1 Gbps links.
pub fn busy_spec(n: usize, seed: u64) -> RunSpec {
    RunSpec::builder()
        .cdf(uniform_cdf())
        .topology(TopologySpec::AllPairs {
            start: HostId::ZERO,
            n,
        })
        .seed(seed)
        .bandwidth(BitsPerSec::new(1_000_000_000))
        .duration(Nanosecs::new(10_000_000))
        .build()
}
