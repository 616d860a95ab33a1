//! Which hosts send traffic, and to whom.

use rand::Rng;

use crate::flow::{HostId, HostRange};

/// An unvalidated host layout, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TopologySpec {
    /// Hosts `[start, start + n)` send to each other.
    AllPairs { start: HostId, n: usize },
    /// Hosts `[1, n)` send to destinations drawn from `[1, n]`. Unlike [`TopologySpec::AllPairs`]
    /// the destination range includes `n`, which never sends.
    IndexedRange { n: usize },
    /// Hosts in `part1` send to hosts in `part2`. Hosts in `part2` do not send.
    Bipartite { part1: HostRange, part2: HostRange },
}

impl TopologySpec {
    /// Builds a bipartite layout from `[first1, last1, first2, last2]`.
    pub fn bipartite([first1, last1, first2, last2]: [usize; 4]) -> Self {
        Self::Bipartite {
            part1: HostRange::new(HostId::new(first1), HostId::new(last1)),
            part2: HostRange::new(HostId::new(first2), HostId::new(last2)),
        }
    }

    /// Validate a host layout, producing a [`TopologyRule`].
    ///
    /// Correctness properties:
    ///
    /// - All-pairs layouts have at least two hosts, so a destination other than the source exists,
    ///   and every host ID of the range fits in a `usize`
    /// - Indexed layouts have at least one host
    /// - Bipartite partitions are non-empty, ordered, and disjoint
    pub fn validate(self) -> Result<TopologyRule, TopologyError> {
        match self {
            TopologySpec::AllPairs { start, n } => {
                if n < 2 {
                    return Err(TopologyError::TooFewHosts { n, min: 2 });
                }
                if start.inner().checked_add(n).is_none() {
                    return Err(TopologyError::IdOverflow { start, n });
                }
            }
            TopologySpec::IndexedRange { n } if n < 1 => {
                return Err(TopologyError::TooFewHosts { n, min: 1 });
            }
            TopologySpec::Bipartite { part1, part2 } => {
                let ordered = part1.first <= part1.last
                    && part1.last < part2.first
                    && part2.first <= part2.last;
                if !ordered {
                    return Err(TopologyError::BipartiteOverlap { part1, part2 });
                }
            }
            _ => (),
        }
        Ok(TopologyRule(self))
    }
}

/// A validated host layout. Decides the set of sending hosts and picks destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyRule(TopologySpec);

impl TopologyRule {
    /// The hosts that send traffic, in ascending order.
    pub fn sources(&self) -> impl Iterator<Item = HostId> {
        let (lo, hi) = match self.0 {
            TopologySpec::AllPairs { start, n } => (start.inner(), start.inner() + n),
            TopologySpec::IndexedRange { n } => (1, n),
            TopologySpec::Bipartite { part1, .. } => (part1.first.inner(), part1.last.inner() + 1),
        };
        (lo..hi).map(HostId::new)
    }

    pub fn nr_sources(&self) -> usize {
        self.sources().count()
    }

    /// Picks a destination for a flow sent by `src`.
    pub fn pick_dst<R: Rng + ?Sized>(&self, src: HostId, rng: &mut R) -> HostId {
        match self.0 {
            TopologySpec::AllPairs { start, n } => {
                let (lo, hi) = (start.inner(), start.inner() + n - 1);
                pick_other(src, rng, lo, hi)
            }
            TopologySpec::IndexedRange { n } => pick_other(src, rng, 1, n),
            TopologySpec::Bipartite { part2, .. } => {
                HostId::new(rng.gen_range(part2.first.inner()..=part2.last.inner()))
            }
        }
    }

    /// Whether `dst` is an eligible destination for `src`.
    pub fn admits(&self, src: HostId, dst: HostId) -> bool {
        match self.0 {
            TopologySpec::AllPairs { start, n } => {
                src != dst && HostRange::new(start, HostId::new(start.inner() + n - 1)).contains(dst)
            }
            TopologySpec::IndexedRange { n } => {
                src != dst && HostRange::new(HostId::ONE, HostId::new(n)).contains(dst)
            }
            TopologySpec::Bipartite { part2, .. } => part2.contains(dst),
        }
    }
}

// Rejection-samples `[lo, hi]` until the draw differs from `src`.
fn pick_other<R: Rng + ?Sized>(src: HostId, rng: &mut R, lo: usize, hi: usize) -> HostId {
    loop {
        let dst = HostId::new(rng.gen_range(lo..=hi));
        if dst != src {
            return dst;
        }
    }
}

/// Topology error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Not enough hosts for the layout.
    #[error("need at least {min} hosts (got {n})")]
    TooFewHosts {
        /// The configured host count.
        n: usize,
        /// The minimum host count.
        min: usize,
    },

    /// The host range runs past the largest host ID.
    #[error("{n} hosts starting at {start} overflow the host ID space")]
    IdOverflow {
        /// The first host ID.
        start: HostId,
        /// The configured host count.
        n: usize,
    },

    /// The bipartite partitions overlap or are inverted.
    #[error("bipartite overlap: partitions {part1} and {part2} must be ordered and disjoint")]
    BipartiteOverlap {
        /// The first partition.
        part1: HostRange,
        /// The second partition.
        part2: HostRange,
    },
}
