//! Hosts, flow records and per-pair sequence numbers.

use rustc_hash::FxHashMap;

use crate::units::{Bytes, Nanosecs};

/// A host, named `h<id>` in traces.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::From,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct HostId(usize);

impl HostId {
    pub const ZERO: HostId = Self::new(0);
    pub const ONE: HostId = Self::new(1);

    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// The host's index.
    pub const fn inner(self) -> usize {
        self.0
    }
}

/// An inclusive range of host IDs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_new::new, serde::Serialize, serde::Deserialize,
)]
pub struct HostRange {
    pub first: HostId,
    pub last: HostId,
}

impl HostRange {
    pub fn contains(&self, host: HostId) -> bool {
        self.first <= host && host <= self.last
    }

    pub fn iter(&self) -> impl Iterator<Item = HostId> {
        (self.first.inner()..=self.last.inner()).map(HostId::new)
    }
}

impl std::fmt::Display for HostRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

/// One flow of the generated workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FlowRecord {
    pub start: Nanosecs,
    pub src: HostId,
    pub dst: HostId,
    /// Source port, the same for every flow of a run.
    pub src_port: u16,
    /// Number of flows sent from `src` to `dst` so far, including this one. The trace format
    /// stores it in the destination port column.
    pub seq: u64,
    pub size: Bytes,
    pub priority: u32,
}

/// An ordered (source, destination) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_new::new)]
pub struct HostPair {
    pub src: HostId,
    pub dst: HostId,
}

/// Running flow counts per ordered host pair.
#[derive(Debug, Default, Clone)]
pub struct SequenceCounters {
    inner: FxHashMap<HostPair, u64>,
}

impl SequenceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count of `pair` and returns the new count, so the first flow of a pair
    /// gets 1.
    pub fn next(&mut self, pair: HostPair) -> u64 {
        let count = self.inner.entry(pair).or_insert(0);
        *count += 1;
        *count
    }

    /// The number of flows counted for `pair` so far.
    pub fn get(&self, pair: HostPair) -> u64 {
        self.inner.get(&pair).copied().unwrap_or(0)
    }

    delegate::delegate! {
        to self.inner {
            #[call(len)]
            pub fn nr_pairs(&self) -> usize;
        }
    }
}
