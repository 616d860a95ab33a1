//! The discrete-event loop that turns a [`ValidSpec`] into a time-ordered stream of flows.
//!
//! Every sending host has a pending send time. The scheduler repeatedly takes the host with the
//! earliest pending send, draws the gap to that host's following send, and either emits a flow
//! (rescheduling the host) or retires the host once its following send would land past the
//! horizon. Because the earliest pending send is always taken first and a host's send times never
//! decrease, flows come out in non-decreasing start time order.

use std::cmp::{self, Reverse};
use std::collections::BinaryHeap;
use std::iter::FusedIterator;

use log::{debug, info, trace};
use rand::prelude::*;

use crate::arrival::ExponentialProcess;
use crate::cdf::CdfSampler;
use crate::flow::{FlowRecord, HostId, HostPair, SequenceCounters};
use crate::spec::ValidSpec;
use crate::topology::TopologyRule;
use crate::units::{Bytes, Nanosecs};

/// A host's pending send. Keys order by time first and host ID second, so hosts scheduled at the
/// same nanosecond are served in ID order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_new::new)]
pub struct SendKey {
    pub time: Nanosecs,
    pub host: HostId,
}

/// Generates the flows of one run. Each call to `next` advances the event loop until a flow is
/// emitted or every host has been retired.
///
/// The size, inter-arrival, and destination streams each have their own generator, so a change
/// in how often one of them is drawn from leaves the others untouched.
#[derive(Debug)]
pub struct FlowScheduler {
    queue: BinaryHeap<Reverse<SendKey>>,
    topology: TopologyRule,
    sizes: CdfSampler,
    arrivals: ExponentialProcess,
    destinations: StdRng,
    counters: SequenceCounters,
    mean_interval: f64,
    horizon: Nanosecs,
    src_port: u16,
    nr_emitted: usize,
}

impl FlowScheduler {
    /// Creates a scheduler and draws the first send time of every source host, in ascending host
    /// order.
    pub fn new(spec: ValidSpec) -> Self {
        let mean_interval = spec.mean_interval();
        let horizon = spec.horizon();
        let mut arrivals = ExponentialProcess::new(spec.seed);
        let queue = spec
            .topology
            .sources()
            .map(|host| {
                let gap = arrivals.draw_gap(mean_interval);
                Reverse(SendKey::new(spec.base_time.saturating_add(gap), host))
            })
            .collect::<BinaryHeap<_>>();
        info!(
            "Generating flows for {} hosts (mean flow size {:.1}B, mean interval {:.1}ns, horizon {})",
            queue.len(),
            spec.cdf.mean(),
            mean_interval,
            horizon
        );
        Self {
            queue,
            topology: spec.topology,
            sizes: CdfSampler::new(spec.cdf, spec.seed),
            arrivals,
            destinations: StdRng::seed_from_u64(spec.seed),
            counters: SequenceCounters::new(),
            mean_interval,
            horizon,
            src_port: spec.src_port,
            nr_emitted: 0,
        }
    }

    /// The mean time between two sends of one host, in nanoseconds.
    pub fn mean_interval(&self) -> f64 {
        self.mean_interval
    }

    pub fn horizon(&self) -> Nanosecs {
        self.horizon
    }

    /// The number of hosts that have not been retired yet.
    pub fn nr_live_hosts(&self) -> usize {
        self.queue.len()
    }

    /// The number of flows emitted so far.
    pub fn nr_emitted(&self) -> usize {
        self.nr_emitted
    }

    /// The earliest pending send, i.e. the current simulation time.
    pub fn now(&self) -> Option<Nanosecs> {
        self.queue.peek().map(|&Reverse(key)| key.time)
    }

    pub fn counters(&self) -> &SequenceCounters {
        &self.counters
    }
}

impl Iterator for FlowScheduler {
    type Item = FlowRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&Reverse(SendKey { time, host: src })) = self.queue.peek() {
            let next_time = time.saturating_add(self.arrivals.draw_gap(self.mean_interval));
            // The destination is drawn even when the host is about to be retired.
            let dst = self.topology.pick_dst(src, &mut self.destinations);
            if next_time > self.horizon {
                // The pending send at `time` is dropped along with the host.
                self.queue.pop();
                debug!("Retiring host {src} at {time}, {} hosts left", self.queue.len());
                continue;
            }
            let size = flow_size(self.sizes.draw());
            let seq = self.counters.next(HostPair::new(src, dst));
            self.queue.pop();
            self.queue.push(Reverse(SendKey::new(next_time, src)));
            self.nr_emitted += 1;
            let record = FlowRecord {
                start: time,
                src,
                dst,
                src_port: self.src_port,
                seq,
                size,
                priority: 0,
            };
            trace!("{record:?}");
            return Some(record);
        }
        None
    }
}

impl FusedIterator for FlowScheduler {}

// Sizes are truncated to whole bytes, and every flow carries at least one byte.
fn flow_size(raw: f64) -> Bytes {
    Bytes::new(cmp::max(raw as u64, 1))
}
