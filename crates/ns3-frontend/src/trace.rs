//! The flow trace format.
//!
//! A trace is a header row followed by one row per flow:
//!
//! ```text
//! StartTime,FromNode,ToNode,SourcePort,DestinationPort,Size,Priority
//! 1000012345ns,h1,h2,1,1,1234B,0
//! ```
//!
//! The destination port column holds the flow's per-pair sequence number.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::num::ParseIntError;

use flowgen_core::flow::{FlowRecord, HostId};

/// The first row of every trace.
pub const TRACE_HEADER: &str = "StartTime,FromNode,ToNode,SourcePort,DestinationPort,Size,Priority";

const NR_TRACE_FIELDS: usize = 7;

/// Streams flows into a trace. The header is written on creation.
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    inner: W,
    nr_flows: usize,
}

impl<W: Write> TraceWriter<W> {
    /// Creates a writer, writing the header row to `inner`.
    pub fn new(mut inner: W) -> io::Result<Self> {
        writeln!(inner, "{TRACE_HEADER}")?;
        Ok(Self { inner, nr_flows: 0 })
    }

    /// Appends one flow.
    pub fn write(&mut self, flow: &FlowRecord) -> io::Result<()> {
        writeln!(self.inner, "{}", translate_flow(flow))?;
        self.nr_flows += 1;
        Ok(())
    }

    /// Appends every flow of `flows`, returning how many were written.
    pub fn write_all(&mut self, flows: impl IntoIterator<Item = FlowRecord>) -> io::Result<usize> {
        let before = self.nr_flows;
        for flow in flows {
            self.write(&flow)?;
        }
        Ok(self.nr_flows - before)
    }

    /// The number of flows written so far.
    pub fn nr_flows(&self) -> usize {
        self.nr_flows
    }

    /// Flushes the underlying writer and returns it.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

fn translate_flow(f: &FlowRecord) -> String {
    format!(
        "{},h{},h{},{},{},{},{}",
        f.start, f.src, f.dst, f.src_port, f.seq, f.size, f.priority
    )
}

/// Renders a complete trace, header included.
pub fn translate_flows(flows: &[FlowRecord]) -> String {
    let mut s = String::new();
    writeln!(s, "{TRACE_HEADER}").unwrap();
    for flow in flows {
        writeln!(s, "{}", translate_flow(flow)).unwrap();
    }
    s
}

/// Parses a complete trace, header included.
pub fn parse_trace(s: &str) -> Result<Vec<FlowRecord>, ParseTraceError> {
    let mut lines = s.lines();
    match lines.next() {
        Some(header) if header.trim_end() == TRACE_HEADER => (),
        _ => return Err(ParseTraceError::MissingHeader),
    }
    lines
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| parse_flow(l).map_err(|kind| ParseTraceError::BadRow { line: i + 2, kind }))
        .collect()
}

fn parse_flow(s: &str) -> Result<FlowRecord, ParseFlowError> {
    let fields = s.trim_end().split(',').collect::<Vec<_>>();
    let nr_fields = fields.len();
    if nr_fields != NR_TRACE_FIELDS {
        return Err(ParseFlowError::WrongNrFields {
            expected: NR_TRACE_FIELDS,
            got: nr_fields,
        });
    }
    Ok(FlowRecord {
        start: fields[0].parse()?,
        src: parse_host(fields[1])?,
        dst: parse_host(fields[2])?,
        src_port: fields[3].parse()?,
        seq: fields[4].parse()?,
        size: fields[5].parse()?,
        priority: fields[6].parse()?,
    })
}

fn parse_host(s: &str) -> Result<HostId, ParseFlowError> {
    let id = s
        .strip_prefix('h')
        .ok_or_else(|| ParseFlowError::BadHostName(s.to_owned()))?;
    Ok(HostId::new(id.parse()?))
}

/// Error parsing a trace.
#[derive(Debug, thiserror::Error)]
pub enum ParseTraceError {
    /// The first row is not the trace header.
    #[error("trace does not start with the header row")]
    MissingHeader,

    /// A flow row is malformed.
    #[error("line {line}: {kind}")]
    BadRow {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the row.
        kind: ParseFlowError,
    },
}

/// Error parsing a single flow row.
#[derive(Debug, thiserror::Error)]
pub enum ParseFlowError {
    /// Incorrect number of fields.
    #[error("wrong number of fields (expected {expected}, got {got})")]
    WrongNrFields {
        /// Expected number of fields.
        expected: usize,
        /// Actual number of fields.
        got: usize,
    },

    /// A host name is not of the form `h<id>`.
    #[error("bad host name {0:?}")]
    BadHostName(String),

    /// Error parsing field value.
    #[error("failed to parse field")]
    ParseInt(#[from] ParseIntError),
}
