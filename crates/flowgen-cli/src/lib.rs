//! Command-line front ends: `traffic-gen` writes one flow trace, `batch-run` launches ns-3 runs.

#![warn(unreachable_pub, missing_debug_implementations)]

use std::path::PathBuf;

use env_logger::Env;
use flowgen_core::{
    units::{BitsPerSec, Nanosecs, ParseBandwidthError},
    HostId, RunSpec, TopologySpec,
};
use log::info;

/// Initializes logging at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Options of `traffic-gen`.
#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Generate a flow trace for ns-3", long_about = None)]
pub struct Args {
    /// The file of the traffic size CDF
    #[arg(short = 'c', long = "cdf", default_value = "uniform_distribution.txt")]
    pub cdf_file: PathBuf,

    /// Number of hosts
    #[arg(short = 'n', long = "nhost", conflicts_with = "bipartite")]
    pub nhost: Option<usize>,

    /// Start index of the hosts
    #[arg(long = "sindex", default_value_t = 0)]
    pub start_index: usize,

    /// Send from hosts [1, n) to hosts [1, n] instead of among [sindex, sindex + n)
    #[arg(long, requires = "nhost", conflicts_with = "start_index")]
    pub indexed: bool,

    /// Bipartite configuration: start and end index of part one, then of part two
    #[arg(long, num_args = 4, value_names = ["START1", "END1", "START2", "END2"])]
    pub bipartite: Option<Vec<usize>>,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// The fraction of the host link bandwidth to load
    #[arg(short, long, default_value_t = 0.3)]
    pub load: f64,

    /// The bandwidth of host links (G/M/K suffix, or bits per second)
    #[arg(short, long, default_value = "10G")]
    pub bandwidth: String,

    /// The total run time in seconds
    #[arg(short, long, default_value_t = 10.0)]
    pub time: f64,

    /// Source port of all flows
    #[arg(long = "sport", default_value_t = 1)]
    pub src_port: u16,

    /// The output file
    #[arg(short, long, default_value = "tmp_traffic.csv")]
    pub output: PathBuf,
}

impl Args {
    /// The host layout selected by `--nhost`, `--indexed` and `--bipartite`.
    pub fn topology(&self) -> Result<TopologySpec, Error> {
        match (&self.bipartite, self.nhost) {
            (Some(quad), _) => match quad[..] {
                [first1, last1, first2, last2] => {
                    Ok(TopologySpec::bipartite([first1, last1, first2, last2]))
                }
                _ => Err(Error::BipartiteArity(quad.len())),
            },
            (None, Some(n)) if n > 0 => Ok(if self.indexed {
                TopologySpec::IndexedRange { n }
            } else {
                TopologySpec::AllPairs {
                    start: HostId::new(self.start_index),
                    n,
                }
            }),
            (None, _) => Err(Error::MissingHosts),
        }
    }

    pub fn bandwidth(&self) -> Result<BitsPerSec, Error> {
        Ok(self.bandwidth.parse()?)
    }
}

/// Generates the trace described by `args` and writes it to `args.output`, returning the number
/// of flows written.
///
/// The output file is only created once the whole configuration has been checked.
pub fn run(args: &Args) -> Result<usize, Error> {
    let topology = args.topology()?;
    let bandwidth = args.bandwidth()?;
    let cdf = flowgen_utils::read_cdf(&args.cdf_file)?;
    let spec = RunSpec::builder()
        .cdf(cdf)
        .topology(topology)
        .seed(args.seed)
        .load(args.load)
        .bandwidth(bandwidth)
        .duration(Nanosecs::from_secs_f64(args.time))
        .src_port(args.src_port)
        .build();
    let flows = flowgen_core::generate(spec)?;
    let nr_flows = flowgen_utils::write_trace(&args.output, flows)?;
    info!("Wrote {nr_flows} flows to {}", args.output.display());
    Ok(nr_flows)
}

/// Errors of [`run`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither a host count nor a bipartite layout was given.
    #[error("please use -n to enter number of hosts, or --bipartite to configure a bipartite topology")]
    MissingHosts,

    /// `--bipartite` did not get four indices.
    #[error("--bipartite takes 4 host indices (got {0})")]
    BipartiteArity(usize),

    /// The bandwidth could not be parsed.
    #[error(transparent)]
    Bandwidth(#[from] ParseBandwidthError),

    /// The run specification is invalid.
    #[error(transparent)]
    InvalidSpec(#[from] flowgen_core::Error),

    /// Reading the CDF or writing the trace failed.
    #[error(transparent)]
    Io(#[from] flowgen_utils::Error),
}

impl Error {
    /// Whether this is a configuration or validation failure. These abort the run before any
    /// output is written, but `traffic-gen` still exits successfully.
    pub fn is_config(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}
