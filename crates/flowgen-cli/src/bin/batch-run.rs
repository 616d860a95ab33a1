use std::path::PathBuf;

use clap::Parser;
use log::warn;
use ns3_frontend::BatchRun;

#[derive(Debug, Parser)]
#[command(author, version, about = "Launch a batch of ns-3 runs and wait for all of them", long_about = None)]
struct Args {
    /// The ns-3 directory containing `waf`
    #[arg(long, default_value = ".")]
    ns3_dir: PathBuf,

    /// The ns-3 program to run
    #[arg(long, default_value = "scratch/pfc-cyq")]
    program: String,

    /// The jobs to run, in JSON or Dhall
    #[arg(long)]
    manifest: PathBuf,
}

fn main() -> anyhow::Result<()> {
    flowgen_cli::init_logging();
    let args = Args::parse();
    let jobs = flowgen_utils::read_jobs(&args.manifest)?;
    let batch = BatchRun::builder()
        .ns3_dir(args.ns3_dir)
        .program(args.program)
        .jobs(jobs)
        .build();
    let outcomes = batch.run()?;
    let nr_failed = outcomes.iter().filter(|o| !o.status.success()).count();
    if nr_failed > 0 {
        warn!("{nr_failed} of {} runs failed", outcomes.len());
    }
    Ok(())
}
