use clap::Parser;
use flowgen_cli::Args;
use log::error;

fn main() -> anyhow::Result<()> {
    flowgen_cli::init_logging();
    let args = Args::parse();
    match flowgen_cli::run(&args) {
        Ok(_) => Ok(()),
        // Bad configurations are reported without a failing exit status.
        Err(e) if e.is_config() => {
            error!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
