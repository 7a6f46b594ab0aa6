// mediasleuth-cli/src/main.rs
//
// Entry point of the `mediasleuth` binary: parses the arguments, installs
// the logger and dispatches to the subcommand. Errors are printed with
// their context chain and turn into exit code 1.

use clap::Parser;
use mediasleuth_cli::logging::init_logging;
use mediasleuth_cli::{Cli, Commands, run_inspect, run_purge};
use std::process;

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Inspect(args) => run_inspect(args),
        Commands::Purge(args) => run_purge(args).map(|_| ()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::debug!("Parsed arguments: {:?}", cli);

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
