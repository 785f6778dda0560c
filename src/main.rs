use clap::Parser;
use swingscan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    swingscan::logger::setup_logger(cli.verbose);
    run(cli)
}
