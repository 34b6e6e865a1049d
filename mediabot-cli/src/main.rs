// mediabot-cli/src/main.rs
//
// Entry point of the `mediabot` binary: parse arguments, set up logging,
// resolve the post and map the outcome to an exit code.
//
// Exit codes:
// - 0: media printed, or the post's host is not supported
// - 1: the resolution failed (network, payload, external tool)

use clap::Parser;
use mediabot_cli::{logging, run, Cli};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        process::exit(1);
    }
}
