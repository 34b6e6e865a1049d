// mediabot-cli/src/lib.rs
//
// Library portion of the Mediabot CLI application.
// Contains argument definitions and the resolve command.

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;

use mediabot_core::{missing_dependencies, MediaBot};

pub use cli::Cli;
pub use error::CliResult;

/// Resolves `cli.post_url` and prints the outcome.
///
/// An unsupported source is not an error: it prints a notice and returns `Ok`.
pub fn run(cli: &Cli) -> CliResult<()> {
    let config = cli.core_config();

    let missing = missing_dependencies(&config.ytdlp_path);
    if !missing.is_empty() {
        log::warn!(
            "Missing external tools: {}. Only direct downloads will work.",
            missing.join(", ")
        );
    }

    let bot = MediaBot::new(config)?;
    match bot.resolve(&cli.post_url)? {
        Some(download) => {
            output::print_download(&download);
            if let Some(path) = &cli.output {
                output::write_payload(path, &download)?;
            }
        }
        None => output::print_no_media(&cli.post_url),
    }
    Ok(())
}
