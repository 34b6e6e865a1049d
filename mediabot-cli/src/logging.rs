// ============================================================================
// mediabot-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the CLI
//
// Log records go to stderr so that stdout only carries the resolution result.
//
// USAGE:
// - default: info
// - --verbose: debug
// - RUST_LOG, when set, overrides both

use env_logger::Env;
use log::Level;
use owo_colors::OwoColorize;
use std::io::Write;

/// Initializes the global logger.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "ERROR".bright_red().to_string(),
                Level::Warn => "WARN ".yellow().to_string(),
                Level::Info => "INFO ".green().to_string(),
                Level::Debug => "DEBUG".blue().to_string(),
                Level::Trace => "TRACE".magenta().to_string(),
            };
            writeln!(buf, "{} {} {}", buf.timestamp(), level, record.args())
        })
        .init();

    log::debug!("Logger initialized (verbose: {})", verbose);
}
