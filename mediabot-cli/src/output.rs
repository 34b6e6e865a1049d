// mediabot-cli/src/output.rs
//
// Result printing. The descriptor and payload indicator go to stdout.

use mediabot_core::Download;
use owo_colors::OwoColorize;
use std::fs;
use std::path::Path;

use crate::error::{CliResult, IoContext};

/// One-line summary of the payload, e.g. `payload: 48213 bytes (mp4)`.
pub fn payload_line(download: &Download) -> String {
    format!(
        "payload: {} bytes ({})",
        download.payload.len(),
        download.descriptor.extension()
    )
}

pub fn print_download(download: &Download) {
    println!("{:#?}", download.descriptor);
    println!("{}", payload_line(download).bright_cyan());
}

pub fn print_no_media(post_url: &str) {
    println!("{} {}", "No media found for".yellow(), post_url);
}

/// Writes the payload to `path`.
pub fn write_payload(path: &Path, download: &Download) -> CliResult<()> {
    fs::write(path, &download.payload)
        .io_context(|| format!("Failed to write payload to '{}'", path.display()))?;
    log::info!("Wrote {} bytes to {}", download.payload.len(), path.display());
    Ok(())
}
