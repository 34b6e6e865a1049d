// ============================================================================
// mediabot-core/src/external/ytdlp.rs
// ============================================================================
//
// YT-DLP EXECUTOR: Invocation of the generic media-extraction tool
//
// yt-dlp is driven as a subprocess. The `YtDlpRunner` trait is the seam the
// specialized extractor talks to; `CommandYtDlp` is the real implementation
// and `MockYtDlpRunner` (see mocks.rs) the test double.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{command_failed_error, command_start_error, CoreResult};

/// Something that can run yt-dlp with a prepared argument list.
pub trait YtDlpRunner {
    /// Runs yt-dlp to completion and returns its standard output.
    fn run(&self, args: &[String]) -> CoreResult<String>;
}

/// Runs the yt-dlp binary found at `program`.
#[derive(Debug, Clone)]
pub struct CommandYtDlp {
    program: PathBuf,
}

impl CommandYtDlp {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl YtDlpRunner for CommandYtDlp {
    fn run(&self, args: &[String]) -> CoreResult<String> {
        let program = self.program.to_string_lossy().into_owned();
        log::debug!("Executing command: {} {}", program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| command_start_error(program.clone(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().last().unwrap_or("").trim().to_string();
            return Err(command_failed_error(program, output.status, last_line));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
