// ============================================================================
// mediabot-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and yt-dlp
//
// This module encapsulates every subprocess the pipeline starts. Both tools
// sit behind traits (FfmpegSpawner, YtDlpRunner) so the pipeline can be
// exercised with the mocks in `mocks.rs`.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Named ffmpeg presets and the transcode entry point
pub mod transcode;

/// yt-dlp invocation
pub mod ytdlp;

/// Test doubles for ffmpeg, yt-dlp and HTTP
#[cfg(all(unix, any(test, feature = "test-mocks")))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use transcode::{transcode, TranscodePreset};
pub use ytdlp::{CommandYtDlp, YtDlpRunner};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command can be started with `version_arg`.
pub fn check_dependency(cmd: &Path, version_arg: &str) -> CoreResult<()> {
    let name = cmd.to_string_lossy().into_owned();
    let result = Command::new(cmd)
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", name);
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", name, e);
            Err(CoreError::CommandStart(name, e))
        }
    }
}

/// Checks for ffmpeg and yt-dlp. Returns the names of the missing tools.
///
/// Missing tools are not fatal: images and direct fetches work without them.
pub fn missing_dependencies(ytdlp_path: &Path) -> Vec<String> {
    let checks = [
        (Path::new("ffmpeg"), "-version"),
        (ytdlp_path, "--version"),
    ];
    checks
        .into_iter()
        .filter_map(|(cmd, arg)| match check_dependency(cmd, arg) {
            Ok(()) => None,
            Err(_) => Some(cmd.to_string_lossy().into_owned()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependency_missing() {
        let result = check_dependency(Path::new("/nonexistent/definitely-not-a-tool"), "-version");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }

    #[test]
    fn test_missing_dependencies_reports_ytdlp_path() {
        let missing = missing_dependencies(Path::new("/nonexistent/yt-dlp-for-tests"));
        assert!(missing.contains(&"/nonexistent/yt-dlp-for-tests".to_string()));
    }
}
