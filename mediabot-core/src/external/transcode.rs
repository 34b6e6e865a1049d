// ============================================================================
// mediabot-core/src/external/transcode.rs
// ============================================================================
//
// TRANSCODER: The single seam through which the pipeline invokes ffmpeg
//
// Three named presets cover every conversion the pipeline needs. `transcode`
// stages the output in its own scratch path, runs ffmpeg, reads the result
// into memory and deletes the output file before returning. The input file
// belongs to the caller and is never touched here.

use std::fs;
use std::path::Path;

use ffmpeg_sidecar::command::FfmpegCommand;

use super::ffmpeg_executor::{run_ffmpeg, FfmpegSpawner};
use crate::error::{CoreError, CoreResult};
use crate::scratch::ScratchDir;

/// Scale filter forcing both dimensions down to the nearest even value.
pub const EVEN_DIMENSIONS_FILTER: &str = "scale=trunc(iw/2)*2:trunc(ih/2)*2";

/// Named ffmpeg invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodePreset {
    /// gif → mp4 with even dimensions and the moov atom up front.
    GifToMp4,
    /// Lossless remux (stream copy) of any container into mp4.
    StreamCopyToMp4,
    /// Best-quality audio-only re-encode to mp3.
    AudioToMp3,
}

impl TranscodePreset {
    /// Extension of the file this preset produces.
    pub fn output_extension(self) -> &'static str {
        match self {
            TranscodePreset::GifToMp4 | TranscodePreset::StreamCopyToMp4 => "mp4",
            TranscodePreset::AudioToMp3 => "mp3",
        }
    }

    /// Full ffmpeg argument list for converting `input` into `output`.
    pub fn args(self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
        ];
        match self {
            TranscodePreset::GifToMp4 => args.extend(
                ["-movflags", "faststart", "-vf", EVEN_DIMENSIONS_FILTER]
                    .into_iter()
                    .map(String::from),
            ),
            TranscodePreset::StreamCopyToMp4 => {
                args.extend(["-c", "copy"].into_iter().map(String::from))
            }
            TranscodePreset::AudioToMp3 => {
                args.extend(["-q:a", "0", "-map", "a"].into_iter().map(String::from))
            }
        }
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

/// Converts `input` with `preset` and returns the produced bytes.
///
/// A non-zero exit, a missing output file or an empty output file is a
/// `CoreError::Normalization`. A missing ffmpeg binary surfaces as
/// `CoreError::DependencyNotFound`.
pub fn transcode<S: FfmpegSpawner>(
    spawner: &S,
    scratch: &ScratchDir,
    input: &Path,
    preset: TranscodePreset,
    title: Option<&str>,
) -> CoreResult<Vec<u8>> {
    let output = scratch.reserve_path(title, preset.output_extension());
    let args = preset.args(input, &output);
    log::debug!("Running ffmpeg ({:?}): ffmpeg {}", preset, args.join(" "));

    let mut cmd = FfmpegCommand::new();
    cmd.args(&args);

    let run = run_ffmpeg(spawner, cmd)?;
    if !run.status.success() {
        let detail = run.errors.last().cloned().unwrap_or_default();
        log::error!("ffmpeg {:?} failed ({}): {}", preset, run.status, detail);
        return Err(CoreError::Normalization(format!(
            "ffmpeg {:?} exited with {}: {}",
            preset, run.status, detail
        )));
    }

    let bytes = fs::read(&output).map_err(|e| {
        CoreError::Normalization(format!(
            "ffmpeg {:?} produced no readable output at {}: {}",
            preset,
            output.display(),
            e
        ))
    })?;
    if bytes.is_empty() {
        return Err(CoreError::Normalization(format!(
            "ffmpeg {:?} produced an empty file",
            preset
        )));
    }

    log::debug!("ffmpeg {:?} produced {} bytes", preset, bytes.len());
    Ok(bytes)
}
