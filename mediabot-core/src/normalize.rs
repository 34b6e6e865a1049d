//! Container normalization for directly fetched payloads.
//!
//! Only gifs need work here: they are converted to an even-dimension,
//! fast-start mp4. A failed conversion is an error, never a silent
//! pass-through, since the advertised extension must match the bytes.

use std::io::Write;

use crate::descriptor::Download;
use crate::error::{CoreError, CoreResult};
use crate::external::transcode::{transcode, TranscodePreset};
use crate::external::FfmpegSpawner;
use crate::scratch::ScratchDir;

/// Extension that triggers the gif → mp4 path.
pub const GIF_EXTENSION: &str = "gif";

/// Converts a gif payload to mp4.
///
/// Returns the download unchanged when it is not a gif.
pub fn normalize<S: FfmpegSpawner>(
    spawner: &S,
    scratch: &ScratchDir,
    download: Download,
) -> CoreResult<Download> {
    if download.descriptor.extension() != GIF_EXTENSION {
        return Ok(download);
    }

    log::info!("Found GIF ({} bytes), converting to mp4", download.payload.len());
    let Download {
        descriptor,
        payload,
    } = download;

    let mp4 = gif_to_mp4(spawner, scratch, &payload, descriptor.title()).map_err(|e| {
        log::error!("GIF conversion failed for {}: {}", descriptor.source_url(), e);
        match e {
            CoreError::Normalization(_) => e,
            other => CoreError::Normalization(other.to_string()),
        }
    })?;

    Ok(Download::new(
        descriptor.with_extension(TranscodePreset::GifToMp4.output_extension()),
        mp4,
    ))
}

/// Stages `gif` in a scratch file and converts it. Both the staged source and
/// the conversion output are deleted before returning.
pub fn gif_to_mp4<S: FfmpegSpawner>(
    spawner: &S,
    scratch: &ScratchDir,
    gif: &[u8],
    title: Option<&str>,
) -> CoreResult<Vec<u8>> {
    let mut source = scratch.create_file(title, GIF_EXTENSION)?;
    source.write_all(gif)?;
    source.flush()?;

    transcode(
        spawner,
        scratch,
        source.path(),
        TranscodePreset::GifToMp4,
        title,
    )
}
