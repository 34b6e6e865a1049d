// ============================================================================
// mediabot-core/src/orchestrator.rs
// ============================================================================
//
// DOWNLOAD ORCHESTRATOR: Strategy selection, fallback and normalization
//
// A classified MediaDescriptor goes in, a `Download` (or nothing) comes out.
//
// STATES:
// - TrySpecialized: video/audio descriptors flagged for the specialized
//   extractor. Video falls back to DirectFetch on a miss, audio gives up.
// - DirectFetch: plain GET of the source URL, then gif normalization.
// - Done: a finished download.
//
// Fetch and normalization failures propagate; a specialized-extractor miss
// never does.

use crate::descriptor::{Download, MediaDescriptor, MediaKind};
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, YtDlpRunner};
use crate::extractor::{ExtractedMedia, ExtractionMode, SpecializedExtractor};
use crate::fetch::MediaFetcher;
use crate::normalize::{normalize, GIF_EXTENSION};
use crate::scratch::ScratchDir;

/// The collaborators the orchestrator drives.
pub struct Toolchain<F, S, Y> {
    pub fetcher: F,
    pub spawner: S,
    pub ytdlp: Y,
    pub scratch: ScratchDir,
}

#[derive(Debug)]
enum Stage {
    TrySpecialized(MediaDescriptor, ExtractionMode),
    DirectFetch(MediaDescriptor),
    Done(Download),
}

impl Stage {
    fn initial(descriptor: MediaDescriptor) -> Self {
        match (descriptor.kind(), descriptor.uses_specialized_extractor()) {
            (MediaKind::Video, true) => Stage::TrySpecialized(descriptor, ExtractionMode::Video),
            (MediaKind::Audio, true) => Stage::TrySpecialized(descriptor, ExtractionMode::BestAudio),
            _ => Stage::DirectFetch(descriptor),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Stage::TrySpecialized(..) => "TrySpecialized",
            Stage::DirectFetch(_) => "DirectFetch",
            Stage::Done(_) => "Done",
        }
    }
}

impl<F: MediaFetcher, S: FfmpegSpawner, Y: YtDlpRunner> Toolchain<F, S, Y> {
    /// Downloads the media a descriptor points at.
    ///
    /// Returns `Ok(None)` only when an audio extraction fails, since audio has
    /// no direct-fetch fallback.
    pub fn download_media(&self, descriptor: MediaDescriptor) -> CoreResult<Option<Download>> {
        let mut stage = Stage::initial(descriptor);

        loop {
            log::debug!("Orchestrator stage: {}", stage.name());
            stage = match stage {
                Stage::TrySpecialized(descriptor, mode) => {
                    match self.try_specialized(&descriptor, mode) {
                        Some(media) => Stage::Done(Download::new(
                            descriptor.with_extension(&media.extension),
                            media.bytes,
                        )),
                        None if mode == ExtractionMode::Video => {
                            log::info!("Specialized extractor failed, falling back to direct fetch");
                            Stage::DirectFetch(descriptor)
                        }
                        None => {
                            log::warn!(
                                "Audio extraction failed for {}, no fallback available",
                                descriptor.source_url()
                            );
                            return Ok(None);
                        }
                    }
                }
                Stage::DirectFetch(descriptor) => Stage::Done(self.direct_fetch(descriptor)?),
                Stage::Done(download) => {
                    let descriptor = &download.descriptor;
                    if let Some(canonical) = descriptor.kind().canonical_extension() {
                        if descriptor.extension() != canonical {
                            log::warn!(
                                "Returning {} as .{} (expected .{})",
                                descriptor.kind(),
                                descriptor.extension(),
                                canonical
                            );
                        }
                    }
                    return Ok(Some(download));
                }
            };
        }
    }

    fn try_specialized(
        &self,
        descriptor: &MediaDescriptor,
        mode: ExtractionMode,
    ) -> Option<ExtractedMedia> {
        let url = descriptor.specialized_url()?;
        SpecializedExtractor::new(&self.spawner, &self.ytdlp, &self.scratch).extract(url, mode)
    }

    fn direct_fetch(&self, descriptor: MediaDescriptor) -> CoreResult<Download> {
        log::info!("Downloading media directly: {}", descriptor.source_url());
        let payload = self
            .fetcher
            .fetch_bytes(descriptor.source_url())
            .inspect_err(|e| log::error!("Direct fetch failed: {}", e))?;

        let download = Download::new(descriptor, payload);
        if download.descriptor.extension() == GIF_EXTENSION {
            return normalize(&self.spawner, &self.scratch, download);
        }
        Ok(download)
    }
}
