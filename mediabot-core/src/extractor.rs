// ============================================================================
// mediabot-core/src/extractor.rs
// ============================================================================
//
// SPECIALIZED EXTRACTOR: yt-dlp based video / audio extraction
//
// Given a canonical platform URL, yt-dlp downloads the media into the scratch
// directory under a random name stem. The produced file is read back and, when
// needed, remuxed to mp4 (video) or re-encoded to mp3 (audio).
//
// Every failure in here is caught, logged and reported as `None`: the
// orchestrator decides whether that means "fall back" or "give up". All files
// carrying the run's stem are removed when the stem guard drops, on success
// and failure alike.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::external::transcode::{transcode, TranscodePreset};
use crate::external::{FfmpegSpawner, YtDlpRunner};
use crate::scratch::{ScratchDir, ScratchStem};

/// What the extractor should pull from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Full video, normalised to mp4.
    Video,
    /// Best audio stream only, normalised to mp3.
    BestAudio,
}

/// Bytes produced by a successful extraction and their container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMedia {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// The specialized extractor adapter.
pub struct SpecializedExtractor<'a, S, Y> {
    spawner: &'a S,
    runner: &'a Y,
    scratch: &'a ScratchDir,
}

impl<'a, S: FfmpegSpawner, Y: YtDlpRunner> SpecializedExtractor<'a, S, Y> {
    pub fn new(spawner: &'a S, runner: &'a Y, scratch: &'a ScratchDir) -> Self {
        Self {
            spawner,
            runner,
            scratch,
        }
    }

    /// Extracts media from `url`. Any failure yields `None`.
    pub fn extract(&self, url: &str, mode: ExtractionMode) -> Option<ExtractedMedia> {
        log::info!("Trying specialized extractor ({:?}): {}", mode, url);
        match self.try_extract(url, mode) {
            Ok(media) => {
                log::info!(
                    "Specialized extractor produced {} bytes ({})",
                    media.bytes.len(),
                    media.extension
                );
                Some(media)
            }
            Err(e) => {
                log::warn!("Specialized extractor failed for {}: {}", url, e);
                None
            }
        }
    }

    fn try_extract(&self, url: &str, mode: ExtractionMode) -> CoreResult<ExtractedMedia> {
        let stem = self.scratch.reserve_stem();
        let args = ytdlp_args(&stem, url, mode);

        let stdout = self.runner.run(&args)?;
        let expected = expected_output_path(&stem, &stdout)?;
        log::debug!("yt-dlp expected output: {}", expected.display());

        match mode {
            ExtractionMode::Video => self.finish_video(&expected),
            ExtractionMode::BestAudio => self.finish_audio(&expected),
        }
        // `stem` drops here and sweeps every intermediate file.
    }

    fn finish_video(&self, expected: &Path) -> CoreResult<ExtractedMedia> {
        if expected.is_file() {
            let extension = file_extension(expected);
            if extension == "mp4" {
                let bytes = read_and_remove(expected)?;
                return Ok(ExtractedMedia { extension, bytes });
            }
            log::info!("yt-dlp produced a .{} container, remuxing to mp4", extension);
            return self.remux_to_mp4(expected);
        }

        // yt-dlp silently falls back to mkv when the negotiated streams don't
        // fit the requested container.
        let mkv = expected.with_extension("mkv");
        if mkv.is_file() {
            log::info!("Expected {} missing, found mkv; remuxing", expected.display());
            return self.remux_to_mp4(&mkv);
        }

        Err(CoreError::Extraction(format!(
            "yt-dlp produced no output at {}",
            expected.display()
        )))
    }

    fn finish_audio(&self, expected: &Path) -> CoreResult<ExtractedMedia> {
        if !expected.is_file() {
            return Err(CoreError::Extraction(format!(
                "yt-dlp produced no audio at {}",
                expected.display()
            )));
        }
        let bytes = transcode(
            self.spawner,
            self.scratch,
            expected,
            TranscodePreset::AudioToMp3,
            None,
        )?;
        remove_intermediate(expected);
        Ok(ExtractedMedia {
            extension: TranscodePreset::AudioToMp3.output_extension().to_string(),
            bytes,
        })
    }

    fn remux_to_mp4(&self, source: &Path) -> CoreResult<ExtractedMedia> {
        let bytes = transcode(
            self.spawner,
            self.scratch,
            source,
            TranscodePreset::StreamCopyToMp4,
            None,
        )?;
        remove_intermediate(source);
        Ok(ExtractedMedia {
            extension: TranscodePreset::StreamCopyToMp4.output_extension().to_string(),
            bytes,
        })
    }
}

/// yt-dlp arguments: download under the stem and print the final filename.
fn ytdlp_args(stem: &ScratchStem, url: &str, mode: ExtractionMode) -> Vec<String> {
    let template = stem
        .dir()
        .join(format!("{}_%(title)s.%(ext)s", stem.stem()));

    let mut args: Vec<String> = [
        "--no-simulate",
        "--print",
        "filename",
        "--restrict-filenames",
        "--no-playlist",
        "--no-warnings",
        "--no-progress",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    if mode == ExtractionMode::BestAudio {
        args.extend(["-f".to_string(), "bestaudio".to_string()]);
    }
    args.extend([
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
        "--".to_string(),
        url.to_string(),
    ]);
    args
}

/// Takes the last printed line as the expected output path and checks that
/// it belongs to this run.
fn expected_output_path(stem: &ScratchStem, stdout: &str) -> CoreResult<PathBuf> {
    let line = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .ok_or_else(|| CoreError::Extraction("yt-dlp printed no filename".to_string()))?;

    let path = PathBuf::from(line);
    if !stem.owns(&path) {
        return Err(CoreError::Extraction(format!(
            "yt-dlp reported unexpected output path {}",
            path.display()
        )));
    }
    Ok(path)
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn read_and_remove(path: &Path) -> CoreResult<Vec<u8>> {
    let bytes = fs::read(path)?;
    remove_intermediate(path);
    Ok(bytes)
}

fn remove_intermediate(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        log::warn!("Failed to remove {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockFfmpegSpawner, MockYtDlpRunner};
    use tempfile::tempdir;

    fn scratch_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir).unwrap().flatten().map(|e| e.path()).collect()
    }

    #[test]
    fn test_video_mp4_read_directly() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let spawner = MockFfmpegSpawner::new();
        let runner = MockYtDlpRunner::new();
        runner.add_success_expectation(
            "https://youtu.be/abc",
            &[("_Some_Title.mp4", b"mp4 data")],
            "_Some_Title.mp4",
        );

        let extractor = SpecializedExtractor::new(&spawner, &runner, &scratch);
        let media = extractor
            .extract("https://youtu.be/abc", ExtractionMode::Video)
            .expect("media");

        assert_eq!(media.extension, "mp4");
        assert_eq!(media.bytes, b"mp4 data".to_vec());
        assert!(spawner.get_received_calls().is_empty());
        assert!(scratch_files(tmp.path()).is_empty());

        let args = &runner.get_received_calls()[0];
        assert!(!args.iter().any(|a| a == "bestaudio"));
        let template = args.iter().position(|a| a == "-o").map(|i| &args[i + 1]).unwrap();
        assert!(template.contains("reddit_"));
        assert!(template.ends_with("_%(title)s.%(ext)s"));
        Ok(())
    }

    #[test]
    fn test_video_mkv_fallback_is_remuxed() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("copy", Some(b"remuxed mp4".to_vec()));
        let runner = MockYtDlpRunner::new();
        // Expected .mp4 is printed, but only an .mkv is written.
        runner.add_success_expectation(
            "reddit.com",
            &[("_Clip.mkv", b"matroska")],
            "_Clip.mp4",
        );

        let extractor = SpecializedExtractor::new(&spawner, &runner, &scratch);
        let media = extractor
            .extract("https://www.reddit.com/r/a/comments/x/clip/", ExtractionMode::Video)
            .expect("media");

        assert_eq!(media.extension, "mp4");
        assert_eq!(media.bytes, b"remuxed mp4".to_vec());

        let ffmpeg_args = &spawner.get_received_calls()[0];
        let input = ffmpeg_args.iter().position(|a| a == "-i").map(|i| &ffmpeg_args[i + 1]).unwrap();
        assert!(input.ends_with("_Clip.mkv"));

        // No mkv (or anything else) left behind.
        assert!(scratch_files(tmp.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_video_webm_is_remuxed() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("copy", Some(b"mp4".to_vec()));
        let runner = MockYtDlpRunner::new();
        runner.add_success_expectation("youtu.be", &[("_T.webm", b"webm")], "_T.webm");

        let extractor = SpecializedExtractor::new(&spawner, &runner, &scratch);
        let media = extractor.extract("https://youtu.be/x", ExtractionMode::Video).unwrap();
        assert_eq!(media.extension, "mp4");
        assert!(scratch_files(tmp.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_audio_always_transcoded_to_mp3() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("-q:a", Some(b"ID3 mp3".to_vec()));
        let runner = MockYtDlpRunner::new();
        runner.add_success_expectation("bestaudio", &[("_Song.m4a", b"aac")], "_Song.m4a");

        let extractor = SpecializedExtractor::new(&spawner, &runner, &scratch);
        let media = extractor
            .extract("https://youtu.be/song", ExtractionMode::BestAudio)
            .expect("media");

        assert_eq!(media.extension, "mp3");
        assert_eq!(media.bytes, b"ID3 mp3".to_vec());
        assert_eq!(spawner.get_received_calls().len(), 1);
        assert!(scratch_files(tmp.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_ytdlp_error_yields_none_and_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let spawner = MockFfmpegSpawner::new();
        let runner = MockYtDlpRunner::new();
        runner.add_error_expectation(
            "youtu.be",
            CoreError::Extraction("Unsupported URL".to_string()),
        );

        let extractor = SpecializedExtractor::new(&spawner, &runner, &scratch);
        assert!(extractor.extract("https://youtu.be/gone", ExtractionMode::Video).is_none());
        assert!(scratch_files(tmp.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_output_yields_none() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let spawner = MockFfmpegSpawner::new();
        let runner = MockYtDlpRunner::new();
        runner.add_success_expectation("youtu.be", &[("_X.mp4.part", b"partial")], "_X.mp4");

        let extractor = SpecializedExtractor::new(&spawner, &runner, &scratch);
        assert!(extractor.extract("https://youtu.be/x", ExtractionMode::Video).is_none());
        // The partial download is swept too.
        assert!(scratch_files(tmp.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_failed_remux_yields_none_and_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation("copy", 1);
        let runner = MockYtDlpRunner::new();
        runner.add_success_expectation("youtu.be", &[("_X.mkv", b"mkv")], "_X.mp4");

        let extractor = SpecializedExtractor::new(&spawner, &runner, &scratch);
        assert!(extractor.extract("https://youtu.be/x", ExtractionMode::Video).is_none());
        assert!(scratch_files(tmp.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_foreign_output_path_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let scratch = ScratchDir::open(tmp.path(), "reddit")?;
        let stem = scratch.reserve_stem();
        let result = expected_output_path(&stem, "/etc/passwd\n");
        assert!(matches!(result, Err(CoreError::Extraction(_))));
        assert!(expected_output_path(&stem, "\n\n").is_err());
        Ok(())
    }
}
