// ============================================================================
// mediabot-core/src/pipeline.rs
// ============================================================================
//
// RESOLUTION PIPELINE: Post URL → listing JSON → descriptor → download
//
// `MediaBot` is the library entry point. It owns the configuration and the
// three I/O seams (HTTP, ffmpeg, yt-dlp) and runs one resolution at a time.
//
// FLOW:
// 1. Derive `<post>.json` from the post URL and fetch the listing
// 2. Classify the hosting domain (unsupported → Ok(None), no media fetch)
// 3. Run the platform adapter to obtain a MediaDescriptor
// 4. Hand the descriptor to the orchestrator

use url::Url;

use crate::classifier::classify;
use crate::config::CoreConfig;
use crate::descriptor::Download;
use crate::error::{CoreError, CoreResult};
use crate::external::{CommandYtDlp, FfmpegSpawner, SidecarSpawner, YtDlpRunner};
use crate::fetch::{HttpFetcher, MediaFetcher};
use crate::orchestrator::Toolchain;
use crate::platforms::{extract_descriptor, ExtractionContext};
use crate::scratch::ScratchDir;

const JSON_SUFFIX: &str = ".json";

/// Resolves Reddit post URLs into downloaded media.
pub struct MediaBot<F, S, Y> {
    config: CoreConfig,
    tools: Toolchain<F, S, Y>,
}

impl MediaBot<HttpFetcher, SidecarSpawner, CommandYtDlp> {
    /// Creates a pipeline backed by reqwest, ffmpeg and the configured yt-dlp.
    pub fn new(config: CoreConfig) -> CoreResult<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        let ytdlp = CommandYtDlp::new(config.ytdlp_path.clone());
        Self::with_toolchain(config, fetcher, SidecarSpawner, ytdlp)
    }
}

impl<F: MediaFetcher, S: FfmpegSpawner, Y: YtDlpRunner> MediaBot<F, S, Y> {
    /// Creates a pipeline with caller-supplied I/O seams.
    pub fn with_toolchain(config: CoreConfig, fetcher: F, spawner: S, ytdlp: Y) -> CoreResult<Self> {
        config.validate()?;
        let scratch = ScratchDir::new(&config)?;
        log::debug!("Scratch directory: {}", scratch.path().display());
        Ok(Self {
            config,
            tools: Toolchain {
                fetcher,
                spawner,
                ytdlp,
                scratch,
            },
        })
    }

    pub fn toolchain(&self) -> &Toolchain<F, S, Y> {
        &self.tools
    }

    /// Resolves a post URL.
    ///
    /// `Ok(None)` means "no media": the host is unsupported or an audio
    /// extraction failed. Fetch and normalization failures are errors.
    pub fn resolve(&self, post_url: &str) -> CoreResult<Option<Download>> {
        let (web_url, json_url) = listing_urls(post_url)?;

        log::info!("Fetching post listing: {}", json_url);
        let payload = self
            .tools
            .fetcher
            .fetch_json(&json_url)
            .inspect_err(|e| log::error!("Failed to fetch listing {}: {}", json_url, e))?;

        let classified = classify(&payload)
            .inspect_err(|e| log::error!("Malformed listing {}: {}", json_url, e))?;
        let Some(classified) = classified else {
            log::warn!("No supported media found in {}", web_url);
            return Ok(None);
        };

        let ctx = ExtractionContext {
            web_url,
            json_url,
            youtube_mode: self.config.youtube_mode,
        };
        let descriptor = extract_descriptor(&classified, &ctx, &self.tools.fetcher).inspect_err(
            |e| log::error!("{} extraction failed for {}: {}", classified.platform, ctx.web_url, e),
        )?;
        self.tools.download_media(descriptor)
    }
}

/// Splits a post URL into its web form and its `.json` listing form.
///
/// Query and fragment are dropped; a trailing `.json` is accepted on input.
pub fn listing_urls(post_url: &str) -> CoreResult<(String, String)> {
    let mut url = Url::parse(post_url.trim())
        .map_err(|e| CoreError::InvalidPayload(format!("invalid post URL '{post_url}': {e}")))?;
    url.set_query(None);
    url.set_fragment(None);

    let path = url.path().to_string();
    if let Some(web_path) = path.strip_suffix(JSON_SUFFIX) {
        url.set_path(web_path);
    }

    let web_url = url.to_string();
    let json_path = format!("{}{}", url.path(), JSON_SUFFIX);
    url.set_path(&json_path);
    Ok((web_url, url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoreConfigBuilder, YoutubeMode};
    use crate::descriptor::MediaKind;
    use crate::external::mocks::{MockFetcher, MockFfmpegSpawner, MockYtDlpRunner};
    use serde_json::json;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const POST: &str = "https://www.reddit.com/r/pics/comments/abc/title/";
    const POST_JSON: &str = "https://www.reddit.com/r/pics/comments/abc/title/.json";

    type MockBot = MediaBot<MockFetcher, MockFfmpegSpawner, MockYtDlpRunner>;

    fn bot(mode: YoutubeMode) -> (TempDir, MockBot) {
        let tmp = tempdir().unwrap();
        let config = CoreConfigBuilder::new()
            .scratch_dir(tmp.path())
            .youtube_mode(mode)
            .build();
        let bot = MediaBot::with_toolchain(
            config,
            MockFetcher::new(),
            MockFfmpegSpawner::new(),
            MockYtDlpRunner::new(),
        )
        .unwrap();
        (tmp, bot)
    }

    fn serve_post(bot: &MockBot, post: serde_json::Value) {
        let listing = json!([{ "data": { "children": [{ "data": post }] } }]);
        bot.toolchain()
            .fetcher
            .add_response(POST_JSON, serde_json::to_vec(&listing).unwrap());
    }

    #[test]
    fn test_listing_urls() {
        let (web, json) = listing_urls(POST).unwrap();
        assert_eq!(web, POST);
        assert_eq!(json, POST_JSON);

        let (web, json) = listing_urls(&format!("{POST_JSON}?utm_source=share")).unwrap();
        assert_eq!(web, POST);
        assert_eq!(json, POST_JSON);

        assert!(listing_urls("not a url").is_err());
    }

    #[test]
    fn test_reddit_image_is_returned_verbatim() {
        let (tmp, bot) = bot(YoutubeMode::Audio);
        serve_post(&bot, json!({
            "title": "Sunset", "domain": "i.redd.it", "url": "https://i.redd.it/abc123.jpg",
            "subreddit_name_prefixed": "r/pics", "author": "someone"
        }));
        bot.toolchain()
            .fetcher
            .add_response("https://i.redd.it/abc123.jpg", b"\xff\xd8\xff\xe0jpeg".to_vec());

        let download = bot.resolve(POST).unwrap().unwrap();

        assert_eq!(download.descriptor.kind(), MediaKind::Image);
        assert_eq!(download.descriptor.extension(), "jpg");
        assert_eq!(download.descriptor.title(), Some("Sunset"));
        assert_eq!(download.descriptor.origin_json_url(), Some(POST_JSON));
        assert_eq!(download.payload, b"\xff\xd8\xff\xe0jpeg".to_vec());
        assert!(bot.toolchain().spawner.get_received_calls().is_empty());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unsupported_domain_fetches_no_media() {
        let (_tmp, bot) = bot(YoutubeMode::Audio);
        serve_post(&bot, json!({
            "title": "Discussion", "domain": "self.pics", "url": POST
        }));

        assert!(bot.resolve(POST).unwrap().is_none());
        assert_eq!(bot.toolchain().fetcher.requested_urls(), vec![POST_JSON.to_string()]);
    }

    #[test]
    fn test_crossposted_video_with_dead_fallback_fails() {
        let (_tmp, bot) = bot(YoutubeMode::Audio);
        serve_post(&bot, json!({
            "title": "Look at this", "domain": "self.pics", "url": POST,
            "crosspost_parent_list": [{
                "title": "Original", "domain": "v.redd.it", "url": "https://v.redd.it/orig",
                "media": { "reddit_video": { "fallback_url": "https://v.redd.it/orig/DASH_720.mp4" } }
            }]
        }));
        bot.toolchain()
            .ytdlp
            .add_error_expectation(POST, CoreError::Extraction("no formats".into()));

        let err = bot.resolve(POST).unwrap_err();

        assert!(matches!(err, CoreError::HttpStatus { status: 404, ref url } if url == "https://v.redd.it/orig/DASH_720.mp4"));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_youtube_audio_failure_is_empty_result() {
        let (_tmp, bot) = bot(YoutubeMode::Audio);
        serve_post(&bot, json!({
            "title": "Song", "domain": "youtu.be", "url": "https://youtu.be/dQw4w9WgXcQ"
        }));
        bot.toolchain()
            .ytdlp
            .add_error_expectation("youtu.be", CoreError::Extraction("unavailable".into()));

        assert!(bot.resolve(POST).unwrap().is_none());
        assert_eq!(bot.toolchain().fetcher.requested_urls(), vec![POST_JSON.to_string()]);
    }

    #[test]
    fn test_youtube_video_mode_uses_extractor_output() {
        let (_tmp, bot) = bot(YoutubeMode::Video);
        serve_post(&bot, json!({
            "title": "Clip", "domain": "youtu.be", "url": "https://youtu.be/dQw4w9WgXcQ"
        }));
        bot.toolchain()
            .ytdlp
            .add_success_expectation("youtu.be", &[("_Clip.mp4", b"clip")], "_Clip.mp4");

        let download = bot.resolve(POST).unwrap().unwrap();
        assert_eq!(download.descriptor.kind(), MediaKind::Video);
        assert_eq!(download.payload, b"clip".to_vec());
    }

    #[test]
    fn test_listing_failure_propagates() {
        let (_tmp, bot) = bot(YoutubeMode::Audio);
        let err = bot.resolve(POST).unwrap_err();
        assert!(matches!(err, CoreError::HttpStatus { status: 404, .. }));
    }

    #[test]
    fn test_malformed_listing_propagates() {
        let (_tmp, bot) = bot(YoutubeMode::Audio);
        bot.toolchain()
            .fetcher
            .add_response(POST_JSON, br#"{"kind": "Listing"}"#.to_vec());

        let err = bot.resolve(POST).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayload(_)));
        assert_eq!(bot.toolchain().fetcher.requested_urls(), vec![POST_JSON.to_string()]);
    }

    #[test]
    fn test_adapter_failure_propagates() {
        let (_tmp, bot) = bot(YoutubeMode::Audio);
        serve_post(&bot, json!({
            "title": "Album", "domain": "imgur.com", "url": "https://imgur.com/a/XyZ12"
        }));

        let err = bot.resolve(POST).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayload(_)));
        assert_eq!(bot.toolchain().fetcher.requested_urls(), vec![POST_JSON.to_string()]);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let tmp = tempdir().unwrap();
        let config = CoreConfigBuilder::new()
            .scratch_dir(tmp.path())
            .user_agent("")
            .build();

        match MediaBot::new(config) {
            Err(CoreError::Config(msg)) => assert!(msg.contains("User-Agent")),
            Err(other) => panic!("expected a config error, got {other}"),
            Ok(_) => panic!("empty User-Agent accepted"),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CoreConfigBuilder::new().user_agent("").build();
        let result = MediaBot::with_toolchain(
            config,
            MockFetcher::new(),
            MockFfmpegSpawner::new(),
            MockYtDlpRunner::new(),
        );
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
