// mediabot-core/src/platforms/youtube.rs
//
// youtu.be: handed straight to the specialized extractor. Whether the result
// is a song or a clip depends on the configured YoutubeMode.

use super::{annotate, ExtractionContext, PlatformExtractor};
use crate::classifier::RedditPost;
use crate::config::YoutubeMode;
use crate::descriptor::{MediaDescriptor, MediaKind};
use crate::error::CoreResult;
use crate::fetch::MediaFetcher;

pub struct YoutubeExtractor;

impl PlatformExtractor for YoutubeExtractor {
    fn extract(
        &self,
        post: &RedditPost,
        ctx: &ExtractionContext,
        _fetcher: &dyn MediaFetcher,
    ) -> CoreResult<MediaDescriptor> {
        let (kind, ext) = match ctx.youtube_mode {
            YoutubeMode::Audio => (MediaKind::Audio, "mp3"),
            YoutubeMode::Video => (MediaKind::Video, "mp4"),
        };

        let descriptor = MediaDescriptor::new(post.url.clone(), kind, ext)?
            .with_specialized_extractor(post.url.clone())?;
        Ok(annotate(descriptor, post, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::external::mocks::MockFetcher;

    fn extract(url: &str, mode: YoutubeMode) -> CoreResult<MediaDescriptor> {
        let ctx = ExtractionContext {
            web_url: "https://www.reddit.com/r/music/comments/abc/t/".into(),
            json_url: "https://www.reddit.com/r/music/comments/abc/t/.json".into(),
            youtube_mode: mode,
        };
        let post = RedditPost {
            title: Some("Artist - Song".into()),
            domain: "youtu.be".into(),
            url: url.into(),
            ..Default::default()
        };
        YoutubeExtractor.extract(&post, &ctx, &MockFetcher::new())
    }

    #[test]
    fn test_audio_mode() {
        let d = extract("https://youtu.be/dQw4w9WgXcQ", YoutubeMode::Audio).unwrap();
        assert_eq!(d.kind(), MediaKind::Audio);
        assert_eq!(d.extension(), "mp3");
        assert_eq!(d.specialized_url(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(d.title(), Some("Artist - Song"));
    }

    #[test]
    fn test_video_mode() {
        let d = extract("https://youtu.be/dQw4w9WgXcQ", YoutubeMode::Video).unwrap();
        assert_eq!(d.kind(), MediaKind::Video);
        assert_eq!(d.extension(), "mp4");
        assert!(d.uses_specialized_extractor());
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(
            extract("", YoutubeMode::Audio),
            Err(CoreError::InvalidDescriptor(_))
        ));
    }
}
